//! Drawdown and historical VaR over the equity curve

use super::RiskPoint;
use crate::portfolio::EquityPoint;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Rolling VaR parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VarConfig {
    /// Number of daily P&L observations in the window
    pub window: usize,
    /// Confidence level, e.g. 0.99
    pub alpha: Decimal,
}

impl Default for VarConfig {
    fn default() -> Self {
        Self {
            window: 250,
            alpha: dec!(0.99),
        }
    }
}

/// Percentile of an ascending slice with linear interpolation between ranks
///
/// `pct` is a fraction in `[0, 1]`. The rank is `pct * (n - 1)`.
pub fn percentile(sorted: &[Decimal], pct: Decimal) -> Option<Decimal> {
    if sorted.is_empty() || pct < Decimal::ZERO || pct > Decimal::ONE {
        return None;
    }

    let n = sorted.len();
    if n == 1 {
        return Some(sorted[0]);
    }

    let rank = pct * Decimal::from(n - 1);
    let lower_rank = rank.floor();
    let frac = rank - lower_rank;
    let lower = lower_rank.to_usize()?;
    let upper = (lower + 1).min(n - 1);

    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * frac)
}

/// Running peak and drawdown over the whole history
#[derive(Debug, Clone, Default)]
pub struct DrawdownTracker {
    peak: Option<Decimal>,
}

impl DrawdownTracker {
    /// Create a tracker with no history
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the next equity value and return the current drawdown
    ///
    /// The result stays within `[0, 1]`: equity at or below zero under a
    /// positive peak reads as a full drawdown.
    pub fn update(&mut self, equity: Decimal) -> Decimal {
        let peak = match self.peak {
            Some(peak) if peak >= equity => peak,
            _ => equity,
        };
        self.peak = Some(peak);

        if peak <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        match peak.checked_sub(equity) {
            Some(loss) => (loss / peak).min(Decimal::ONE),
            None => Decimal::ONE,
        }
    }

    /// Highest equity observed so far
    pub fn peak(&self) -> Option<Decimal> {
        self.peak
    }
}

/// Rolling historical VaR on daily P&L
#[derive(Debug, Clone)]
pub struct HistoricalVar {
    config: VarConfig,
    pnl: VecDeque<Decimal>,
}

impl HistoricalVar {
    /// Create an estimator with an empty window
    pub fn new(config: VarConfig) -> Self {
        Self {
            config,
            pnl: VecDeque::with_capacity(config.window),
        }
    }

    /// Push a daily P&L value, evicting the oldest when full
    pub fn push(&mut self, daily_pnl: Decimal) {
        if self.pnl.len() == self.config.window {
            self.pnl.pop_front();
        }
        self.pnl.push_back(daily_pnl);
    }

    /// Number of observations currently held
    pub fn observations(&self) -> usize {
        self.pnl.len()
    }

    /// VaR as a non-negative loss, or `None` while the window is not full
    pub fn estimate(&self) -> Option<Decimal> {
        if self.pnl.len() < self.config.window.max(2) {
            return None;
        }

        let mut sorted: Vec<Decimal> = self.pnl.iter().copied().collect();
        sorted.sort();

        let tail = percentile(&sorted, Decimal::ONE - self.config.alpha)?;
        Some((-tail).max(Decimal::ZERO))
    }
}

/// Incremental drawdown + VaR over a growing equity curve
#[derive(Debug, Clone)]
pub struct RiskCalculator {
    drawdown: DrawdownTracker,
    var: HistoricalVar,
    prev_equity: Option<Decimal>,
}

impl RiskCalculator {
    /// Create a calculator with no history
    pub fn new(config: VarConfig) -> Self {
        Self {
            drawdown: DrawdownTracker::new(),
            var: HistoricalVar::new(config),
            prev_equity: None,
        }
    }

    /// Feed the newest equity point and return that day's risk
    pub fn update(&mut self, point: &EquityPoint) -> RiskPoint {
        let drawdown = self.drawdown.update(point.equity);

        if let Some(prev) = self.prev_equity {
            self.var.push(point.equity - prev);
        }
        self.prev_equity = Some(point.equity);

        RiskPoint {
            date: point.date,
            drawdown,
            var_estimate: self.var.estimate(),
        }
    }

    /// Risk for every point of a complete curve
    pub fn compute(config: VarConfig, curve: &[EquityPoint]) -> Vec<RiskPoint> {
        let mut calculator = Self::new(config);
        curve.iter().map(|p| calculator.update(p)).collect()
    }

    /// Highest equity observed so far
    pub fn peak_equity(&self) -> Option<Decimal> {
        self.drawdown.peak()
    }
}
