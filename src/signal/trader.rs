//! Demo trader turning crossover regimes into fills

use super::{crossover_regimes, Regime, TraderConfig};
use crate::execution::{ExecutionCosts, Fill, Side};
use crate::feed::PriceBar;
use crate::portfolio::PositionLedger;
use rust_decimal::Decimal;

/// Long-only crossover trader
///
/// Trades at each bar's open with slippage against it. The trader runs its
/// fills through a shadow ledger so it never buys more than it can pay for
/// and never sells more than it holds. The ledger remains the
/// source of truth once fills are generated.
#[derive(Debug, Clone)]
pub struct DemoTrader {
    config: TraderConfig,
    costs: ExecutionCosts,
}

impl DemoTrader {
    /// Create a trader
    pub fn new(config: TraderConfig, costs: ExecutionCosts) -> Self {
        Self { config, costs }
    }

    /// Trader configuration
    pub fn config(&self) -> &TraderConfig {
        &self.config
    }

    /// Decide one day's trade, if any
    ///
    /// Returns the side and quantity for a fill at `open`.
    pub fn decide(
        &self,
        regime: Regime,
        held: Decimal,
        cash: Decimal,
        open: Decimal,
    ) -> Option<(Side, Decimal)> {
        match regime {
            Regime::Long => {
                let price = self.costs.fill_price(open, Side::Buy);
                if price <= Decimal::ZERO {
                    return None;
                }
                let mut quantity = self.config.trade_size;
                if quantity * price + self.costs.commission > cash {
                    quantity = ((cash - self.costs.commission) / price).floor();
                }
                (quantity > Decimal::ZERO).then_some((Side::Buy, quantity))
            }
            Regime::Flat => {
                if held <= Decimal::ZERO {
                    return None;
                }
                Some((Side::Sell, self.config.trade_size.min(held)))
            }
        }
    }

    /// Generate fills for a bar series, at most one per day
    pub fn generate_fills(&self, bars: &[PriceBar], initial_cash: Decimal) -> Vec<Fill> {
        let closes: Vec<Decimal> = bars.iter().map(|b| b.close).collect();
        let regimes = crossover_regimes(&closes, self.config.fast, self.config.slow);

        let mut shadow = PositionLedger::new(initial_cash);
        let mut fills = Vec::new();

        for (bar, regime) in bars.iter().zip(regimes) {
            let state = shadow.state();
            let Some((side, quantity)) = self.decide(regime, state.quantity, state.cash, bar.open)
            else {
                continue;
            };

            let fill = Fill::new(
                bar.date,
                side,
                quantity,
                self.costs.fill_price(bar.open, side),
                self.costs.commission,
            );
            if let Err(e) = shadow.apply_fill(&fill) {
                tracing::warn!(date = %bar.date, error = %e, "Stopping demo fills");
                break;
            }
            fills.push(fill);
        }

        tracing::debug!(
            bars = bars.len(),
            fills = fills.len(),
            fast = self.config.fast,
            slow = self.config.slow,
            "Generated demo fills"
        );

        fills
    }
}
