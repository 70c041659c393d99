//! Run summary and reporting

use super::RunOutput;
use crate::config::EngineConfig;
use crate::execution::ExecutionCosts;
use crate::risk::RiskLimits;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Summary statistics for a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub symbol: String,
    /// First processed day
    pub start: Option<NaiveDate>,
    /// Last processed day
    pub end: Option<NaiveDate>,
    pub days: usize,
    pub initial_cash: Decimal,
    pub final_equity: Decimal,
    pub realized_pnl: Decimal,
    pub unrealized_pnl: Decimal,
    /// Drawdown on the last day
    pub final_drawdown: Decimal,
    pub max_drawdown: Decimal,
    pub max_gross_exposure: Decimal,
    /// Largest VaR estimate; `None` if the window never filled
    pub max_var: Option<Decimal>,
    pub num_fills: usize,
    pub num_alerts: usize,
    pub limits: RiskLimits,
    pub var_window: usize,
    pub var_alpha: Decimal,
    pub execution: ExecutionCosts,
}

impl RunSummary {
    /// Summarize a run's output
    pub fn new(
        symbol: impl Into<String>,
        config: &EngineConfig,
        execution: &ExecutionCosts,
        output: &RunOutput,
    ) -> Self {
        let records = &output.records;
        let last = records.last();

        Self {
            symbol: symbol.into(),
            start: records.first().map(|r| r.date),
            end: last.map(|r| r.date),
            days: records.len(),
            initial_cash: config.initial_cash,
            final_equity: last.map_or(config.initial_cash, |r| r.equity),
            realized_pnl: output.final_state.realized_pnl,
            unrealized_pnl: last.map_or(Decimal::ZERO, |r| r.unrealized_pnl),
            final_drawdown: last.map_or(Decimal::ZERO, |r| r.drawdown),
            max_drawdown: records
                .iter()
                .map(|r| r.drawdown)
                .max()
                .unwrap_or(Decimal::ZERO),
            max_gross_exposure: records
                .iter()
                .map(|r| r.gross_exposure)
                .max()
                .unwrap_or(Decimal::ZERO),
            max_var: records.iter().filter_map(|r| r.var_estimate).max(),
            num_fills: output.fills_applied,
            num_alerts: output.alerts.len(),
            limits: config.limits.clone(),
            var_window: config.var_window,
            var_alpha: config.var_alpha,
            execution: execution.clone(),
        }
    }

    /// Total return on initial cash
    pub fn total_return(&self) -> Decimal {
        if self.initial_cash.is_zero() {
            return Decimal::ZERO;
        }
        (self.final_equity - self.initial_cash) / self.initial_cash
    }

    /// Format as table for CLI output
    pub fn format_table(&self) -> String {
        let date = |d: Option<NaiveDate>| d.map_or_else(|| "-".to_string(), |d| d.to_string());
        let opt = |v: Option<Decimal>| v.map_or_else(|| "n/a".to_string(), |v| format!("{:.2}", v));

        format!(
            r#"
══════════════════════════════════════════════════════
               RUN SUMMARY: {}
══════════════════════════════════════════════════════

PERIOD
───────────────────────────────────────────────────────
Start:            {}
End:              {}
Trading Days:     {}

PERFORMANCE
───────────────────────────────────────────────────────
Initial Cash:     {:.2}
Final Equity:     {:.2} ({:+.2}%)
Realized P&L:     {:+.2}
Unrealized P&L:   {:+.2}

RISK
───────────────────────────────────────────────────────
Final Drawdown:   {:.2}%
Max Drawdown:     {:.2}%
Max Gross Exp.:   {:.2}
Max VaR ({}d @ {}): {}

ACTIVITY
───────────────────────────────────────────────────────
Fills:            {}
Alerts:           {}
══════════════════════════════════════════════════════
"#,
            self.symbol,
            date(self.start),
            date(self.end),
            self.days,
            self.initial_cash,
            self.final_equity,
            self.total_return() * dec!(100),
            self.realized_pnl,
            self.unrealized_pnl,
            self.final_drawdown * dec!(100),
            self.max_drawdown * dec!(100),
            self.max_gross_exposure,
            self.var_window,
            self.var_alpha,
            opt(self.max_var),
            self.num_fills,
            self.num_alerts,
        )
    }
}
