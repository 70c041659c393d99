//! Aggregator output types

use crate::error::EngineError;
use crate::portfolio::PositionState;
use crate::risk::AlertRecord;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of the daily P&L and risk time series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub cash: Decimal,
    pub equity: Decimal,
    pub realized_pnl: Decimal,
    pub unrealized_pnl: Decimal,
    pub gross_exposure: Decimal,
    pub net_exposure: Decimal,
    /// Equity change from the previous day; `None` on the first day
    pub daily_pnl: Option<Decimal>,
    pub drawdown: Decimal,
    /// `None` until the VaR window is full
    pub var_estimate: Option<Decimal>,
}

/// Everything a run produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunOutput {
    /// Daily records, ascending by date
    pub records: Vec<DailyRecord>,
    /// Alert log in emission order
    pub alerts: Vec<AlertRecord>,
    /// Ledger state after the last processed day
    pub final_state: PositionState,
    /// Number of fills applied
    pub fills_applied: usize,
}

/// A run stopped on an error; `partial` holds every fully processed day
#[derive(Debug, Clone, thiserror::Error)]
#[error("run aborted after {} processed days: {error}", .partial.records.len())]
pub struct RunAborted {
    #[source]
    pub error: EngineError,
    pub partial: RunOutput,
}
