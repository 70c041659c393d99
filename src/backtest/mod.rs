//! Daily aggregation module
//!
//! Drives the ledger, equity curve, risk calculator and limit monitor
//! through a series of trading days.

mod aggregator;
mod analytics;
mod replay;
mod types;

pub use aggregator::DailyAggregator;
pub use analytics::RunSummary;
pub use replay::{DaySchedule, TradingDay};
pub use types::{DailyRecord, RunAborted, RunOutput};
