//! Risk module
//!
//! Running drawdown, rolling historical VaR and limit alerts computed from the
//! daily equity curve

mod calculator;
mod limits;
mod types;

pub use calculator::{percentile, DrawdownTracker, HistoricalVar, RiskCalculator, VarConfig};
pub use limits::{check_limits, LimitMonitor, RiskLimits};
pub use types::{AlertRecord, LimitKind, RiskPoint};
