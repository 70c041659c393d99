//! Portfolio accounting module
//!
//! Position/cash ledger and the daily mark-to-market equity curve

mod equity;
mod ledger;

pub use equity::{EquityPoint, EquityTracker};
pub use ledger::{PositionLedger, PositionState};
