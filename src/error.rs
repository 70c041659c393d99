//! Engine error types

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that abort an aggregation run
///
/// Every variant is detected at the point of occurrence. Output produced for
/// days before the failing one stays valid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// Fill rejected by the ledger or by fill/bar pairing
    #[error("Invalid fill on {date}: {reason}")]
    InvalidFill { date: NaiveDate, reason: String },
    /// Observation date not strictly after the previous one
    #[error("Out-of-order observation: {date} does not follow {previous}")]
    OutOfOrderObservation {
        date: NaiveDate,
        previous: NaiveDate,
    },
    /// Price bar unusable for marking
    #[error("Invalid price bar on {date}: {reason}")]
    InvalidPriceBar { date: NaiveDate, reason: String },
    /// Run configuration rejected before processing
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

impl EngineError {
    /// Date of the offending input, if the error is tied to one
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            EngineError::InvalidFill { date, .. }
            | EngineError::OutOfOrderObservation { date, .. }
            | EngineError::InvalidPriceBar { date, .. } => Some(*date),
            EngineError::InvalidConfiguration(_) => None,
        }
    }

    pub(crate) fn invalid_fill(date: NaiveDate, reason: impl Into<String>) -> Self {
        EngineError::InvalidFill {
            date,
            reason: reason.into(),
        }
    }
}

/// Result alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
