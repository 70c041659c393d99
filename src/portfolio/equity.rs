//! Daily mark-to-market equity curve

use super::PositionState;
use crate::error::{EngineError, EngineResult};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Portfolio valuation at one day's close
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquityPoint {
    /// Trading day
    pub date: NaiveDate,
    /// Cash plus signed market value
    pub equity: Decimal,
    /// Unrealized P&L of the open quantity
    pub unrealized_pnl: Decimal,
    /// Absolute market value
    pub gross_exposure: Decimal,
    /// Signed market value
    pub net_exposure: Decimal,
}

impl EquityPoint {
    /// Value a position at a closing price
    pub fn from_state(date: NaiveDate, close: Decimal, state: &PositionState) -> Self {
        let market_value = state.market_value(close);
        Self {
            date,
            equity: state.cash + market_value,
            unrealized_pnl: state.unrealized_pnl(close),
            gross_exposure: market_value.abs(),
            net_exposure: market_value,
        }
    }
}

/// Append-only equity curve, strictly increasing by date
#[derive(Debug, Clone, Default)]
pub struct EquityTracker {
    curve: Vec<EquityPoint>,
}

impl EquityTracker {
    /// Create an empty tracker
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a position at a day's close and append the point
    pub fn observe(
        &mut self,
        date: NaiveDate,
        close: Decimal,
        state: &PositionState,
    ) -> EngineResult<EquityPoint> {
        if let Some(last) = self.curve.last() {
            if date <= last.date {
                return Err(EngineError::OutOfOrderObservation {
                    date,
                    previous: last.date,
                });
            }
        }
        if close <= Decimal::ZERO {
            return Err(EngineError::InvalidPriceBar {
                date,
                reason: format!("close must be positive, got {}", close),
            });
        }

        let point = EquityPoint::from_state(date, close, state);
        self.curve.push(point.clone());
        Ok(point)
    }

    /// All points observed so far
    pub fn curve(&self) -> &[EquityPoint] {
        &self.curve
    }

    /// Most recent point
    pub fn last(&self) -> Option<&EquityPoint> {
        self.curve.last()
    }

    /// Number of points
    pub fn len(&self) -> usize {
        self.curve.len()
    }

    /// Check if no point has been observed
    pub fn is_empty(&self) -> bool {
        self.curve.is_empty()
    }
}
