//! Price bar types

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One trading day of OHLCV data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBar {
    /// Trading day
    pub date: NaiveDate,
    /// Opening price
    pub open: Decimal,
    /// Session high
    pub high: Decimal,
    /// Session low
    pub low: Decimal,
    /// Closing price
    pub close: Decimal,
    /// Traded volume
    pub volume: u64,
}

/// Inclusive date filter; `None` bounds are open
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// Create a range from optional bounds
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// Check whether a date falls inside the range
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |s| date >= s) && self.end.map_or(true, |e| date <= e)
    }
}
