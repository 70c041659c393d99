//! Price source module
//!
//! Daily OHLCV bars for a single instrument, from Stooq or a local CSV file

mod csv_file;
mod stooq;
mod types;

pub use csv_file::{load_bars, parse_bars, CsvFileSource};
pub use stooq::{StooqClient, StooqConfig, STOOQ_BASE_URL};
pub use types::{DateRange, PriceBar};

use async_trait::async_trait;

/// Trait for price source implementations
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Fetch ascending daily bars for a symbol, restricted to a date range
    async fn fetch_bars(&self, symbol: &str, range: &DateRange) -> anyhow::Result<Vec<PriceBar>>;
}
