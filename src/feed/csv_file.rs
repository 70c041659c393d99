//! Daily OHLCV CSV parsing
//!
//! Canonical layout is the Stooq export: `Date,Open,High,Low,Close,Volume`.
//! Volume is optional. Rows whose prices do not parse are dropped.

use super::{DateRange, PriceBar, PriceSource};
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;

const REQUIRED_COLUMNS: [&str; 5] = ["Date", "Open", "High", "Low", "Close"];

/// Parse bars from any CSV reader, sorted ascending by date
pub fn parse_bars<R: Read>(input: R) -> anyhow::Result<Vec<PriceBar>> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(input);
    let headers = reader.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h == name);

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|name| column(name).is_none())
        .collect();
    if !missing.is_empty() {
        anyhow::bail!(
            "CSV missing columns {:?}. Columns={:?}",
            missing,
            headers.iter().collect::<Vec<_>>()
        );
    }

    // Presence checked above
    let idx = |name: &str| column(name).unwrap_or_default();
    let (date_idx, open_idx, high_idx, low_idx, close_idx) =
        (idx("Date"), idx("Open"), idx("High"), idx("Low"), idx("Close"));
    let volume_idx = column("Volume");

    let mut bars = Vec::new();
    let mut dropped = 0usize;

    for record in reader.records() {
        let record = record?;
        let field = |i: usize| record.get(i).unwrap_or("");

        let date = NaiveDate::parse_from_str(field(date_idx), "%Y-%m-%d")?;
        let prices = [open_idx, high_idx, low_idx, close_idx]
            .map(|i| Decimal::from_str(field(i)).ok());
        let [Some(open), Some(high), Some(low), Some(close)] = prices else {
            dropped += 1;
            continue;
        };

        let volume = volume_idx
            .and_then(|i| Decimal::from_str(field(i)).ok())
            .and_then(|v| v.trunc().to_u64())
            .unwrap_or(0);

        bars.push(PriceBar {
            date,
            open,
            high,
            low,
            close,
            volume,
        });
    }

    if dropped > 0 {
        tracing::warn!(dropped, "Dropped CSV rows with unparsable prices");
    }

    bars.sort_by_key(|b| b.date);
    Ok(bars)
}

/// Load bars from a CSV file on disk
pub fn load_bars(path: impl AsRef<Path>) -> anyhow::Result<Vec<PriceBar>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .map_err(|e| anyhow::anyhow!("Failed to open {}: {}", path.display(), e))?;
    let bars = parse_bars(file)?;
    tracing::debug!(path = %path.display(), count = bars.len(), "Loaded price bars");
    Ok(bars)
}

/// Price source backed by a single local CSV file
pub struct CsvFileSource {
    path: PathBuf,
}

impl CsvFileSource {
    /// Create a source reading from the given path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PriceSource for CsvFileSource {
    async fn fetch_bars(&self, _symbol: &str, range: &DateRange) -> anyhow::Result<Vec<PriceBar>> {
        let mut bars = load_bars(&self.path)?;
        bars.retain(|b| range.contains(b.date));
        Ok(bars)
    }
}
