//! Fill blotter CSV loader
//!
//! Columns: `date,side,quantity,price[,commission]`. Rows must already be in
//! date order; ordering is enforced later by the aggregator.

use super::{Fill, Side};
use crate::error::EngineError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Deserialize)]
struct BlotterRow {
    date: NaiveDate,
    side: String,
    quantity: String,
    price: String,
    #[serde(default)]
    commission: Option<String>,
}

fn parse_decimal(date: NaiveDate, field: &str, raw: &str) -> Result<Decimal, EngineError> {
    Decimal::from_str(raw.trim())
        .map_err(|e| EngineError::invalid_fill(date, format!("bad {} {:?}: {}", field, raw, e)))
}

impl BlotterRow {
    fn into_fill(self) -> Result<Fill, EngineError> {
        let date = self.date;
        let side = Side::from_str(&self.side).map_err(|e| EngineError::invalid_fill(date, e))?;
        let commission = match self.commission.as_deref() {
            Some(raw) if !raw.trim().is_empty() => parse_decimal(date, "commission", raw)?,
            _ => Decimal::ZERO,
        };
        let fill = Fill::new(
            date,
            side,
            parse_decimal(date, "quantity", &self.quantity)?,
            parse_decimal(date, "price", &self.price)?,
            commission,
        );
        fill.validate()?;
        Ok(fill)
    }
}

/// Parse fills from any CSV reader
pub fn parse_fills<R: Read>(input: R) -> anyhow::Result<Vec<Fill>> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(input);
    let mut fills = Vec::new();
    for row in reader.deserialize::<BlotterRow>() {
        fills.push(row?.into_fill()?);
    }
    Ok(fills)
}

/// Load fills from a CSV blotter file
pub fn load_fills(path: impl AsRef<Path>) -> anyhow::Result<Vec<Fill>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .map_err(|e| anyhow::anyhow!("Failed to open {}: {}", path.display(), e))?;
    let fills = parse_fills(file)?;
    tracing::debug!(path = %path.display(), count = fills.len(), "Loaded fill blotter");
    Ok(fills)
}
