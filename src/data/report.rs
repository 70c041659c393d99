//! JSON reports: end-of-run positions and the risk summary

use crate::backtest::RunSummary;
use crate::portfolio::PositionState;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the positions snapshot
pub const POSITIONS_FILE: &str = "positions.json";
/// File name of the risk report
pub const RISK_REPORT_FILE: &str = "risk_report.json";

/// End-of-run position for one instrument
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionSnapshot {
    pub symbol: String,
    pub quantity: Decimal,
    pub avg_cost: Decimal,
    pub cash: Decimal,
    pub realized_pnl: Decimal,
}

impl PositionSnapshot {
    /// Snapshot a ledger state
    pub fn new(symbol: impl Into<String>, state: &PositionState) -> Self {
        Self {
            symbol: symbol.into(),
            quantity: state.quantity,
            avg_cost: state.avg_cost,
            cash: state.cash,
            realized_pnl: state.realized_pnl,
        }
    }
}

/// Risk report: the run summary plus the abort reason, if any
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskReport {
    #[serde(flatten)]
    pub summary: RunSummary,
    /// Error that stopped the run early
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aborted: Option<String>,
}

/// Writes pretty-printed JSON reports into a directory
pub struct ReportWriter {
    output_dir: PathBuf,
}

impl ReportWriter {
    /// Create a new report writer
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    fn write_json<T: Serialize>(&self, file_name: &str, value: &T) -> anyhow::Result<PathBuf> {
        fs::create_dir_all(&self.output_dir)?;
        let path = self.output_dir.join(file_name);
        fs::write(&path, serde_json::to_string_pretty(value)?)?;
        tracing::debug!(path = ?path, "Wrote JSON report");
        Ok(path)
    }

    /// Write `positions.json` (a one-element array)
    pub fn write_positions(&self, positions: &[PositionSnapshot]) -> anyhow::Result<PathBuf> {
        self.write_json(POSITIONS_FILE, &positions)
    }

    /// Write `risk_report.json`
    pub fn write_risk_report(&self, report: &RiskReport) -> anyhow::Result<PathBuf> {
        self.write_json(RISK_REPORT_FILE, report)
    }
}

/// Read a risk report back
pub fn read_risk_report(path: impl AsRef<Path>) -> anyhow::Result<RiskReport> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
