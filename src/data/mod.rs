//! Output module
//!
//! Persists run results: Parquet time series and alert log, JSON
//! position snapshot and risk report

mod parquet;
mod report;

pub use self::parquet::{
    alert_schema, daily_record_schema, ParquetReader, ParquetWriter, ALERTS_FILE,
    PNL_TIMESERIES_FILE,
};
pub use report::{
    read_risk_report, PositionSnapshot, ReportWriter, RiskReport, POSITIONS_FILE,
    RISK_REPORT_FILE,
};

use crate::backtest::{RunOutput, RunSummary};
use std::path::{Path, PathBuf};

/// Paths of the files written for one run
#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub pnl_timeseries: PathBuf,
    pub alerts: PathBuf,
    pub positions: PathBuf,
    pub risk_report: PathBuf,
}

/// Write every output file for a finished or aborted run
pub fn write_run_outputs(
    output_dir: &Path,
    symbol: &str,
    summary: &RunSummary,
    output: &RunOutput,
    aborted: Option<String>,
) -> anyhow::Result<OutputPaths> {
    let parquet = ParquetWriter::new(output_dir);
    let reports = ReportWriter::new(output_dir);

    let paths = OutputPaths {
        pnl_timeseries: parquet.write_daily_records(&output.records)?,
        alerts: parquet.write_alerts(&output.alerts)?,
        positions: reports.write_positions(&[PositionSnapshot::new(symbol, &output.final_state)])?,
        risk_report: reports.write_risk_report(&RiskReport {
            summary: summary.clone(),
            aborted,
        })?,
    };

    tracing::info!(dir = ?output_dir, "Outputs written");
    Ok(paths)
}
