//! Parquet output for the daily time series and alert log
//!
//! Decimals are stored as UTF-8 strings to keep full precision; dates are
//! Date32 (days since the Unix epoch).

use crate::backtest::DailyRecord;
use crate::risk::{AlertRecord, LimitKind};
use arrow::array::{Array, ArrayRef, Date32Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use rust_decimal::Decimal;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

/// File name of the daily time series
pub const PNL_TIMESERIES_FILE: &str = "pnl_timeseries.parquet";
/// File name of the alert log
pub const ALERTS_FILE: &str = "alerts.parquet";

// Days from 0001-01-01 to 1970-01-01
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

fn date_to_days(date: NaiveDate) -> i32 {
    use chrono::Datelike;
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

fn days_to_date(days: i32) -> anyhow::Result<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days + UNIX_EPOCH_DAYS_FROM_CE)
        .ok_or_else(|| anyhow::anyhow!("Invalid Date32 value {}", days))
}

/// Daily record schema
pub fn daily_record_schema() -> Schema {
    Schema::new(vec![
        Field::new("date", DataType::Date32, false),
        Field::new("cash", DataType::Utf8, false),
        Field::new("equity", DataType::Utf8, false),
        Field::new("realized_pnl", DataType::Utf8, false),
        Field::new("unrealized_pnl", DataType::Utf8, false),
        Field::new("gross_exposure", DataType::Utf8, false),
        Field::new("net_exposure", DataType::Utf8, false),
        Field::new("daily_pnl", DataType::Utf8, true),
        Field::new("drawdown", DataType::Utf8, false),
        Field::new("var_estimate", DataType::Utf8, true),
    ])
}

/// Alert schema
pub fn alert_schema() -> Schema {
    Schema::new(vec![
        Field::new("date", DataType::Date32, false),
        Field::new("limit_name", DataType::Utf8, false),
        Field::new("observed_value", DataType::Utf8, false),
        Field::new("limit_value", DataType::Utf8, false),
    ])
}

fn decimal_column<'a, I>(values: I) -> ArrayRef
where
    I: Iterator<Item = &'a Decimal>,
{
    let strings: Vec<String> = values.map(|v| v.to_string()).collect();
    Arc::new(StringArray::from_iter_values(strings))
}

fn optional_decimal_column<I>(values: I) -> ArrayRef
where
    I: Iterator<Item = Option<Decimal>>,
{
    let strings: Vec<Option<String>> = values.map(|v| v.map(|d| d.to_string())).collect();
    Arc::new(StringArray::from(strings))
}

/// Writes run outputs into a directory
pub struct ParquetWriter {
    output_dir: PathBuf,
}

impl ParquetWriter {
    /// Create a new Parquet writer
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Ensure output directory exists
    pub fn ensure_dir(&self) -> anyhow::Result<()> {
        fs::create_dir_all(&self.output_dir)?;
        Ok(())
    }

    /// Output directory
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn write_batch(&self, file_name: &str, batch: RecordBatch) -> anyhow::Result<PathBuf> {
        self.ensure_dir()?;

        let path = self.output_dir.join(file_name);
        let file = File::create(&path)?;
        let props = WriterProperties::builder()
            .set_compression(Compression::SNAPPY)
            .build();

        let mut writer = ArrowWriter::try_new(file, batch.schema(), Some(props))?;
        writer.write(&batch)?;
        writer.close()?;

        Ok(path)
    }

    /// Write the daily time series; an empty slice still produces a file
    pub fn write_daily_records(&self, records: &[DailyRecord]) -> anyhow::Result<PathBuf> {
        let dates: Vec<i32> = records.iter().map(|r| date_to_days(r.date)).collect();

        let batch = RecordBatch::try_new(
            Arc::new(daily_record_schema()),
            vec![
                Arc::new(Date32Array::from(dates)) as ArrayRef,
                decimal_column(records.iter().map(|r| &r.cash)),
                decimal_column(records.iter().map(|r| &r.equity)),
                decimal_column(records.iter().map(|r| &r.realized_pnl)),
                decimal_column(records.iter().map(|r| &r.unrealized_pnl)),
                decimal_column(records.iter().map(|r| &r.gross_exposure)),
                decimal_column(records.iter().map(|r| &r.net_exposure)),
                optional_decimal_column(records.iter().map(|r| r.daily_pnl)),
                decimal_column(records.iter().map(|r| &r.drawdown)),
                optional_decimal_column(records.iter().map(|r| r.var_estimate)),
            ],
        )?;

        let path = self.write_batch(PNL_TIMESERIES_FILE, batch)?;
        tracing::debug!(path = ?path, count = records.len(), "Wrote daily records to Parquet");
        Ok(path)
    }

    /// Write the alert log; an empty slice still produces a file
    pub fn write_alerts(&self, alerts: &[AlertRecord]) -> anyhow::Result<PathBuf> {
        let dates: Vec<i32> = alerts.iter().map(|a| date_to_days(a.date)).collect();
        let names: Vec<&str> = alerts.iter().map(|a| a.limit_name.as_str()).collect();

        let batch = RecordBatch::try_new(
            Arc::new(alert_schema()),
            vec![
                Arc::new(Date32Array::from(dates)) as ArrayRef,
                Arc::new(StringArray::from(names)) as ArrayRef,
                decimal_column(alerts.iter().map(|a| &a.observed_value)),
                decimal_column(alerts.iter().map(|a| &a.limit_value)),
            ],
        )?;

        let path = self.write_batch(ALERTS_FILE, batch)?;
        tracing::debug!(path = ?path, count = alerts.len(), "Wrote alerts to Parquet");
        Ok(path)
    }
}

fn column<'a, T: 'static>(batch: &'a RecordBatch, name: &str) -> anyhow::Result<&'a T> {
    batch
        .column_by_name(name)
        .and_then(|c| c.as_any().downcast_ref::<T>())
        .ok_or_else(|| anyhow::anyhow!("Invalid {} column", name))
}

fn decimal_at(array: &StringArray, row: usize) -> anyhow::Result<Decimal> {
    Ok(Decimal::from_str(array.value(row))?)
}

fn optional_decimal_at(array: &StringArray, row: usize) -> anyhow::Result<Option<Decimal>> {
    if array.is_null(row) {
        return Ok(None);
    }
    decimal_at(array, row).map(Some)
}

/// Parquet file reader
pub struct ParquetReader {
    path: PathBuf,
}

impl ParquetReader {
    /// Create a new reader for a Parquet file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn batches(&self) -> anyhow::Result<Vec<RecordBatch>> {
        let file = File::open(&self.path)?;
        let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;
        Ok(reader.collect::<Result<Vec<_>, _>>()?)
    }

    /// Read daily records
    pub fn read_daily_records(&self) -> anyhow::Result<Vec<DailyRecord>> {
        let mut records = Vec::new();

        for batch in self.batches()? {
            let dates = column::<Date32Array>(&batch, "date")?;
            let cash = column::<StringArray>(&batch, "cash")?;
            let equity = column::<StringArray>(&batch, "equity")?;
            let realized = column::<StringArray>(&batch, "realized_pnl")?;
            let unrealized = column::<StringArray>(&batch, "unrealized_pnl")?;
            let gross = column::<StringArray>(&batch, "gross_exposure")?;
            let net = column::<StringArray>(&batch, "net_exposure")?;
            let daily_pnl = column::<StringArray>(&batch, "daily_pnl")?;
            let drawdown = column::<StringArray>(&batch, "drawdown")?;
            let var = column::<StringArray>(&batch, "var_estimate")?;

            for i in 0..batch.num_rows() {
                records.push(DailyRecord {
                    date: days_to_date(dates.value(i))?,
                    cash: decimal_at(cash, i)?,
                    equity: decimal_at(equity, i)?,
                    realized_pnl: decimal_at(realized, i)?,
                    unrealized_pnl: decimal_at(unrealized, i)?,
                    gross_exposure: decimal_at(gross, i)?,
                    net_exposure: decimal_at(net, i)?,
                    daily_pnl: optional_decimal_at(daily_pnl, i)?,
                    drawdown: decimal_at(drawdown, i)?,
                    var_estimate: optional_decimal_at(var, i)?,
                });
            }
        }

        Ok(records)
    }

    /// Read alert records
    pub fn read_alerts(&self) -> anyhow::Result<Vec<AlertRecord>> {
        let mut alerts = Vec::new();

        for batch in self.batches()? {
            let dates = column::<Date32Array>(&batch, "date")?;
            let names = column::<StringArray>(&batch, "limit_name")?;
            let observed = column::<StringArray>(&batch, "observed_value")?;
            let limits = column::<StringArray>(&batch, "limit_value")?;

            for i in 0..batch.num_rows() {
                alerts.push(AlertRecord {
                    date: days_to_date(dates.value(i))?,
                    limit_name: LimitKind::from_str(names.value(i))
                        .map_err(|e| anyhow::anyhow!(e))?,
                    observed_value: decimal_at(observed, i)?,
                    limit_value: decimal_at(limits, i)?,
                });
            }
        }

        Ok(alerts)
    }

    /// Get the file path
    pub fn path(&self) -> &Path {
        &self.path
    }
}
