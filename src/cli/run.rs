//! Run command implementation

use crate::backtest::{DailyAggregator, RunSummary};
use crate::config::Config;
use crate::data::write_run_outputs;
use crate::execution::{load_fills, Fill};
use crate::feed::{CsvFileSource, DateRange, PriceBar, PriceSource, StooqClient};
use crate::signal::DemoTrader;
use chrono::NaiveDate;
use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Stooq symbol, e.g. spy.us
    #[arg(long)]
    pub symbol: String,

    /// First trading day (YYYY-MM-DD, inclusive)
    #[arg(long)]
    pub start: Option<NaiveDate>,

    /// Last trading day (YYYY-MM-DD, inclusive)
    #[arg(long)]
    pub end: Option<NaiveDate>,

    /// Read prices from a local CSV instead of Stooq
    #[arg(long)]
    pub prices: Option<PathBuf>,

    /// Read fills from a CSV blotter instead of the demo trader
    #[arg(long)]
    pub fills: Option<PathBuf>,

    /// Re-download prices even when cached
    #[arg(long)]
    pub force_download: bool,

    /// Output directory (overrides config)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Summary format: json or table
    #[arg(long, default_value = "table")]
    pub format: String,
}

impl RunArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let range = DateRange::new(self.start, self.end);
        let bars = self.load_bars(config, &range).await?;
        if bars.is_empty() {
            anyhow::bail!("No price data for {} in the requested range", self.symbol);
        }

        let fills = self.load_fills(config, &bars, &range)?;
        tracing::info!(
            symbol = %self.symbol,
            bars = bars.len(),
            fills = fills.len(),
            "Inputs loaded"
        );

        let aggregator = DailyAggregator::new(config.engine.clone())?;
        let (output, error) = match aggregator.run(&bars, &fills) {
            Ok(output) => (output, None),
            Err(aborted) => (aborted.partial, Some(aborted.error)),
        };

        let summary = RunSummary::new(&self.symbol, &config.engine, &config.execution, &output);
        let output_dir = self.output.as_ref().unwrap_or(&config.output.dir);
        let paths = write_run_outputs(
            output_dir,
            &self.symbol,
            &summary,
            &output,
            error.as_ref().map(|e| e.to_string()),
        )?;

        if let Some(error) = error {
            return Err(anyhow::Error::new(error).context(format!(
                "Run aborted; partial outputs for {} days written to {}",
                output.records.len(),
                output_dir.display()
            )));
        }

        if self.format == "json" {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else {
            println!("{}", summary.format_table());
            println!("Outputs:");
            for path in [
                &paths.pnl_timeseries,
                &paths.alerts,
                &paths.positions,
                &paths.risk_report,
            ] {
                println!("  - {}", path.display());
            }
        }

        Ok(())
    }

    async fn load_bars(&self, config: &Config, range: &DateRange) -> anyhow::Result<Vec<PriceBar>> {
        match &self.prices {
            Some(path) => CsvFileSource::new(path).fetch_bars(&self.symbol, range).await,
            None => {
                let client = StooqClient::new(config.data.stooq_config(self.force_download))?;
                client.fetch_bars(&self.symbol, range).await
            }
        }
    }

    fn load_fills(
        &self,
        config: &Config,
        bars: &[PriceBar],
        range: &DateRange,
    ) -> anyhow::Result<Vec<Fill>> {
        if let Some(path) = &self.fills {
            let mut fills = load_fills(path)?;
            let total = fills.len();
            fills.retain(|f| range.contains(f.date));
            if fills.len() < total {
                tracing::info!(
                    dropped = total - fills.len(),
                    "Ignoring blotter fills outside the date range"
                );
            }
            return Ok(fills);
        }

        config.trader.validate()?;
        let min_history = config.trader.min_history();
        if bars.len() < min_history {
            anyhow::bail!(
                "Not enough data: {} bars, the demo trader needs at least {}",
                bars.len(),
                min_history
            );
        }

        let trader = DemoTrader::new(config.trader.clone(), config.execution.clone());
        Ok(trader.generate_fills(bars, config.engine.initial_cash))
    }
}
