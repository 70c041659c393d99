//! Fetch command implementation

use crate::config::Config;
use crate::feed::{load_bars, StooqClient};
use clap::Args;

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Stooq symbol, e.g. spy.us
    #[arg(long)]
    pub symbol: String,

    /// Re-download even when a cached file exists
    #[arg(long)]
    pub force: bool,
}

impl FetchArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let client = StooqClient::new(config.data.stooq_config(self.force))?;
        let path = client.download_csv(&self.symbol, self.force).await?;
        let bars = load_bars(&path)?;

        tracing::info!(symbol = %self.symbol, path = ?path, bars = bars.len(), "Prices cached");
        println!("{} bars cached at {}", bars.len(), path.display());
        Ok(())
    }
}
