//! Stooq daily CSV download with on-disk cache

use super::{load_bars, DateRange, PriceBar, PriceSource};
use async_trait::async_trait;
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;

/// Stooq base URL
pub const STOOQ_BASE_URL: &str = "https://stooq.com";

/// Configuration for the Stooq client
#[derive(Debug, Clone)]
pub struct StooqConfig {
    /// Base URL for the Stooq site
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
    /// Directory holding cached CSV files
    pub cache_dir: PathBuf,
    /// Re-download even when a cached file exists
    pub force_download: bool,
}

impl Default for StooqConfig {
    fn default() -> Self {
        Self {
            base_url: STOOQ_BASE_URL.to_string(),
            timeout: Duration::from_secs(20),
            cache_dir: PathBuf::from("data"),
            force_download: false,
        }
    }
}

/// Client for Stooq daily OHLCV exports
pub struct StooqClient {
    config: StooqConfig,
    client: Client,
}

impl StooqClient {
    /// Create a new client
    pub fn new(config: StooqConfig) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    /// Download URL for a symbol (e.g. `spy.us`)
    pub fn url(&self, symbol: &str) -> String {
        format!(
            "{}/q/d/l/?s={}&i=d",
            self.config.base_url.trim_end_matches('/'),
            symbol.trim().to_lowercase()
        )
    }

    /// Cache file path for a symbol
    pub fn cache_path(&self, symbol: &str) -> PathBuf {
        let name = format!("{}_stooq_d.csv", symbol.trim().to_lowercase().replace('/', "_"));
        self.config.cache_dir.join(name)
    }

    /// Ensure the symbol's CSV is cached locally and return its path
    pub async fn download_csv(&self, symbol: &str, force: bool) -> anyhow::Result<PathBuf> {
        let path = self.cache_path(symbol);
        if !force && tokio::fs::try_exists(&path).await? {
            tracing::debug!(path = %path.display(), "Using cached price CSV");
            return Ok(path);
        }

        tokio::fs::create_dir_all(&self.config.cache_dir).await?;

        let url = self.url(symbol);
        tracing::info!(url = %url, "Downloading daily bars from Stooq");

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Stooq error: {} - {}", status, body);
        }

        let body = response.bytes().await?;
        // Stooq answers unknown symbols with 200 and a plain-text body
        if !body.starts_with(b"Date") {
            let preview = String::from_utf8_lossy(&body[..body.len().min(80)]).into_owned();
            anyhow::bail!("Stooq returned no data for {}: {}", symbol, preview.trim());
        }

        tokio::fs::write(&path, &body).await?;
        tracing::info!(path = %path.display(), bytes = body.len(), "Cached price CSV");
        Ok(path)
    }
}

#[async_trait]
impl PriceSource for StooqClient {
    async fn fetch_bars(&self, symbol: &str, range: &DateRange) -> anyhow::Result<Vec<PriceBar>> {
        let path = self.download_csv(symbol, self.config.force_download).await?;
        let mut bars = load_bars(&path)?;
        bars.retain(|b| range.contains(b.date));
        Ok(bars)
    }
}
