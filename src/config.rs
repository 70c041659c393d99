//! Configuration types for pnl-risk

use crate::error::{EngineError, EngineResult};
use crate::execution::ExecutionCosts;
use crate::feed::StooqConfig;
use crate::risk::{RiskLimits, VarConfig};
use crate::signal::TraderConfig;
use crate::telemetry::LogFormat;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub execution: ExecutionCosts,
    #[serde(default)]
    pub trader: TraderConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Accounting and risk engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Starting cash balance
    #[serde(default = "default_initial_cash")]
    pub initial_cash: Decimal,
    /// Daily P&L observations in the VaR window
    #[serde(default = "default_var_window")]
    pub var_window: usize,
    /// VaR confidence level
    #[serde(default = "default_var_alpha")]
    pub var_alpha: Decimal,
    /// Limits checked every day
    #[serde(default = "RiskLimits::standard")]
    pub limits: RiskLimits,
}

fn default_initial_cash() -> Decimal {
    dec!(100000)
}
fn default_var_window() -> usize {
    250
}
fn default_var_alpha() -> Decimal {
    dec!(0.99)
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            initial_cash: default_initial_cash(),
            var_window: default_var_window(),
            var_alpha: default_var_alpha(),
            limits: RiskLimits::standard(),
        }
    }
}

impl EngineConfig {
    /// Reject configurations the engine cannot run with
    pub fn validate(&self) -> EngineResult<()> {
        let invalid = |msg: String| Err(EngineError::InvalidConfiguration(msg));

        if self.initial_cash <= Decimal::ZERO {
            return invalid(format!(
                "initial_cash must be positive, got {}",
                self.initial_cash
            ));
        }
        if self.var_window < 2 {
            return invalid(format!("var_window must be >= 2, got {}", self.var_window));
        }
        if self.var_alpha <= Decimal::ZERO || self.var_alpha >= Decimal::ONE {
            return invalid(format!(
                "var_alpha must be in (0, 1), got {}",
                self.var_alpha
            ));
        }

        let limits = &self.limits;
        if let Some(dd) = limits.max_drawdown {
            if dd < Decimal::ZERO || dd > Decimal::ONE {
                return invalid(format!("max_drawdown must be in [0, 1], got {}", dd));
            }
        }
        if let Some(gross) = limits.max_gross_exposure {
            if gross < Decimal::ZERO {
                return invalid(format!(
                    "max_gross_exposure must be non-negative, got {}",
                    gross
                ));
            }
        }
        if let Some(var) = limits.max_var {
            if var < Decimal::ZERO {
                return invalid(format!("max_var must be non-negative, got {}", var));
            }
        }

        Ok(())
    }

    /// VaR parameters for the risk calculator
    pub fn var_config(&self) -> VarConfig {
        VarConfig {
            window: self.var_window,
            alpha: self.var_alpha,
        }
    }
}

/// Price data configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory for cached CSV downloads
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,
    /// Stooq base URL
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// HTTP timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("data")
}
fn default_base_url() -> String {
    crate::feed::STOOQ_BASE_URL.to_string()
}
fn default_timeout_secs() -> u64 {
    20
}

impl DataConfig {
    /// Client settings for the Stooq downloader
    pub fn stooq_config(&self, force_download: bool) -> StooqConfig {
        StooqConfig {
            base_url: self.base_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            cache_dir: self.cache_dir.clone(),
            force_download,
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            cache_dir: default_cache_dir(),
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving Parquet and JSON outputs
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("outputs")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
    /// Prometheus listener port; metrics stay in-process when unset
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            metrics_port: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Render as TOML
    pub fn to_toml(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
