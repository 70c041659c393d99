//! CLI interface for pnl-risk
//!
//! Provides subcommands for:
//! - `run`: Run the daily P&L and risk aggregation for one symbol
//! - `fetch`: Download and cache daily prices only
//! - `config`: Show the effective configuration

mod fetch;
mod run;

pub use fetch::FetchArgs;
pub use run::RunArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "pnl-risk")]
#[command(about = "Daily PnL and risk aggregator with drawdown, historical VaR and limit alerts")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run aggregation and write outputs
    Run(RunArgs),
    /// Download daily prices into the cache
    Fetch(FetchArgs),
    /// Show the effective configuration
    Config,
}
