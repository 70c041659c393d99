use anyhow::Context;
use clap::Parser;
use pnl_risk::cli::{Cli, Commands};
use pnl_risk::config::Config;
use std::path::Path;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = if Path::new(&cli.config).exists() {
        Config::load(&cli.config)
            .with_context(|| format!("Failed to load config from {}", cli.config))?
    } else {
        eprintln!("Warning: {} not found, using default configuration", cli.config);
        Config::default()
    };

    // Initialize telemetry
    let _telemetry = pnl_risk::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Run(args) => {
            tracing::info!(symbol = %args.symbol, "Starting run");
            args.execute(&config).await?;
        }
        Commands::Fetch(args) => {
            tracing::info!(symbol = %args.symbol, "Fetching prices");
            args.execute(&config).await?;
        }
        Commands::Config => {
            print!("{}", config.to_toml()?);
        }
    }

    Ok(())
}
