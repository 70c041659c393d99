//! Configuration loading tests

use pnl_risk::config::{Config, EngineConfig};
use pnl_risk::risk::RiskLimits;
use pnl_risk::telemetry::LogFormat;
use rust_decimal_macros::dec;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn test_load_config_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
        [engine]
        initial_cash = 250000
        var_window = 60

        [engine.limits]
        max_gross_exposure = 500000
        max_var = 4000

        [trader]
        fast = 5
        slow = 30

        [telemetry]
        log_format = "json"
        "#
    )
    .unwrap();

    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.engine.initial_cash, dec!(250000));
    assert_eq!(config.engine.var_window, 60);
    assert_eq!(config.engine.var_alpha, dec!(0.99));
    // Unset limits inside a present table are unlimited
    assert_eq!(
        config.engine.limits,
        RiskLimits {
            max_gross_exposure: Some(dec!(500000)),
            max_drawdown: None,
            max_var: Some(dec!(4000)),
        }
    );
    assert_eq!(config.trader.trade_size, dec!(25));
    assert_eq!(config.telemetry.log_format, LogFormat::Json);
    assert!(config.engine.validate().is_ok());
}

#[test]
fn test_default_config_matches_command_line_defaults() {
    let config = Config::default();
    assert_eq!(config.engine.initial_cash, dec!(100000));
    assert_eq!(config.engine.var_window, 250);
    assert_eq!(config.engine.limits, RiskLimits::standard());
    assert_eq!(config.execution.slippage_bps, dec!(2));
    assert_eq!(config.execution.commission, dec!(1));
    assert_eq!(config.trader.fast, 20);
    assert_eq!(config.trader.slow, 100);
    assert_eq!(config.trader.trade_size, dec!(25));
}

#[test]
fn test_rendered_config_loads_back() {
    let config = Config::default();
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(config.to_toml().unwrap().as_bytes()).unwrap();

    let loaded = Config::load(file.path()).unwrap();
    assert_eq!(loaded.engine, config.engine);
    assert_eq!(loaded.execution, config.execution);
    assert_eq!(loaded.trader, config.trader);
}

#[test]
fn test_malformed_config_is_an_error() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "[engine]\nvar_window = \"many\"\n").unwrap();
    assert!(Config::load(file.path()).is_err());
}

#[test]
fn test_invalid_engine_values_rejected_by_validate() {
    let config: Config = toml::from_str("[engine]\nvar_alpha = 1.5\n").unwrap();
    assert!(config.engine.validate().is_err());
    assert!(EngineConfig::default().validate().is_ok());
}

#[test]
fn test_example_config_matches_defaults() {
    let config: Config = toml::from_str(include_str!("../../config.toml.example")).unwrap();
    let defaults = Config::default();
    assert_eq!(config.engine, defaults.engine);
    assert_eq!(config.execution, defaults.execution);
    assert_eq!(config.trader, defaults.trader);
    assert_eq!(config.data.base_url, defaults.data.base_url);
    assert!(config.telemetry.metrics_port.is_none());
}
