//! pnl-risk: daily PnL and risk aggregator
//!
//! This library provides the core components for:
//! - Position and cash accounting with average-cost P&L
//! - Daily mark-to-market equity curve
//! - Drawdown and rolling historical VaR
//! - Risk limit monitoring with an alert log
//! - Daily aggregation of fills, marks and risk into a time series
//! - Price download from Stooq and CSV loading
//! - A moving-average crossover demo trader
//! - Parquet and JSON output
//! - Structured logging and Prometheus metrics

pub mod backtest;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod execution;
pub mod feed;
pub mod portfolio;
pub mod risk;
pub mod signal;
pub mod telemetry;
