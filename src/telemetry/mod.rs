//! Telemetry module
//!
//! Structured logging and Prometheus metrics

mod logging;
mod metrics;

pub use self::logging::{init_logging, LogFormat};
pub use self::metrics::{record_alerts, record_day, record_fills, set_gauge, GaugeMetric};

use crate::config::TelemetryConfig;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Guard holding telemetry state for the life of the process
pub struct TelemetryGuard {
    metrics_addr: Option<SocketAddr>,
}

impl TelemetryGuard {
    /// Address of the Prometheus listener, if one was started
    pub fn metrics_addr(&self) -> Option<SocketAddr> {
        self.metrics_addr
    }
}

/// Initialize logging and, when a port is configured, the metrics exporter
///
/// Must be called from within a tokio runtime when `metrics_port` is set.
pub fn init_telemetry(config: &TelemetryConfig) -> anyhow::Result<TelemetryGuard> {
    init_logging(&config.log_level, config.log_format)?;

    let metrics_addr = match config.metrics_port {
        Some(port) => {
            let addr = SocketAddr::from(([0, 0, 0, 0], port));
            PrometheusBuilder::new()
                .with_http_listener(addr)
                .install()
                .map_err(|e| anyhow::anyhow!("Failed to install Prometheus exporter: {}", e))?;
            tracing::info!(metrics_addr = %addr, "Prometheus metrics exporter enabled");
            Some(addr)
        }
        None => None,
    };

    Ok(TelemetryGuard { metrics_addr })
}
