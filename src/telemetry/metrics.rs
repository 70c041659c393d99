//! Prometheus metrics

use crate::backtest::DailyRecord;
use crate::risk::AlertRecord;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Gauge metric types
#[derive(Debug, Clone, Copy)]
pub enum GaugeMetric {
    /// Current equity
    Equity,
    /// Cash balance
    Cash,
    /// Unrealized P&L
    UnrealizedPnl,
    /// Realized P&L
    RealizedPnl,
    /// Gross exposure
    GrossExposure,
    /// Net exposure
    NetExposure,
    /// Current drawdown fraction
    Drawdown,
    /// Historical VaR
    ValueAtRisk,
}

impl GaugeMetric {
    /// Exported metric name
    pub fn name(&self) -> &'static str {
        match self {
            GaugeMetric::Equity => "pnl_risk_equity",
            GaugeMetric::Cash => "pnl_risk_cash",
            GaugeMetric::UnrealizedPnl => "pnl_risk_unrealized_pnl",
            GaugeMetric::RealizedPnl => "pnl_risk_realized_pnl",
            GaugeMetric::GrossExposure => "pnl_risk_gross_exposure",
            GaugeMetric::NetExposure => "pnl_risk_net_exposure",
            GaugeMetric::Drawdown => "pnl_risk_drawdown",
            GaugeMetric::ValueAtRisk => "pnl_risk_var",
        }
    }
}

/// Set a gauge value
pub fn set_gauge(metric: GaugeMetric, value: Decimal) {
    metrics::gauge!(metric.name()).set(value.to_f64().unwrap_or(f64::NAN));
}

/// Publish one day's record
pub fn record_day(record: &DailyRecord) {
    set_gauge(GaugeMetric::Equity, record.equity);
    set_gauge(GaugeMetric::Cash, record.cash);
    set_gauge(GaugeMetric::UnrealizedPnl, record.unrealized_pnl);
    set_gauge(GaugeMetric::RealizedPnl, record.realized_pnl);
    set_gauge(GaugeMetric::GrossExposure, record.gross_exposure);
    set_gauge(GaugeMetric::NetExposure, record.net_exposure);
    set_gauge(GaugeMetric::Drawdown, record.drawdown);
    if let Some(var) = record.var_estimate {
        set_gauge(GaugeMetric::ValueAtRisk, var);
    }
    metrics::counter!("pnl_risk_days_processed_total").increment(1);
}

/// Count fills applied
pub fn record_fills(count: usize) {
    metrics::counter!("pnl_risk_fills_applied_total").increment(count as u64);
}

/// Count limit breaches by limit name
pub fn record_alerts(alerts: &[AlertRecord]) {
    for alert in alerts {
        metrics::counter!("pnl_risk_limit_breaches_total", "limit" => alert.limit_name.as_str())
            .increment(1);
    }
}
