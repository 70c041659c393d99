//! Risk limits and breach alerts

use super::{AlertRecord, LimitKind, RiskPoint};
use crate::portfolio::EquityPoint;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Thresholds checked every day; `None` means unlimited
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskLimits {
    /// Maximum absolute market value
    #[serde(default)]
    pub max_gross_exposure: Option<Decimal>,
    /// Maximum drawdown from peak, as a fraction in [0, 1]
    #[serde(default)]
    pub max_drawdown: Option<Decimal>,
    /// Maximum historical VaR, in currency units
    #[serde(default)]
    pub max_var: Option<Decimal>,
}

impl RiskLimits {
    /// No limits at all
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// Limits matching the command-line defaults
    pub fn standard() -> Self {
        Self {
            max_gross_exposure: Some(dec!(200000)),
            max_drawdown: Some(dec!(0.20)),
            max_var: Some(dec!(2500)),
        }
    }
}

/// Evaluate all limits for one day
///
/// A breach is `observed > limit`. A missing VaR estimate never breaches.
/// Equity at or below zero is always reported.
pub fn check_limits(
    date: NaiveDate,
    equity: &EquityPoint,
    risk: &RiskPoint,
    limits: &RiskLimits,
) -> Vec<AlertRecord> {
    let mut alerts = Vec::new();
    let mut breach = |limit_name, observed_value, limit_value| {
        alerts.push(AlertRecord {
            date,
            limit_name,
            observed_value,
            limit_value,
        })
    };

    if let Some(max_gross) = limits.max_gross_exposure {
        if equity.gross_exposure > max_gross {
            breach(LimitKind::MaxGrossExposure, equity.gross_exposure, max_gross);
        }
    }

    if let Some(max_dd) = limits.max_drawdown {
        if risk.drawdown > max_dd {
            breach(LimitKind::MaxDrawdown, risk.drawdown, max_dd);
        }
    }

    if let (Some(max_var), Some(var)) = (limits.max_var, risk.var_estimate) {
        if var > max_var {
            breach(LimitKind::MaxVar, var, max_var);
        }
    }

    if equity.equity <= Decimal::ZERO {
        breach(LimitKind::NonPositiveEquity, equity.equity, Decimal::ZERO);
    }

    alerts
}

/// Checks a fixed set of limits and logs each breach
#[derive(Debug, Clone)]
pub struct LimitMonitor {
    limits: RiskLimits,
}

impl LimitMonitor {
    /// Create a monitor for the given limits
    pub fn new(limits: RiskLimits) -> Self {
        Self { limits }
    }

    /// Configured limits
    pub fn limits(&self) -> &RiskLimits {
        &self.limits
    }

    /// Evaluate one day and return any breaches
    pub fn check(&self, date: NaiveDate, equity: &EquityPoint, risk: &RiskPoint) -> Vec<AlertRecord> {
        let alerts = check_limits(date, equity, risk, &self.limits);
        for alert in &alerts {
            tracing::warn!(
                date = %alert.date,
                limit = %alert.limit_name,
                observed = %alert.observed_value,
                limit_value = %alert.limit_value,
                "Risk limit breached"
            );
        }
        alerts
    }
}
