//! Risk output types

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Risk metrics for one trading day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskPoint {
    /// Trading day
    pub date: NaiveDate,
    /// Fractional decline from the running equity peak
    pub drawdown: Decimal,
    /// Historical VaR as a non-negative loss; `None` until the window is full
    pub var_estimate: Option<Decimal>,
}

/// Which limit an alert refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitKind {
    /// Gross exposure above `max_gross_exposure`
    MaxGrossExposure,
    /// Drawdown above `max_drawdown`
    MaxDrawdown,
    /// VaR estimate above `max_var`
    MaxVar,
    /// Equity at or below zero (always checked)
    NonPositiveEquity,
}

impl LimitKind {
    /// Name used in alert logs
    pub fn as_str(&self) -> &'static str {
        match self {
            LimitKind::MaxGrossExposure => "max_gross_exposure",
            LimitKind::MaxDrawdown => "max_drawdown",
            LimitKind::MaxVar => "max_var",
            LimitKind::NonPositiveEquity => "non_positive_equity",
        }
    }
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LimitKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "max_gross_exposure" => Ok(LimitKind::MaxGrossExposure),
            "max_drawdown" => Ok(LimitKind::MaxDrawdown),
            "max_var" => Ok(LimitKind::MaxVar),
            "non_positive_equity" => Ok(LimitKind::NonPositiveEquity),
            other => Err(format!("unknown limit {:?}", other)),
        }
    }
}

/// A single limit breach
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertRecord {
    /// Trading day of the breach
    pub date: NaiveDate,
    /// Breached limit
    pub limit_name: LimitKind,
    /// Value that breached
    pub observed_value: Decimal,
    /// Configured threshold
    pub limit_value: Decimal,
}
