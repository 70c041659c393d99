//! Signal types

use crate::error::{EngineError, EngineResult};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Target exposure for a trading day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Regime {
    /// Accumulate a long position
    Long,
    /// Sell down toward flat
    Flat,
}

/// Demo trader configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraderConfig {
    /// Fast moving-average window
    #[serde(default = "default_fast")]
    pub fast: usize,
    /// Slow moving-average window
    #[serde(default = "default_slow")]
    pub slow: usize,
    /// Shares per trade event (capped by cash or position)
    #[serde(default = "default_trade_size")]
    pub trade_size: Decimal,
}

fn default_fast() -> usize {
    20
}
fn default_slow() -> usize {
    100
}
fn default_trade_size() -> Decimal {
    dec!(25)
}

impl Default for TraderConfig {
    fn default() -> Self {
        Self {
            fast: default_fast(),
            slow: default_slow(),
            trade_size: default_trade_size(),
        }
    }
}

impl TraderConfig {
    /// Reject windows or sizes the trader cannot use
    pub fn validate(&self) -> EngineResult<()> {
        if self.fast == 0 || self.slow == 0 {
            return Err(EngineError::InvalidConfiguration(format!(
                "moving-average windows must be positive, got fast={} slow={}",
                self.fast, self.slow
            )));
        }
        if self.trade_size <= Decimal::ZERO {
            return Err(EngineError::InvalidConfiguration(format!(
                "trade_size must be positive, got {}",
                self.trade_size
            )));
        }
        Ok(())
    }

    /// Bars needed before the crossover says anything useful
    pub fn min_history(&self) -> usize {
        self.fast.max(self.slow) + 5
    }
}
