//! Slippage and commission model

use super::Side;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Execution cost parameters applied by fill generators
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionCosts {
    /// Slippage in basis points, applied against the trader
    #[serde(default = "default_slippage_bps")]
    pub slippage_bps: Decimal,
    /// Fixed commission per fill
    #[serde(default = "default_commission")]
    pub commission: Decimal,
}

fn default_slippage_bps() -> Decimal {
    dec!(2)
}
fn default_commission() -> Decimal {
    dec!(1)
}

impl Default for ExecutionCosts {
    fn default() -> Self {
        Self {
            slippage_bps: default_slippage_bps(),
            commission: default_commission(),
        }
    }
}

impl ExecutionCosts {
    /// Fill price for a reference price on the given side
    pub fn fill_price(&self, reference: Decimal, side: Side) -> Decimal {
        apply_slippage(reference, side, self.slippage_bps)
    }
}

/// Adjust a price adversely: buys pay up, sells receive less
pub fn apply_slippage(price: Decimal, side: Side, bps: Decimal) -> Decimal {
    let slip = bps / dec!(10000);
    match side {
        Side::Buy => price * (Decimal::ONE + slip),
        Side::Sell => price * (Decimal::ONE - slip),
    }
}
