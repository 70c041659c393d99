//! Execution types

use crate::error::{EngineError, EngineResult};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Trade direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy (adds to quantity)
    Buy,
    /// Sell (subtracts from quantity)
    Sell,
}

impl Side {
    /// Signed unit for this side: +1 for buys, -1 for sells
    pub fn sign(&self) -> Decimal {
        match self {
            Side::Buy => Decimal::ONE,
            Side::Sell => Decimal::NEGATIVE_ONE,
        }
    }

    /// Wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BUY" => Ok(Side::Buy),
            "SELL" => Ok(Side::Sell),
            other => Err(format!("unknown side {:?}", other)),
        }
    }
}

/// An executed trade with price and commission already resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fill {
    /// Trading day the fill belongs to
    pub date: NaiveDate,
    /// Trade side
    pub side: Side,
    /// Filled quantity (always positive)
    pub quantity: Decimal,
    /// Execution price including slippage
    pub price: Decimal,
    /// Commission paid
    pub commission: Decimal,
}

impl Fill {
    /// Create a new fill
    pub fn new(
        date: NaiveDate,
        side: Side,
        quantity: Decimal,
        price: Decimal,
        commission: Decimal,
    ) -> Self {
        Self {
            date,
            side,
            quantity,
            price,
            commission,
        }
    }

    /// Check the fill is usable by the ledger
    pub fn validate(&self) -> EngineResult<()> {
        if self.quantity <= Decimal::ZERO {
            return Err(EngineError::invalid_fill(
                self.date,
                format!("quantity must be positive, got {}", self.quantity),
            ));
        }
        if self.price <= Decimal::ZERO {
            return Err(EngineError::invalid_fill(
                self.date,
                format!("price must be positive, got {}", self.price),
            ));
        }
        if self.commission < Decimal::ZERO {
            return Err(EngineError::invalid_fill(
                self.date,
                format!("commission must be non-negative, got {}", self.commission),
            ));
        }
        Ok(())
    }

    /// Quantity with the side's sign applied
    pub fn signed_quantity(&self) -> Decimal {
        self.quantity * self.side.sign()
    }

    /// Gross traded value (price x quantity), `None` on overflow
    pub fn checked_notional(&self) -> Option<Decimal> {
        self.price.checked_mul(self.quantity)
    }
}
