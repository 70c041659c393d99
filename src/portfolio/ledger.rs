//! Position and cash ledger

use crate::error::{EngineError, EngineResult};
use crate::execution::{Fill, Side};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Position, cost basis and cash for one instrument
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionState {
    /// Signed quantity (negative when short)
    pub quantity: Decimal,
    /// Average cost of the open quantity; zero when flat
    pub avg_cost: Decimal,
    /// Cash balance
    pub cash: Decimal,
    /// Cumulative realized P&L (excludes commissions)
    pub realized_pnl: Decimal,
}

impl PositionState {
    /// A flat position holding only cash
    pub fn flat(initial_cash: Decimal) -> Self {
        Self {
            quantity: Decimal::ZERO,
            avg_cost: Decimal::ZERO,
            cash: initial_cash,
            realized_pnl: Decimal::ZERO,
        }
    }

    /// Check if no quantity is held
    pub fn is_flat(&self) -> bool {
        self.quantity.is_zero()
    }

    /// Signed market value at a price
    pub fn market_value(&self, price: Decimal) -> Decimal {
        self.quantity * price
    }

    /// Unrealized P&L of the open quantity at a price
    pub fn unrealized_pnl(&self, price: Decimal) -> Decimal {
        if self.is_flat() {
            return Decimal::ZERO;
        }
        self.quantity * (price - self.avg_cost)
    }
}

/// Applies fills to a single position using average-cost accounting
///
/// Fills that grow the position (or open it from flat) re-average the cost.
/// Fills against the position realize P&L on the closed portion at the
/// average cost; the cost is left alone unless the position goes flat (reset
/// to zero) or flips sign, in which case the residual opens at the fill
/// price.
#[derive(Debug, Clone)]
pub struct PositionLedger {
    state: PositionState,
    fills_applied: usize,
}

impl PositionLedger {
    /// Create a flat ledger with starting cash
    pub fn new(initial_cash: Decimal) -> Self {
        Self {
            state: PositionState::flat(initial_cash),
            fills_applied: 0,
        }
    }

    /// Current state
    pub fn state(&self) -> &PositionState {
        &self.state
    }

    /// Number of fills applied so far
    pub fn fills_applied(&self) -> usize {
        self.fills_applied
    }

    /// Apply a fill and return the resulting state
    ///
    /// A rejected fill leaves the state untouched, including fills whose
    /// arithmetic would overflow.
    pub fn apply_fill(&mut self, fill: &Fill) -> EngineResult<PositionState> {
        fill.validate()?;

        let overflow = || EngineError::invalid_fill(fill.date, "arithmetic overflow");
        let current = &self.state;
        let held = current.quantity;
        let qty = fill.quantity;
        let price = fill.price;
        let held_long = held > Decimal::ZERO;

        let adds_to_position = held.is_zero() || held_long == (fill.side == Side::Buy);
        let quantity = held
            .checked_add(fill.signed_quantity())
            .ok_or_else(overflow)?;

        let mut next = current.clone();
        next.quantity = quantity;

        if adds_to_position {
            let held_abs = held.abs();
            let cost = held_abs
                .checked_mul(current.avg_cost)
                .and_then(|held_cost| held_cost.checked_add(qty.checked_mul(price)?))
                .ok_or_else(overflow)?;
            let size = held_abs.checked_add(qty).ok_or_else(overflow)?;
            next.avg_cost = cost.checked_div(size).ok_or_else(overflow)?;
        } else {
            let closed = held.abs().min(qty);
            let per_unit = if held_long {
                price.checked_sub(current.avg_cost)
            } else {
                current.avg_cost.checked_sub(price)
            };
            let realized = per_unit
                .and_then(|gain| gain.checked_mul(closed))
                .ok_or_else(overflow)?;
            next.realized_pnl = current
                .realized_pnl
                .checked_add(realized)
                .ok_or_else(overflow)?;

            if quantity.is_zero() {
                next.avg_cost = Decimal::ZERO;
            } else if (quantity > Decimal::ZERO) != held_long {
                next.avg_cost = price;
            }

            tracing::debug!(
                date = %fill.date,
                closed = %closed,
                realized = %realized,
                "Position reduced"
            );
        }

        let notional = fill.checked_notional().ok_or_else(overflow)?;
        next.cash = match fill.side {
            Side::Buy => notional
                .checked_add(fill.commission)
                .and_then(|outflow| current.cash.checked_sub(outflow)),
            Side::Sell => notional
                .checked_sub(fill.commission)
                .and_then(|inflow| current.cash.checked_add(inflow)),
        }
        .ok_or_else(overflow)?;

        self.state = next;
        self.fills_applied += 1;

        let state = &self.state;
        tracing::debug!(
            date = %fill.date,
            side = %fill.side,
            quantity = %qty,
            price = %price,
            position = %state.quantity,
            avg_cost = %state.avg_cost,
            cash = %state.cash,
            "Fill applied"
        );

        Ok(state.clone())
    }

    /// Read-only valuation at a price: (unrealized P&L, gross exposure)
    pub fn mark(&self, close: Decimal) -> (Decimal, Decimal) {
        (
            self.state.unrealized_pnl(close),
            self.state.market_value(close).abs(),
        )
    }
}
