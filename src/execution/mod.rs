//! Execution module
//!
//! Fill vocabulary, execution costs and the fill blotter loader. Slippage and
//! commission are resolved here, upstream of the accounting core.

mod blotter;
mod costs;
mod types;

pub use blotter::{load_fills, parse_fills};
pub use costs::{apply_slippage, ExecutionCosts};
pub use types::{Fill, Side};
