//! Demo signal module
//!
//! Moving-average crossover trader that invents fills for the accounting
//! core. Deliberately simple; the core does not depend on it.

mod crossover;
mod trader;
mod types;

pub use crossover::{crossover_regimes, moving_average};
pub use trader::DemoTrader;
pub use types::{Regime, TraderConfig};
