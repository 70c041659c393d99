//! Pairs price bars with same-day fills

use crate::error::{EngineError, EngineResult};
use crate::execution::Fill;
use crate::feed::PriceBar;

/// One trading day: a bar and the fills executed on it
#[derive(Debug, Clone, Copy)]
pub struct TradingDay<'a> {
    pub bar: &'a PriceBar,
    pub fills: &'a [Fill],
}

/// Walks bars in order, attaching the fills dated on each bar
///
/// Bars must be in strictly increasing date order. Fills must be in
/// non-decreasing date order and every fill date must match a bar. A bar out
/// of order yields `OutOfOrderObservation` and takes precedence over any fill
/// that could not be paired before it. A fill that cannot be paired yields an
/// `InvalidFill` error. The schedule ends after the first error.
#[derive(Debug, Clone)]
pub struct DaySchedule<'a> {
    bars: &'a [PriceBar],
    fills: &'a [Fill],
    bar_idx: usize,
    fill_idx: usize,
    /// Index of the first bar not after its predecessor
    disorder: Option<usize>,
    failed: bool,
}

impl<'a> DaySchedule<'a> {
    /// Create a schedule over bars and fills
    pub fn new(bars: &'a [PriceBar], fills: &'a [Fill]) -> Self {
        let disorder = bars
            .windows(2)
            .position(|pair| pair[1].date <= pair[0].date)
            .map(|i| i + 1);

        Self {
            bars,
            fills,
            bar_idx: 0,
            fill_idx: 0,
            disorder,
            failed: false,
        }
    }

    fn unpaired(&mut self, fill: &Fill) -> EngineError {
        self.failed = true;

        if self.fill_idx > 0 {
            let previous = self.fills[self.fill_idx - 1].date;
            if fill.date < previous {
                return EngineError::invalid_fill(
                    fill.date,
                    format!("fill out of date order (previous fill dated {})", previous),
                );
            }
        }
        EngineError::invalid_fill(fill.date, "no price bar for fill date")
    }
}

impl<'a> Iterator for DaySchedule<'a> {
    type Item = EngineResult<TradingDay<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        let fills = self.fills;
        let Some(bar) = self.bars.get(self.bar_idx) else {
            // Fills left over after the last bar
            return fills.get(self.fill_idx).map(|fill| Err(self.unpaired(fill)));
        };

        if self.disorder == Some(self.bar_idx) {
            self.failed = true;
            return Some(Err(EngineError::OutOfOrderObservation {
                date: bar.date,
                previous: self.bars[self.bar_idx - 1].date,
            }));
        }

        if let Some(fill) = fills.get(self.fill_idx) {
            if fill.date < bar.date && self.disorder.is_none() {
                return Some(Err(self.unpaired(fill)));
            }
        }

        let start = self.fill_idx;
        while fills.get(self.fill_idx).is_some_and(|f| f.date == bar.date) {
            self.fill_idx += 1;
        }
        self.bar_idx += 1;

        Some(Ok(TradingDay {
            bar,
            fills: &fills[start..self.fill_idx],
        }))
    }
}
