//! Moving-average crossover regimes

use super::Regime;
use rust_decimal::Decimal;
use std::collections::VecDeque;

/// Simple moving average; `None` until `window` values are available
pub fn moving_average(values: &[Decimal], window: usize) -> Vec<Option<Decimal>> {
    if window == 0 {
        return vec![None; values.len()];
    }

    let divisor = Decimal::from(window);
    let mut buffer: VecDeque<Decimal> = VecDeque::with_capacity(window);
    let mut sum = Decimal::ZERO;

    values
        .iter()
        .map(|&value| {
            buffer.push_back(value);
            sum += value;
            if buffer.len() > window {
                if let Some(oldest) = buffer.pop_front() {
                    sum -= oldest;
                }
            }
            (buffer.len() == window).then(|| sum / divisor)
        })
        .collect()
}

/// Long while the fast average is above the slow one, flat otherwise
///
/// Days without both averages count as flat.
pub fn crossover_regimes(closes: &[Decimal], fast: usize, slow: usize) -> Vec<Regime> {
    let fast_ma = moving_average(closes, fast);
    let slow_ma = moving_average(closes, slow);

    fast_ma
        .into_iter()
        .zip(slow_ma)
        .map(|pair| match pair {
            (Some(f), Some(s)) if f > s => Regime::Long,
            _ => Regime::Flat,
        })
        .collect()
}
