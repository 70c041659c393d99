//! Property tests for the accounting and risk invariants

use chrono::{Duration, NaiveDate};
use pnl_risk::backtest::DailyAggregator;
use pnl_risk::config::EngineConfig;
use pnl_risk::execution::{Fill, Side};
use pnl_risk::feed::PriceBar;
use pnl_risk::portfolio::{EquityPoint, PositionLedger};
use pnl_risk::risk::{RiskCalculator, RiskLimits, VarConfig};
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const INITIAL_CASH: Decimal = dec!(100000);

fn tolerance() -> Decimal {
    dec!(0.000001)
}

fn day(offset: usize) -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap() + Duration::days(offset as i64)
}

fn cents(value: u32) -> Decimal {
    Decimal::new(value as i64, 2)
}

/// (is_buy, quantity, price in cents, commission in cents)
fn fill_strategy() -> impl Strategy<Value = (bool, u32, u32, u32)> {
    (any::<bool>(), 1u32..200, 100u32..50_000, 0u32..500)
}

fn to_fill(offset: usize, (is_buy, qty, price, commission): (bool, u32, u32, u32)) -> Fill {
    let side = if is_buy { Side::Buy } else { Side::Sell };
    Fill::new(
        day(offset),
        side,
        Decimal::from(qty),
        cents(price),
        cents(commission),
    )
}

fn curve(equities: &[i64]) -> Vec<EquityPoint> {
    equities
        .iter()
        .enumerate()
        .map(|(i, &e)| EquityPoint {
            date: day(i),
            equity: Decimal::new(e, 2),
            unrealized_pnl: Decimal::ZERO,
            gross_exposure: Decimal::ZERO,
            net_exposure: Decimal::ZERO,
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    #[test]
    fn ledger_conserves_cash_and_cost(fills in prop::collection::vec(fill_strategy(), 1..60)) {
        let mut ledger = PositionLedger::new(INITIAL_CASH);
        let mut commissions = Decimal::ZERO;

        for (i, raw) in fills.into_iter().enumerate() {
            let fill = to_fill(i, raw);
            commissions += fill.commission;
            let state = ledger.apply_fill(&fill).unwrap();

            let lhs = state.cash + state.quantity * state.avg_cost;
            let rhs = INITIAL_CASH + state.realized_pnl - commissions;
            prop_assert!((lhs - rhs).abs() < tolerance(), "{} != {}", lhs, rhs);

            if state.quantity.is_zero() {
                prop_assert_eq!(state.avg_cost, Decimal::ZERO);
            } else {
                prop_assert!(state.avg_cost > Decimal::ZERO);
            }
        }
    }

    #[test]
    fn daily_records_reconcile(
        closes in prop::collection::vec(100u32..50_000, 2..60),
        trades in prop::collection::vec(prop::option::of(fill_strategy()), 60),
    ) {
        let bars: Vec<PriceBar> = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| PriceBar {
                date: day(i),
                open: cents(c),
                high: cents(c),
                low: cents(c),
                close: cents(c),
                volume: 0,
            })
            .collect();
        let fills: Vec<Fill> = trades
            .into_iter()
            .take(bars.len())
            .enumerate()
            .filter_map(|(i, t)| t.map(|t| to_fill(i, t)))
            .collect();
        let commissions: Decimal = fills.iter().map(|f| f.commission).sum();

        let config = EngineConfig {
            initial_cash: INITIAL_CASH,
            var_window: 5,
            var_alpha: dec!(0.95),
            limits: RiskLimits::unlimited(),
        };
        let output = DailyAggregator::new(config).unwrap().run(&bars, &fills).unwrap();
        prop_assert_eq!(output.records.len(), bars.len());

        let mut previous: Option<Decimal> = None;
        for (record, bar) in output.records.iter().zip(&bars) {
            prop_assert_eq!(record.equity, record.cash + record.net_exposure);
            prop_assert_eq!(record.gross_exposure, record.net_exposure.abs());
            prop_assert_eq!(record.daily_pnl, previous.map(|p| record.equity - p));
            prop_assert_eq!(record.date, bar.date);
            previous = Some(record.equity);
        }

        let last = &output.records[output.records.len() - 1];
        let expected = INITIAL_CASH + last.realized_pnl + last.unrealized_pnl - commissions;
        prop_assert!((last.equity - expected).abs() < tolerance());
    }

    #[test]
    fn drawdown_bounded_and_peak_monotonic(
        equities in prop::collection::vec(-10_000_000i64..10_000_000, 1..200),
    ) {
        let points = curve(&equities);
        let mut calculator = RiskCalculator::new(VarConfig::default());
        let mut last_peak = Decimal::ZERO;

        for point in &points {
            let risk = calculator.update(point);
            let peak = calculator.peak_equity().unwrap();

            prop_assert!(peak >= last_peak);
            prop_assert!(peak >= point.equity);
            prop_assert!(risk.drawdown >= Decimal::ZERO && risk.drawdown <= Decimal::ONE);
            if peak > Decimal::ZERO {
                prop_assert_eq!(risk.drawdown.is_zero(), peak == point.equity);
                prop_assert_eq!(risk.drawdown == Decimal::ONE, point.equity <= Decimal::ZERO);
            } else {
                prop_assert!(risk.drawdown.is_zero());
            }
            last_peak = peak;
        }
    }

    #[test]
    fn var_null_until_window_full(
        equities in prop::collection::vec(1i64..10_000_000, 1..80),
        window in 2usize..20,
    ) {
        let config = VarConfig { window, alpha: dec!(0.99) };
        let risk = RiskCalculator::compute(config, &curve(&equities));

        for (i, point) in risk.iter().enumerate() {
            // Day i has i daily P&L observations
            if i < window {
                prop_assert!(point.var_estimate.is_none());
            } else {
                let var = point.var_estimate.unwrap();
                prop_assert!(var >= Decimal::ZERO);
            }
        }
    }
}
