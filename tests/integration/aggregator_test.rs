//! End-to-end aggregation tests

use chrono::NaiveDate;
use pnl_risk::backtest::{DailyAggregator, RunSummary};
use pnl_risk::config::EngineConfig;
use pnl_risk::data::{write_run_outputs, ParquetReader, read_risk_report};
use pnl_risk::error::EngineError;
use pnl_risk::execution::{parse_fills, ExecutionCosts, Fill, Side};
use pnl_risk::feed::{parse_bars, PriceBar};
use pnl_risk::risk::{LimitKind, RiskLimits};
use pnl_risk::signal::{DemoTrader, TraderConfig};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tempfile::TempDir;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
}

fn bar(d: u32, open: Decimal, close: Decimal) -> PriceBar {
    PriceBar {
        date: day(d),
        open,
        high: open.max(close),
        low: open.min(close),
        close,
        volume: 1_000,
    }
}

fn engine(limits: RiskLimits) -> EngineConfig {
    EngineConfig {
        initial_cash: dec!(100000),
        var_window: 2,
        var_alpha: dec!(0.99),
        limits,
    }
}

#[test]
fn test_buy_mark_and_partial_sell() {
    let bars = [
        bar(2, dec!(50), dec!(50)),
        bar(3, dec!(54), dec!(55)),
        bar(4, dec!(60), dec!(58)),
    ];
    let fills = [
        Fill::new(day(2), Side::Buy, dec!(100), dec!(50), dec!(1)),
        Fill::new(day(4), Side::Sell, dec!(40), dec!(60), dec!(1)),
    ];

    let output = DailyAggregator::new(engine(RiskLimits::unlimited()))
        .unwrap()
        .run(&bars, &fills)
        .unwrap();

    // Opening buy
    let d1 = &output.records[0];
    assert_eq!(d1.cash, dec!(94999));
    assert_eq!(d1.equity, dec!(99999));

    // Mark at 55
    let d2 = &output.records[1];
    assert_eq!(d2.equity, dec!(100499));
    assert_eq!(d2.unrealized_pnl, dec!(500));
    assert_eq!(d2.daily_pnl, Some(dec!(500)));

    // Sell 40 at 60 realizes against the average cost
    let d3 = &output.records[2];
    assert_eq!(d3.realized_pnl, dec!(400));
    assert_eq!(d3.cash, dec!(97398));
    assert_eq!(d3.unrealized_pnl, dec!(480));
    assert_eq!(d3.equity, dec!(97398) + dec!(60) * dec!(58));

    assert_eq!(
        output.final_state.quantity,
        dec!(60),
        "final state should keep the residual long"
    );
    assert_eq!(output.final_state.avg_cost, dec!(50));
    assert_eq!(output.fills_applied, 2);
}

#[test]
fn test_drawdown_limit_alert() {
    let limits = RiskLimits {
        max_drawdown: Some(dec!(0.10)),
        ..Default::default()
    };
    let bars = [bar(2, dec!(100), dec!(100)), bar(3, dec!(90), dec!(88))];
    let fills = [Fill::new(day(2), Side::Buy, dec!(1000), dec!(100), dec!(0))];

    let output = DailyAggregator::new(engine(limits))
        .unwrap()
        .run(&bars, &fills)
        .unwrap();

    assert_eq!(output.records[1].equity, dec!(88000));
    assert_eq!(output.records[1].drawdown, dec!(0.12));
    assert_eq!(output.alerts.len(), 1);

    let alert = &output.alerts[0];
    assert_eq!(alert.date, day(3));
    assert_eq!(alert.limit_name, LimitKind::MaxDrawdown);
    assert_eq!(alert.observed_value, dec!(0.12));
    assert_eq!(alert.limit_value, dec!(0.10));
}

#[test]
fn test_var_becomes_available_when_window_fills() {
    let bars = [
        bar(2, dec!(10), dec!(10)),
        bar(3, dec!(10), dec!(9)),
        bar(4, dec!(9), dec!(11)),
        bar(5, dec!(11), dec!(10)),
    ];
    let fills = [Fill::new(day(2), Side::Buy, dec!(100), dec!(10), dec!(0))];

    let output = DailyAggregator::new(engine(RiskLimits::unlimited()))
        .unwrap()
        .run(&bars, &fills)
        .unwrap();

    let vars: Vec<Option<Decimal>> = output.records.iter().map(|r| r.var_estimate).collect();
    assert_eq!(vars[0], None);
    assert_eq!(vars[1], None);
    // Window [-100, +200]: 1% quantile = -100 + 300 * 0.01 = -97
    assert_eq!(vars[2], Some(dec!(97)));
    // Window [+200, -100]
    assert_eq!(vars[3], Some(dec!(97)));
}

#[test]
fn test_multiple_fills_same_day_in_input_order() {
    let bars = [bar(2, dec!(10), dec!(10))];
    let fills = [
        Fill::new(day(2), Side::Buy, dec!(10), dec!(10), dec!(0)),
        Fill::new(day(2), Side::Buy, dec!(10), dec!(12), dec!(0)),
        Fill::new(day(2), Side::Sell, dec!(5), dec!(13), dec!(0)),
    ];

    let output = DailyAggregator::new(engine(RiskLimits::unlimited()))
        .unwrap()
        .run(&bars, &fills)
        .unwrap();

    assert_eq!(output.records.len(), 1);
    assert_eq!(output.final_state.quantity, dec!(15));
    assert_eq!(output.final_state.avg_cost, dec!(11));
    assert_eq!(output.final_state.realized_pnl, dec!(10));
}

#[test]
fn test_abort_keeps_prior_days() {
    let bars = [
        bar(2, dec!(10), dec!(10)),
        bar(3, dec!(10), dec!(11)),
        bar(4, dec!(11), dec!(12)),
    ];
    let fills = [
        Fill::new(day(2), Side::Buy, dec!(10), dec!(10), dec!(1)),
        Fill::new(day(3), Side::Sell, dec!(-5), dec!(11), dec!(1)),
    ];

    let aborted = DailyAggregator::new(engine(RiskLimits::unlimited()))
        .unwrap()
        .run(&bars, &fills)
        .unwrap_err();

    assert!(matches!(aborted.error, EngineError::InvalidFill { .. }));
    assert_eq!(aborted.error.date(), Some(day(3)));
    assert_eq!(aborted.partial.records.len(), 1);
    assert_eq!(aborted.partial.records[0].date, day(2));
    assert_eq!(aborted.partial.final_state.quantity, dec!(10));
}

#[test]
fn test_out_of_order_bars_abort() {
    let bars = [bar(3, dec!(10), dec!(10)), bar(2, dec!(10), dec!(10))];
    let aborted = DailyAggregator::new(engine(RiskLimits::unlimited()))
        .unwrap()
        .run(&bars, &[])
        .unwrap_err();

    assert_eq!(
        aborted.error,
        EngineError::OutOfOrderObservation {
            date: day(2),
            previous: day(3),
        }
    );
    assert_eq!(aborted.partial.records.len(), 1);
}

#[test]
fn test_out_of_order_bars_reported_before_unpaired_fill() {
    let bars = [bar(3, dec!(10), dec!(10)), bar(2, dec!(10), dec!(10))];
    let fills = [Fill::new(day(2), Side::Buy, dec!(1), dec!(10), dec!(0))];

    let aborted = DailyAggregator::new(engine(RiskLimits::unlimited()))
        .unwrap()
        .run(&bars, &fills)
        .unwrap_err();

    assert_eq!(
        aborted.error,
        EngineError::OutOfOrderObservation {
            date: day(2),
            previous: day(3),
        }
    );
    assert_eq!(aborted.partial.records.len(), 1);
    assert_eq!(aborted.partial.records[0].date, day(3));
    assert_eq!(aborted.partial.fills_applied, 0);
}

#[test]
fn test_losing_short_caps_drawdown_at_one() {
    let bars = [bar(2, dec!(100), dec!(100)), bar(3, dec!(240), dec!(250))];
    let fills = [Fill::new(day(2), Side::Sell, dec!(1000), dec!(100), dec!(0))];

    let output = DailyAggregator::new(engine(RiskLimits::standard()))
        .unwrap()
        .run(&bars, &fills)
        .unwrap();

    let d2 = &output.records[1];
    assert_eq!(d2.cash, dec!(200000));
    assert_eq!(d2.equity, dec!(-50000));
    assert_eq!(d2.drawdown, dec!(1));

    let kinds: Vec<LimitKind> = output.alerts.iter().map(|a| a.limit_name).collect();
    assert!(kinds.contains(&LimitKind::NonPositiveEquity));
    assert!(kinds.contains(&LimitKind::MaxDrawdown));
    assert!(output
        .alerts
        .iter()
        .filter(|a| a.limit_name == LimitKind::MaxDrawdown)
        .all(|a| a.observed_value == dec!(1)));
}

#[test]
fn test_overflowing_fill_aborts_run() {
    let bars = [bar(2, dec!(10), dec!(10)), bar(3, dec!(10), dec!(10))];
    let fills = [
        Fill::new(day(2), Side::Buy, dec!(10), dec!(10), dec!(0)),
        Fill::new(day(3), Side::Buy, Decimal::MAX, dec!(2), dec!(0)),
    ];

    let aborted = DailyAggregator::new(engine(RiskLimits::unlimited()))
        .unwrap()
        .run(&bars, &fills)
        .unwrap_err();

    assert!(matches!(aborted.error, EngineError::InvalidFill { .. }));
    assert_eq!(aborted.error.date(), Some(day(3)));
    assert_eq!(aborted.partial.records.len(), 1);
    assert_eq!(aborted.partial.final_state.quantity, dec!(10));
    assert_eq!(aborted.partial.final_state.cash, dec!(99900));
}

#[test]
fn test_identical_inputs_give_identical_outputs() {
    let bars: Vec<PriceBar> = (2..=20)
        .map(|d| {
            let close = Decimal::from(100 + (d * 7) % 11);
            bar(d, close, close)
        })
        .collect();
    let fills = [
        Fill::new(day(4), Side::Buy, dec!(50), dec!(101), dec!(1)),
        Fill::new(day(9), Side::Sell, dec!(20), dec!(104), dec!(1)),
        Fill::new(day(15), Side::Sell, dec!(50), dec!(102), dec!(1)),
    ];

    let run = || {
        DailyAggregator::new(engine(RiskLimits::standard()))
            .unwrap()
            .run(&bars, &fills)
            .unwrap()
    };
    assert_eq!(run(), run());
}

#[test]
fn test_independent_runs_in_parallel() {
    let bars: Vec<PriceBar> = (2..=10).map(|d| bar(d, dec!(10), Decimal::from(d))).collect();

    let handles: Vec<_> = [dec!(10), dec!(20)]
        .into_iter()
        .map(|qty| {
            let bars = bars.clone();
            std::thread::spawn(move || {
                let fills = [Fill::new(day(2), Side::Buy, qty, dec!(10), dec!(0))];
                DailyAggregator::new(engine(RiskLimits::unlimited()))
                    .unwrap()
                    .run(&bars, &fills)
                    .unwrap()
            })
        })
        .collect();

    let outputs: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(outputs[0].final_state.quantity, dec!(10));
    assert_eq!(outputs[1].final_state.quantity, dec!(20));
}

#[test]
fn test_csv_inputs_through_outputs() {
    let prices = "\
Date,Open,High,Low,Close,Volume
2024-01-02,50,51,49,50,1000
2024-01-03,54,56,53,55,1200
2024-01-04,60,61,57,58,900
";
    let blotter = "\
date,side,quantity,price,commission
2024-01-02,BUY,100,50,1
2024-01-04,SELL,40,60,1
";
    let bars = parse_bars(prices.as_bytes()).unwrap();
    let fills = parse_fills(blotter.as_bytes()).unwrap();
    let config = engine(RiskLimits::standard());

    let output = DailyAggregator::new(config.clone())
        .unwrap()
        .run(&bars, &fills)
        .unwrap();
    let summary = RunSummary::new("test.us", &config, &ExecutionCosts::default(), &output);

    let dir = TempDir::new().unwrap();
    let paths = write_run_outputs(dir.path(), "test.us", &summary, &output, None).unwrap();

    let records = ParquetReader::new(&paths.pnl_timeseries)
        .read_daily_records()
        .unwrap();
    assert_eq!(records, output.records);
    assert!(ParquetReader::new(&paths.alerts).read_alerts().unwrap().is_empty());

    let report = read_risk_report(&paths.risk_report).unwrap();
    assert_eq!(report.summary, summary);
    assert_eq!(report.summary.num_fills, 2);
    assert!(report.aborted.is_none());
    assert!(paths.positions.exists());
}

#[test]
fn test_demo_trader_fills_run_cleanly() {
    let bars: Vec<PriceBar> = (1..=30)
        .map(|d| {
            // Rise for two weeks, then fall
            let close = if d <= 15 {
                Decimal::from(100 + d)
            } else {
                Decimal::from(130 - d)
            };
            bar(d, close, close)
        })
        .collect();

    let trader = DemoTrader::new(
        TraderConfig {
            fast: 3,
            slow: 8,
            trade_size: dec!(25),
        },
        ExecutionCosts::default(),
    );
    let fills = trader.generate_fills(&bars, dec!(100000));
    assert!(!fills.is_empty());

    let output = DailyAggregator::new(engine(RiskLimits::standard()))
        .unwrap()
        .run(&bars, &fills)
        .unwrap();

    assert_eq!(output.records.len(), 30);
    assert_eq!(output.fills_applied, fills.len());
    assert!(output.final_state.quantity >= dec!(0));
    assert!(output.final_state.cash > dec!(0));
}
