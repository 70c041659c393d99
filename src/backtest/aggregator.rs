//! Daily P&L and risk aggregation
//!
//! Per trading day: apply fills at the open, mark at the close, update
//! drawdown and VaR, check limits, emit a [`DailyRecord`].

use super::{DaySchedule, DailyRecord, RunAborted, RunOutput};
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::execution::Fill;
use crate::feed::PriceBar;
use crate::portfolio::{EquityTracker, PositionLedger, PositionState};
use crate::risk::{AlertRecord, LimitMonitor, RiskCalculator};
use crate::telemetry;
use rust_decimal::Decimal;
use uuid::Uuid;

/// Run context for one instrument
///
/// Holds the ledger, equity curve, risk state and output sinks. Instances
/// share nothing, so independent runs can proceed side by side.
#[derive(Debug, Clone)]
pub struct DailyAggregator {
    config: EngineConfig,
    ledger: PositionLedger,
    tracker: EquityTracker,
    risk: RiskCalculator,
    monitor: LimitMonitor,
    records: Vec<DailyRecord>,
    alerts: Vec<AlertRecord>,
}

impl DailyAggregator {
    /// Create an aggregator after validating the configuration
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;

        Ok(Self {
            ledger: PositionLedger::new(config.initial_cash),
            tracker: EquityTracker::new(),
            risk: RiskCalculator::new(config.var_config()),
            monitor: LimitMonitor::new(config.limits.clone()),
            records: Vec::new(),
            alerts: Vec::new(),
            config,
        })
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Current ledger state
    pub fn state(&self) -> &PositionState {
        self.ledger.state()
    }

    /// Records emitted so far
    pub fn records(&self) -> &[DailyRecord] {
        &self.records
    }

    /// Alerts emitted so far
    pub fn alerts(&self) -> &[AlertRecord] {
        &self.alerts
    }

    /// Process one trading day
    ///
    /// The bar and every fill are checked before anything is applied, so a
    /// rejected day leaves the aggregator exactly as it was.
    pub fn process_day(&mut self, bar: &PriceBar, fills: &[Fill]) -> EngineResult<&DailyRecord> {
        let previous = self.tracker.last().map(|p| (p.date, p.equity));

        if let Some((previous_date, _)) = previous {
            if bar.date <= previous_date {
                return Err(EngineError::OutOfOrderObservation {
                    date: bar.date,
                    previous: previous_date,
                });
            }
        }
        if bar.close <= Decimal::ZERO {
            return Err(EngineError::InvalidPriceBar {
                date: bar.date,
                reason: format!("close must be positive, got {}", bar.close),
            });
        }
        for fill in fills {
            if fill.date != bar.date {
                return Err(EngineError::invalid_fill(
                    fill.date,
                    format!("fill does not belong to trading day {}", bar.date),
                ));
            }
            fill.validate()?;
        }

        let mut ledger = self.ledger.clone();
        for fill in fills {
            ledger.apply_fill(fill)?;
        }

        let point = self.tracker.observe(bar.date, bar.close, ledger.state())?;
        self.ledger = ledger;
        let risk = self.risk.update(&point);
        let alerts = self.monitor.check(bar.date, &point, &risk);

        let state = self.ledger.state();
        let record = DailyRecord {
            date: bar.date,
            cash: state.cash,
            equity: point.equity,
            realized_pnl: state.realized_pnl,
            unrealized_pnl: point.unrealized_pnl,
            gross_exposure: point.gross_exposure,
            net_exposure: point.net_exposure,
            daily_pnl: previous.map(|(_, equity)| point.equity - equity),
            drawdown: risk.drawdown,
            var_estimate: risk.var_estimate,
        };

        tracing::debug!(
            date = %record.date,
            fills = fills.len(),
            equity = %record.equity,
            drawdown = %record.drawdown,
            var = ?record.var_estimate,
            alerts = alerts.len(),
            "Day processed"
        );

        telemetry::record_day(&record);
        telemetry::record_fills(fills.len());
        telemetry::record_alerts(&alerts);

        self.alerts.extend(alerts);
        self.records.push(record);
        Ok(&self.records[self.records.len() - 1])
    }

    /// Process a whole bar series with its fills
    ///
    /// Stops at the first error; the partial output covers every day
    /// processed before it.
    pub fn run(mut self, bars: &[PriceBar], fills: &[Fill]) -> Result<RunOutput, RunAborted> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("run", run_id = %run_id);
        let _enter = span.enter();

        tracing::info!(
            bars = bars.len(),
            fills = fills.len(),
            initial_cash = %self.config.initial_cash,
            var_window = self.config.var_window,
            var_alpha = %self.config.var_alpha,
            "Run started"
        );

        for day in DaySchedule::new(bars, fills) {
            let result = day.and_then(|day| self.process_day(day.bar, day.fills).map(|_| ()));
            if let Err(error) = result {
                tracing::error!(
                    error = %error,
                    processed_days = self.records.len(),
                    "Run aborted"
                );
                return Err(RunAborted {
                    error,
                    partial: self.into_output(),
                });
            }
        }

        let output = self.into_output();
        tracing::info!(
            days = output.records.len(),
            fills = output.fills_applied,
            alerts = output.alerts.len(),
            "Run complete"
        );
        Ok(output)
    }

    /// Finish and take the accumulated output
    pub fn into_output(self) -> RunOutput {
        RunOutput {
            final_state: self.ledger.state().clone(),
            fills_applied: self.ledger.fills_applied(),
            records: self.records,
            alerts: self.alerts,
        }
    }
}
