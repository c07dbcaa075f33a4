//! End-to-end run for one series: indicators, signals, simulation.

use tracing::info;

use crate::domain::backtest::{run_backtest, BacktestResult};
use crate::domain::config_validation::validate_run_config;
use crate::domain::error::{BandcrossError, Warning};
use crate::domain::indicator::set::{compute_indicator_set, IndicatorSet};
use crate::domain::ohlcv::PriceSeries;
use crate::domain::run_config::RunConfig;
use crate::domain::signal::{generate_signals, SignalPoint};

#[derive(Debug, Clone, PartialEq)]
pub struct RunOutput {
    pub indicators: IndicatorSet,
    pub signals: Vec<SignalPoint>,
    pub result: BacktestResult,
    pub warnings: Vec<Warning>,
}

impl RunOutput {
    /// False when no date had every indicator the rule reads, in which case
    /// the simulator saw only Holds.
    pub fn has_eligible_dates(&self) -> bool {
        !self.signals.is_empty()
    }
}

pub fn run_pipeline(series: &PriceSeries, config: &RunConfig) -> Result<RunOutput, BandcrossError> {
    validate_run_config(config)?;

    let indicators = compute_indicator_set(series, &config.indicator_params());
    let signals = generate_signals(&indicators, config.rule);
    info!(
        symbol = series.symbol(),
        rule = %config.rule,
        bars = series.len(),
        eligible = signals.len(),
        "signals generated"
    );

    let result = run_backtest(series, &signals, &config.backtest)?;
    info!(
        symbol = series.symbol(),
        trades = result.trades.len(),
        final_equity = result.final_equity,
        "backtest complete"
    );

    let warnings = indicators.warnings.clone();
    Ok(RunOutput {
        indicators,
        signals,
        result,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::backtest::BacktestConfig;
    use crate::domain::indicator::set::{BandParams, SmaWindows};
    use crate::domain::indicator::Deviation;
    use crate::domain::ohlcv::Bar;
    use crate::domain::signal::RuleVariant;
    use chrono::NaiveDate;

    fn series(prices: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2023, 3, 1).unwrap();
        let bars = prices
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                date: start + chrono::Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1_000,
            })
            .collect();
        PriceSeries::new("TEST", bars).unwrap()
    }

    fn config(rule: RuleVariant) -> RunConfig {
        RunConfig {
            symbol: "TEST".into(),
            start_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
            rule,
            sma: Some(SmaWindows { short: 2, long: 3 }),
            bands: Some(BandParams {
                period: 3,
                multiplier: 1.0,
                deviation: Deviation::Sample,
            }),
            backtest: BacktestConfig::default(),
        }
    }

    #[test]
    fn crossover_round_trip() {
        let s = series(&[10.0, 10.0, 10.0, 12.0, 14.0, 9.0, 8.0]);
        let out = run_pipeline(&s, &config(RuleVariant::Crossover)).unwrap();

        assert!(out.warnings.is_empty());
        assert!(out.has_eligible_dates());
        assert_eq!(out.indicators.len(), 7);
        assert_eq!(out.result.equity_curve.len(), 7);
        assert_eq!(out.result.trades.len(), 1);
        assert!(out.result.open_position.is_none());
    }

    #[test]
    fn short_series_reports_no_eligible_dates() {
        let s = series(&[10.0, 11.0]);
        let out = run_pipeline(&s, &config(RuleVariant::Combined)).unwrap();

        assert!(!out.warnings.is_empty());
        assert!(!out.has_eligible_dates());
        assert!(out.result.trades.is_empty());
        assert!((out.result.final_equity - 10_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn invalid_config_rejected() {
        let s = series(&[10.0, 11.0, 12.0]);
        let mut c = config(RuleVariant::Crossover);
        c.sma = Some(SmaWindows { short: 3, long: 3 });
        assert!(matches!(
            run_pipeline(&s, &c),
            Err(BandcrossError::ConfigInvalid { .. })
        ));
    }

    #[test]
    fn repeated_runs_are_identical() {
        let s = series(&[10.0, 9.0, 12.0, 8.0, 15.0, 7.0, 16.0, 6.0]);
        let c = config(RuleVariant::Combined);
        let a = run_pipeline(&s, &c).unwrap();
        let b = run_pipeline(&s, &c).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.result.final_equity.to_bits(), b.result.final_equity.to_bits());
    }
}
