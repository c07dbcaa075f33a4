//! Rolling standard deviation of closing prices.
//!
//! STDDEV(n)[i] = sqrt(sum((C[i-j] - SMA(n)[i])^2 for j in 0..n) / d)
//! where d = n for the population estimator and n - 1 for the sample one.
//! The window and its mean are exactly those of `calculate_sma`.
//! Warmup: first (n-1) bars are undefined.

use crate::domain::indicator::{
    Deviation, IndicatorPoint, IndicatorSeries, IndicatorType, trailing_window, window_deviation,
    window_mean,
};
use crate::domain::ohlcv::Bar;

pub fn calculate_stddev(bars: &[Bar], period: usize, deviation: Deviation) -> IndicatorSeries {
    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

    let values = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            let value = trailing_window(&closes, i, period)
                .and_then(|window| window_deviation(window, window_mean(window), deviation));
            IndicatorPoint {
                date: bar.date,
                value,
            }
        })
        .collect();

    IndicatorSeries {
        indicator_type: IndicatorType::Stddev(period),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_bars(prices: &[f64]) -> Vec<Bar> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                date: NaiveDate::from_ymd_opt(2024, 1, (i + 1) as u32).unwrap(),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000,
            })
            .collect()
    }

    #[test]
    fn stddev_warmup() {
        let bars = make_bars(&[10.0, 20.0, 30.0, 40.0, 50.0]);
        let series = calculate_stddev(&bars, 3, Deviation::Population);

        assert_eq!(series.values[0].value, None);
        assert_eq!(series.values[1].value, None);
        assert!(series.values[2].value.is_some());
        assert!(series.values[3].value.is_some());
        assert!(series.values[4].value.is_some());
    }

    #[test]
    fn stddev_constant_values() {
        let bars = make_bars(&[100.0, 100.0, 100.0, 100.0, 100.0]);
        let series = calculate_stddev(&bars, 3, Deviation::Sample);

        assert_eq!(series.value_at(2), Some(0.0));
        assert_eq!(series.value_at(4), Some(0.0));
    }

    #[test]
    fn stddev_population_calculation() {
        let bars = make_bars(&[10.0, 20.0, 30.0]);
        let series = calculate_stddev(&bars, 3, Deviation::Population);

        let sma: f64 = (10.0 + 20.0 + 30.0) / 3.0;
        let expected: f64 =
            ((10.0 - sma).powi(2) + (20.0 - sma).powi(2) + (30.0 - sma).powi(2)) / 3.0;
        assert!((series.value_at(2).unwrap() - expected.sqrt()).abs() < 1e-10);
    }

    #[test]
    fn stddev_sample_calculation() {
        let bars = make_bars(&[10.0, 20.0, 30.0]);
        let series = calculate_stddev(&bars, 3, Deviation::Sample);

        // sum of squared deviations = 200, / (3 - 1) = 100
        assert!((series.value_at(2).unwrap() - 10.0).abs() < 1e-10);
    }

    #[test]
    fn stddev_known_values() {
        let bars = make_bars(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        let series = calculate_stddev(&bars, 8, Deviation::Population);

        assert!((series.value_at(7).unwrap() - 2.0).abs() < 1e-10);
    }

    #[test]
    fn sample_stddev_window_of_one_is_undefined() {
        let bars = make_bars(&[10.0, 20.0, 30.0]);
        let series = calculate_stddev(&bars, 1, Deviation::Sample);

        assert_eq!(series.defined_count(), 0);
    }

    #[test]
    fn stddev_indicator_type() {
        let bars = make_bars(&[10.0, 20.0, 30.0]);
        let series = calculate_stddev(&bars, 5, Deviation::Sample);

        assert_eq!(series.indicator_type, IndicatorType::Stddev(5));
    }
}
