//! Per-date aligned indicator values for one price series.

use crate::domain::error::Warning;
use crate::domain::indicator::bollinger::calculate_bollinger;
use crate::domain::indicator::sma::calculate_sma;
use crate::domain::indicator::{Deviation, IndicatorType};
use crate::domain::ohlcv::PriceSeries;
use chrono::NaiveDate;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmaWindows {
    pub short: usize,
    pub long: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandParams {
    pub period: usize,
    pub multiplier: f64,
    pub deviation: Deviation,
}

/// Which indicators to compute. Anything left as `None` stays undefined in
/// every row.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IndicatorParams {
    pub sma: Option<SmaWindows>,
    pub bands: Option<BandParams>,
}

impl IndicatorParams {
    pub fn indicator_types(&self) -> Vec<IndicatorType> {
        let mut types = Vec::new();
        if let Some(w) = self.sma {
            types.push(IndicatorType::Sma(w.short));
            types.push(IndicatorType::Sma(w.long));
        }
        if let Some(b) = self.bands {
            types.push(IndicatorType::Bollinger {
                period: b.period,
                multiplier: b.multiplier,
            });
        }
        types
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorRow {
    pub date: NaiveDate,
    pub close: f64,
    pub sma_short: Option<f64>,
    pub sma_long: Option<f64>,
    pub middle_band: Option<f64>,
    pub std_dev: Option<f64>,
    pub upper_band: Option<f64>,
    pub lower_band: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSet {
    pub rows: Vec<IndicatorRow>,
    pub warnings: Vec<Warning>,
}

impl IndicatorSet {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

pub fn compute_indicator_set(series: &PriceSeries, params: &IndicatorParams) -> IndicatorSet {
    let bars = series.bars();
    let mut warnings = Vec::new();

    for indicator in params.indicator_types() {
        let window = match indicator {
            IndicatorType::Sma(n) | IndicatorType::Stddev(n) => n,
            IndicatorType::Bollinger { period, .. } => period,
        };
        if window >= bars.len() {
            warn!(
                symbol = series.symbol(),
                %indicator,
                window,
                bars = bars.len(),
                "insufficient history"
            );
            warnings.push(Warning::InsufficientHistory {
                indicator,
                window,
                bars: bars.len(),
            });
        }
    }

    let sma = params
        .sma
        .map(|w| (calculate_sma(bars, w.short), calculate_sma(bars, w.long)));
    let bands = params
        .bands
        .map(|b| calculate_bollinger(bars, b.period, b.multiplier, b.deviation));

    let rows = bars
        .iter()
        .enumerate()
        .map(|(i, bar)| {
            let band = bands.as_ref().and_then(|s| s.band_at(i));
            IndicatorRow {
                date: bar.date,
                close: bar.close,
                sma_short: sma.as_ref().and_then(|(short, _)| short.value_at(i)),
                sma_long: sma.as_ref().and_then(|(_, long)| long.value_at(i)),
                middle_band: band.map(|b| b.middle),
                std_dev: band.map(|b| b.std_dev),
                upper_band: band.map(|b| b.upper),
                lower_band: band.map(|b| b.lower),
            }
        })
        .collect();

    IndicatorSet { rows, warnings }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ohlcv::Bar;

    fn make_series(prices: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = prices
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                date: start + chrono::Duration::days(i as i64),
                open: close,
                high: close,
                low: close,
                close,
                volume: 1000,
            })
            .collect();
        PriceSeries::new("TEST", bars).unwrap()
    }

    fn all_params() -> IndicatorParams {
        IndicatorParams {
            sma: Some(SmaWindows { short: 2, long: 4 }),
            bands: Some(BandParams {
                period: 3,
                multiplier: 2.0,
                deviation: Deviation::Population,
            }),
        }
    }

    #[test]
    fn rows_align_with_bars() {
        let series = make_series(&[10.0, 11.0, 12.0, 13.0, 14.0, 15.0]);
        let set = compute_indicator_set(&series, &all_params());

        assert_eq!(set.len(), 6);
        for (row, bar) in set.rows.iter().zip(series.bars()) {
            assert_eq!(row.date, bar.date);
            assert_eq!(row.close, bar.close);
        }
        assert!(set.warnings.is_empty());
    }

    #[test]
    fn warmup_is_per_indicator() {
        let series = make_series(&[10.0, 11.0, 12.0, 13.0, 14.0, 15.0]);
        let set = compute_indicator_set(&series, &all_params());

        assert!(set.rows[0].sma_short.is_none());
        assert!(set.rows[1].sma_short.is_some());
        assert!(set.rows[2].sma_long.is_none());
        assert!(set.rows[3].sma_long.is_some());
        assert!(set.rows[1].upper_band.is_none());
        assert!(set.rows[2].upper_band.is_some());
        assert!(set.rows[2].lower_band.is_some());
        assert!(set.rows[2].middle_band.is_some());
        assert!(set.rows[2].std_dev.is_some());
    }

    #[test]
    fn unrequested_indicators_stay_undefined() {
        let series = make_series(&[10.0, 11.0, 12.0, 13.0]);
        let params = IndicatorParams {
            sma: Some(SmaWindows { short: 1, long: 2 }),
            bands: None,
        };
        let set = compute_indicator_set(&series, &params);

        assert!(set.rows.iter().all(|r| r.upper_band.is_none() && r.std_dev.is_none()));
        assert!(set.rows[3].sma_long.is_some());
    }

    #[test]
    fn window_at_least_series_length_warns() {
        let series = make_series(&[10.0, 11.0, 12.0]);
        let params = IndicatorParams {
            sma: Some(SmaWindows { short: 2, long: 3 }),
            bands: Some(BandParams {
                period: 5,
                multiplier: 2.0,
                deviation: Deviation::Sample,
            }),
        };
        let set = compute_indicator_set(&series, &params);

        assert_eq!(
            set.warnings,
            vec![
                Warning::InsufficientHistory {
                    indicator: IndicatorType::Sma(3),
                    window: 3,
                    bars: 3,
                },
                Warning::InsufficientHistory {
                    indicator: IndicatorType::Bollinger {
                        period: 5,
                        multiplier: 2.0
                    },
                    window: 5,
                    bars: 3,
                },
            ]
        );
        assert!(set.rows.iter().all(|r| r.upper_band.is_none()));
    }

    #[test]
    fn indicator_types_listed_in_order() {
        let types = all_params().indicator_types();
        assert_eq!(
            types,
            vec![
                IndicatorType::Sma(2),
                IndicatorType::Sma(4),
                IndicatorType::Bollinger {
                    period: 3,
                    multiplier: 2.0
                },
            ]
        );
        assert!(IndicatorParams::default().indicator_types().is_empty());
    }
}
