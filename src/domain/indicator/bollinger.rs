//! Bollinger Bands.
//!
//! - Middle: SMA(n)
//! - Upper: Middle + (multiplier × StdDev(n))
//! - Lower: Middle - (multiplier × StdDev(n))
//!
//! The middle band and the deviation come from `calculate_sma` and
//! `calculate_stddev` over the same window, so a band is defined exactly where
//! both inputs are.
//!
//! Default multiplier: 2.0
//! Warmup: first (period-1) bars are undefined.

use crate::domain::indicator::sma::calculate_sma;
use crate::domain::indicator::stddev::calculate_stddev;
use crate::domain::indicator::{Deviation, IndicatorType};
use crate::domain::ohlcv::Bar;
use chrono::NaiveDate;

pub const DEFAULT_MULTIPLIER: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
    pub std_dev: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerPoint {
    pub date: NaiveDate,
    pub band: Option<Band>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BollingerSeries {
    pub indicator_type: IndicatorType,
    pub deviation: Deviation,
    pub values: Vec<BollingerPoint>,
}

impl BollingerSeries {
    pub fn band_at(&self, index: usize) -> Option<Band> {
        self.values.get(index).and_then(|p| p.band)
    }
}

pub fn calculate_bollinger(
    bars: &[Bar],
    period: usize,
    multiplier: f64,
    deviation: Deviation,
) -> BollingerSeries {
    let middle = calculate_sma(bars, period);
    let spread = calculate_stddev(bars, period, deviation);

    let values = middle
        .values
        .iter()
        .zip(&spread.values)
        .map(|(m, s)| {
            let band = match (m.value, s.value) {
                (Some(middle), Some(std_dev)) => Some(Band {
                    upper: middle + multiplier * std_dev,
                    middle,
                    lower: middle - multiplier * std_dev,
                    std_dev,
                }),
                _ => None,
            };
            BollingerPoint { date: m.date, band }
        })
        .collect();

    BollingerSeries {
        indicator_type: IndicatorType::Bollinger { period, multiplier },
        deviation,
        values,
    }
}
