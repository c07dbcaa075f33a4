//! Rolling-window indicators over closing prices.
//!
//! - `IndicatorPoint`: a single dated value, `None` while the window is warming up
//! - `IndicatorType`: indicator identity + parameters, used in logs and warnings
//! - `IndicatorSeries`: a time series of single-valued indicator points
//! - `Deviation`: which standard deviation estimator the bands use

pub mod bollinger;
pub mod set;
pub mod sma;
pub mod stddev;

use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorPoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum IndicatorType {
    Sma(usize),
    Stddev(usize),
    Bollinger { period: usize, multiplier: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub indicator_type: IndicatorType,
    pub values: Vec<IndicatorPoint>,
}

impl IndicatorSeries {
    pub fn value_at(&self, index: usize) -> Option<f64> {
        self.values.get(index).and_then(|p| p.value)
    }

    pub fn defined_count(&self) -> usize {
        self.values.iter().filter(|p| p.value.is_some()).count()
    }
}

/// Standard deviation estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Deviation {
    /// Divides by n - 1. Undefined for a window of one.
    #[default]
    Sample,
    /// Divides by n.
    Population,
}

impl fmt::Display for Deviation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Deviation::Sample => write!(f, "sample"),
            Deviation::Population => write!(f, "population"),
        }
    }
}

impl FromStr for Deviation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sample" => Ok(Deviation::Sample),
            "population" => Ok(Deviation::Population),
            other => Err(format!(
                "unknown deviation '{other}' (expected sample or population)"
            )),
        }
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Sma(period) => write!(f, "SMA({})", period),
            IndicatorType::Stddev(period) => write!(f, "STDDEV({})", period),
            IndicatorType::Bollinger { period, multiplier } => {
                write!(f, "BOLLINGER({},{})", period, multiplier)
            }
        }
    }
}

/// Mean of a window, summed front to back.
pub(crate) fn window_mean(window: &[f64]) -> f64 {
    window.iter().sum::<f64>() / window.len() as f64
}

/// Standard deviation of a window around its precomputed mean.
///
/// Returns `None` when the estimator has no degrees of freedom left.
pub(crate) fn window_deviation(window: &[f64], mean: f64, deviation: Deviation) -> Option<f64> {
    let divisor = match deviation {
        Deviation::Population => window.len(),
        Deviation::Sample => window.len().checked_sub(1)?,
    };
    if divisor == 0 {
        return None;
    }

    let sum_sq: f64 = window
        .iter()
        .map(|&c| {
            let diff = c - mean;
            diff * diff
        })
        .sum();

    Some((sum_sq / divisor as f64).sqrt())
}

/// Slice of closes ending at `index` (inclusive), or `None` during warmup.
pub(crate) fn trailing_window(closes: &[f64], index: usize, period: usize) -> Option<&[f64]> {
    if period == 0 || index + 1 < period {
        return None;
    }
    Some(&closes[index + 1 - period..=index])
}
