//! Daily OHLCV bars and the validated price series built from them.

use crate::domain::error::BandcrossError;
use chrono::NaiveDate;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// An immutable, strictly date-ascending series of bars for one symbol.
///
/// The only way to obtain a `PriceSeries` is [`PriceSeries::new`], which
/// rejects empty, unsorted, or duplicate-dated input, and bars whose close
/// is not a positive finite number.
#[derive(Debug, Clone)]
pub struct PriceSeries {
    symbol: String,
    bars: Vec<Bar>,
    date_index: HashMap<NaiveDate, usize>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, bars: Vec<Bar>) -> Result<Self, BandcrossError> {
        let symbol = symbol.into();
        let invalid = |reason: String| BandcrossError::InvalidSeries {
            symbol: symbol.clone(),
            reason,
        };

        if bars.is_empty() {
            return Err(invalid("series is empty".into()));
        }

        if let Some(bad) = bars.iter().find(|b| !(b.close.is_finite() && b.close > 0.0)) {
            return Err(invalid(format!(
                "close on {} must be a positive number, got {}",
                bad.date, bad.close
            )));
        }

        for (i, pair) in bars.windows(2).enumerate() {
            let (prev, curr) = (pair[0].date, pair[1].date);
            if curr == prev {
                return Err(invalid(format!("duplicate date {curr} at position {}", i + 1)));
            }
            if curr < prev {
                return Err(invalid(format!(
                    "dates out of order at position {}: {curr} follows {prev}",
                    i + 1
                )));
            }
        }

        let date_index = bars
            .iter()
            .enumerate()
            .map(|(i, bar)| (bar.date, i))
            .collect();

        Ok(Self {
            symbol,
            bars,
            date_index,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Always false for a constructed series.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn get_bar_index(&self, date: NaiveDate) -> Option<usize> {
        self.date_index.get(&date).copied()
    }

    pub fn last_bar(&self) -> &Bar {
        &self.bars[self.bars.len() - 1]
    }
}
