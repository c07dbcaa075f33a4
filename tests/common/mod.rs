#![allow(dead_code)]

use bandcross::domain::backtest::BacktestConfig;
use bandcross::domain::error::BandcrossError;
use bandcross::domain::indicator::set::{BandParams, SmaWindows};
use bandcross::domain::indicator::Deviation;
pub use bandcross::domain::ohlcv::{Bar, PriceSeries};
use bandcross::domain::run_config::RunConfig;
use bandcross::domain::signal::RuleVariant;
use bandcross::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<Bar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<Bar>) -> Self {
        self.data.insert(symbol.to_string(), bars);
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_bars(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Bar>, BandcrossError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(BandcrossError::Data {
                reason: reason.clone(),
            });
        }
        Ok(self
            .data
            .get(symbol)
            .map(|bars| {
                bars.iter()
                    .filter(|b| b.date >= start_date && b.date <= end_date)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn make_bar(date_str: &str, close: f64) -> Bar {
    Bar {
        date: date(date_str),
        open: close - 1.0,
        high: close + 1.0,
        low: close - 2.0,
        close,
        volume: 1000,
    }
}

/// One bar per calendar day starting at `start`.
pub fn generate_bars(start: &str, closes: &[f64]) -> Vec<Bar> {
    let start = date(start);
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Bar {
            date: start + chrono::Duration::days(i as i64),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1000,
        })
        .collect()
}

pub fn make_series(symbol: &str, closes: &[f64]) -> PriceSeries {
    PriceSeries::new(symbol, generate_bars("2024-01-01", closes)).unwrap()
}

/// `n` closes rising linearly from `from` to `to`.
pub fn linear(from: f64, to: f64, n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| from + (to - from) * i as f64 / (n - 1) as f64)
        .collect()
}

pub fn sample_config(rule: RuleVariant) -> RunConfig {
    RunConfig {
        symbol: "TEST".into(),
        start_date: date("2024-01-01"),
        end_date: date("2024-12-31"),
        rule,
        sma: Some(SmaWindows { short: 5, long: 10 }),
        bands: Some(BandParams {
            period: 20,
            multiplier: 2.0,
            deviation: Deviation::Sample,
        }),
        backtest: BacktestConfig::default(),
    }
}
