//! Typed run configuration assembled from a [`ConfigPort`].
//!
//! ```ini
//! [data]
//! symbol = AAPL
//! start_date = 2020-01-01
//! end_date = 2023-12-31
//!
//! [strategy]
//! rule = combined
//! short_window = 50
//! long_window = 200
//! bollinger_window = 20
//! bollinger_k = 2.0
//! deviation = sample
//!
//! [backtest]
//! starting_cash = 10000
//! ```

use crate::domain::backtest::{BacktestConfig, DEFAULT_STARTING_CASH};
use crate::domain::config_validation::validate_run_config;
use crate::domain::error::BandcrossError;
use crate::domain::indicator::bollinger::DEFAULT_MULTIPLIER;
use crate::domain::indicator::set::{BandParams, IndicatorParams, SmaWindows};
use crate::domain::indicator::Deviation;
use crate::domain::signal::RuleVariant;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub symbol: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub rule: RuleVariant,
    pub sma: Option<SmaWindows>,
    pub bands: Option<BandParams>,
    pub backtest: BacktestConfig,
}

impl RunConfig {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, BandcrossError> {
        let symbol = required_string(config, "data", "symbol")?.to_uppercase();
        let start_date = parse_date(config, "start_date")?;
        let end_date = parse_date(config, "end_date")?;

        let rule = parse_value::<RuleVariant>(config, "strategy", "rule")?
            .ok_or_else(|| BandcrossError::config_missing("strategy", "rule"))?;

        let short = parse_value::<usize>(config, "strategy", "short_window")?;
        let long = parse_value::<usize>(config, "strategy", "long_window")?;
        let sma = match (short, long) {
            (Some(short), Some(long)) => Some(SmaWindows { short, long }),
            (None, None) => None,
            (Some(_), None) => return Err(BandcrossError::config_missing("strategy", "long_window")),
            (None, Some(_)) => {
                return Err(BandcrossError::config_missing("strategy", "short_window"));
            }
        };

        let bands = match parse_value::<usize>(config, "strategy", "bollinger_window")? {
            Some(period) => Some(BandParams {
                period,
                multiplier: parse_value::<f64>(config, "strategy", "bollinger_k")?
                    .unwrap_or(DEFAULT_MULTIPLIER),
                deviation: parse_value::<Deviation>(config, "strategy", "deviation")?
                    .unwrap_or_default(),
            }),
            None => None,
        };

        let starting_cash = parse_value::<f64>(config, "backtest", "starting_cash")?
            .unwrap_or(DEFAULT_STARTING_CASH);

        let run_config = RunConfig {
            symbol,
            start_date,
            end_date,
            rule,
            sma,
            bands,
            backtest: BacktestConfig { starting_cash },
        };
        validate_run_config(&run_config)?;
        Ok(run_config)
    }

    /// Indicators the selected rule reads. Configured windows the rule does
    /// not use are left out.
    pub fn indicator_params(&self) -> IndicatorParams {
        IndicatorParams {
            sma: self.sma.filter(|_| self.rule.needs_sma()),
            bands: self.bands.filter(|_| self.rule.needs_bands()),
        }
    }
}

fn required_string(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<String, BandcrossError> {
    match config.get_string(section, key) {
        Some(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        _ => Err(BandcrossError::config_missing(section, key)),
    }
}

fn parse_date(config: &dyn ConfigPort, key: &str) -> Result<NaiveDate, BandcrossError> {
    let raw = required_string(config, "data", key)?;
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|_| {
        BandcrossError::config_invalid("data", key, "invalid date format (expected YYYY-MM-DD)")
    })
}

/// `Ok(None)` when the key is absent or blank.
fn parse_value<T>(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<T>, BandcrossError>
where
    T: FromStr,
    T::Err: ToString,
{
    match config.get_string(section, key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| BandcrossError::config_invalid(section, key, e.to_string())),
        _ => Ok(None),
    }
}
