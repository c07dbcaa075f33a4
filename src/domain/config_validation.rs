//! Semantic validation of a parsed [`RunConfig`].
//!
//! Key presence and value syntax are checked while parsing; this module checks
//! the values against each other and against the selected rule.

use crate::domain::error::BandcrossError;
use crate::domain::indicator::Deviation;
use crate::domain::run_config::RunConfig;

pub fn validate_run_config(config: &RunConfig) -> Result<(), BandcrossError> {
    validate_symbol(config)?;
    validate_dates(config)?;
    validate_sma_windows(config)?;
    validate_bands(config)?;
    validate_starting_cash(config)?;
    Ok(())
}

fn validate_symbol(config: &RunConfig) -> Result<(), BandcrossError> {
    if config.symbol.trim().is_empty() {
        return Err(BandcrossError::config_missing("data", "symbol"));
    }
    Ok(())
}

fn validate_dates(config: &RunConfig) -> Result<(), BandcrossError> {
    if config.start_date > config.end_date {
        return Err(BandcrossError::config_invalid(
            "data",
            "start_date",
            "start_date must not be after end_date",
        ));
    }
    Ok(())
}

fn validate_sma_windows(config: &RunConfig) -> Result<(), BandcrossError> {
    if !config.rule.needs_sma() {
        return Ok(());
    }
    let Some(windows) = config.sma else {
        return Err(BandcrossError::config_missing("strategy", "short_window"));
    };

    if windows.short == 0 {
        return Err(BandcrossError::config_invalid(
            "strategy",
            "short_window",
            "short_window must be positive",
        ));
    }
    if windows.long <= windows.short {
        return Err(BandcrossError::config_invalid(
            "strategy",
            "long_window",
            "long_window must be greater than short_window",
        ));
    }
    Ok(())
}

fn validate_bands(config: &RunConfig) -> Result<(), BandcrossError> {
    if !config.rule.needs_bands() {
        return Ok(());
    }
    let Some(bands) = config.bands else {
        return Err(BandcrossError::config_missing("strategy", "bollinger_window"));
    };

    if bands.period == 0 {
        return Err(BandcrossError::config_invalid(
            "strategy",
            "bollinger_window",
            "bollinger_window must be positive",
        ));
    }
    if bands.period == 1 && bands.deviation == Deviation::Sample {
        return Err(BandcrossError::config_invalid(
            "strategy",
            "bollinger_window",
            "sample deviation needs a bollinger_window of at least 2",
        ));
    }
    if !(bands.multiplier.is_finite() && bands.multiplier > 0.0) {
        return Err(BandcrossError::config_invalid(
            "strategy",
            "bollinger_k",
            "bollinger_k must be positive",
        ));
    }
    Ok(())
}

fn validate_starting_cash(config: &RunConfig) -> Result<(), BandcrossError> {
    let cash = config.backtest.starting_cash;
    if !(cash.is_finite() && cash > 0.0) {
        return Err(BandcrossError::config_invalid(
            "backtest",
            "starting_cash",
            "starting_cash must be positive",
        ));
    }
    Ok(())
}
