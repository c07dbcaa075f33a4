//! Domain error and warning types.

use crate::domain::indicator::IndicatorType;
use chrono::NaiveDate;
use std::fmt;

/// Top-level error type for bandcross.
#[derive(Debug, thiserror::Error)]
pub enum BandcrossError {
    #[error("invalid price series for {symbol}: {reason}")]
    InvalidSeries { symbol: String, reason: String },

    #[error("bar dated {date} does not follow {previous}")]
    OutOfOrder { date: NaiveDate, previous: NaiveDate },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data source error: {reason}")]
    Data { reason: String },

    #[error("no data for {symbol}")]
    NoData { symbol: String },

    #[error("report error: {reason}")]
    Report { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl BandcrossError {
    pub(crate) fn config_invalid(section: &str, key: &str, reason: impl Into<String>) -> Self {
        BandcrossError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn config_missing(section: &str, key: &str) -> Self {
        BandcrossError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        }
    }
}

impl From<&BandcrossError> for std::process::ExitCode {
    fn from(err: &BandcrossError) -> Self {
        let code: u8 = match err {
            BandcrossError::Io(_) | BandcrossError::Report { .. } => 1,
            BandcrossError::ConfigParse { .. }
            | BandcrossError::ConfigMissing { .. }
            | BandcrossError::ConfigInvalid { .. } => 2,
            BandcrossError::Data { .. } | BandcrossError::NoData { .. } => 3,
            BandcrossError::InvalidSeries { .. } | BandcrossError::OutOfOrder { .. } => 5,
        };
        std::process::ExitCode::from(code)
    }
}

/// Non-fatal conditions surfaced alongside a successful computation.
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    /// The window is at least as long as the series, so the derived series
    /// has no (or a single) defined value.
    InsufficientHistory {
        indicator: IndicatorType,
        window: usize,
        bars: usize,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::InsufficientHistory {
                indicator,
                window,
                bars,
            } => write!(
                f,
                "insufficient history for {indicator}: window {window} >= {bars} bars"
            ),
        }
    }
}
