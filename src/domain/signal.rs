//! Signal derivation from aligned indicator rows.
//!
//! Three rule variants are supported:
//!
//! - `Band`: level rule on the Bollinger envelope. Buy below the lower band,
//!   Sell above the upper band. Touching a band is Hold.
//! - `Crossover`: edge rule on SMA(short) vs SMA(long). Buy on the date the
//!   short average moves above the long one, Sell on the date it stops being
//!   above. The state before the first eligible date is "not above", so a
//!   series whose short average is already above the long one when both become
//!   defined starts with a Buy.
//! - `Combined`: level rule evaluated independently per date.
//!   Buy: close < lower AND short > long. Sell: close > upper OR short < long.
//!
//! Dates lacking any indicator the variant needs produce no signal at all.

use crate::domain::indicator::set::{IndicatorRow, IndicatorSet};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Buy => write!(f, "BUY"),
            Signal::Sell => write!(f, "SELL"),
            Signal::Hold => write!(f, "HOLD"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SignalPoint {
    pub date: NaiveDate,
    pub close: f64,
    pub signal: Signal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleVariant {
    Band,
    Crossover,
    Combined,
}

impl RuleVariant {
    pub fn needs_sma(self) -> bool {
        matches!(self, RuleVariant::Crossover | RuleVariant::Combined)
    }

    pub fn needs_bands(self) -> bool {
        matches!(self, RuleVariant::Band | RuleVariant::Combined)
    }
}

impl fmt::Display for RuleVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleVariant::Band => write!(f, "band"),
            RuleVariant::Crossover => write!(f, "crossover"),
            RuleVariant::Combined => write!(f, "combined"),
        }
    }
}

impl FromStr for RuleVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "band" => Ok(RuleVariant::Band),
            "crossover" => Ok(RuleVariant::Crossover),
            "combined" => Ok(RuleVariant::Combined),
            other => Err(format!(
                "unknown rule '{other}' (expected band, crossover or combined)"
            )),
        }
    }
}

struct BandInputs {
    close: f64,
    lower: f64,
    upper: f64,
}

struct SmaInputs {
    short: f64,
    long: f64,
}

fn band_inputs(row: &IndicatorRow) -> Option<BandInputs> {
    Some(BandInputs {
        close: row.close,
        lower: row.lower_band?,
        upper: row.upper_band?,
    })
}

fn sma_inputs(row: &IndicatorRow) -> Option<SmaInputs> {
    Some(SmaInputs {
        short: row.sma_short?,
        long: row.sma_long?,
    })
}

fn band_signal(b: &BandInputs) -> Signal {
    if b.close < b.lower {
        Signal::Buy
    } else if b.close > b.upper {
        Signal::Sell
    } else {
        Signal::Hold
    }
}

fn combined_signal(b: &BandInputs, s: &SmaInputs) -> Signal {
    if b.close < b.lower && s.short > s.long {
        Signal::Buy
    } else if b.close > b.upper || s.short < s.long {
        Signal::Sell
    } else {
        Signal::Hold
    }
}

/// Edge detector for the crossover rule.
#[derive(Debug, Default)]
struct CrossoverState {
    short_above_long: bool,
}

impl CrossoverState {
    fn update(&mut self, s: &SmaInputs) -> Signal {
        let above = s.short > s.long;
        let signal = match (self.short_above_long, above) {
            (false, true) => Signal::Buy,
            (true, false) => Signal::Sell,
            _ => Signal::Hold,
        };
        self.short_above_long = above;
        signal
    }
}

pub fn generate_signals(indicators: &IndicatorSet, variant: RuleVariant) -> Vec<SignalPoint> {
    let mut crossover = CrossoverState::default();

    indicators
        .rows
        .iter()
        .filter_map(|row| {
            let signal = match variant {
                RuleVariant::Band => band_signal(&band_inputs(row)?),
                RuleVariant::Crossover => crossover.update(&sma_inputs(row)?),
                RuleVariant::Combined => combined_signal(&band_inputs(row)?, &sma_inputs(row)?),
            };
            Some(SignalPoint {
                date: row.date,
                close: row.close,
                signal,
            })
        })
        .collect()
}
