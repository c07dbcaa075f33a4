//! Per-date overlay rows handed to a chart renderer.

use crate::domain::indicator::set::IndicatorSet;
use crate::domain::signal::{Signal, SignalPoint};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartRow {
    pub date: NaiveDate,
    pub close: f64,
    pub sma_short: Option<f64>,
    pub sma_long: Option<f64>,
    pub middle_band: Option<f64>,
    pub std_dev: Option<f64>,
    pub upper_band: Option<f64>,
    pub lower_band: Option<f64>,
    pub signal: Option<Signal>,
}

/// One row per bar. `signal` is `None` on dates the rule could not evaluate.
pub fn build_chart_rows(indicators: &IndicatorSet, signals: &[SignalPoint]) -> Vec<ChartRow> {
    let by_date: HashMap<NaiveDate, Signal> = signals.iter().map(|p| (p.date, p.signal)).collect();

    indicators
        .rows
        .iter()
        .map(|row| ChartRow {
            date: row.date,
            close: row.close,
            sma_short: row.sma_short,
            sma_long: row.sma_long,
            middle_band: row.middle_band,
            std_dev: row.std_dev,
            upper_band: row.upper_band,
            lower_band: row.lower_band,
            signal: by_date.get(&row.date).copied(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::indicator::set::IndicatorRow;

    fn row(day: u32, close: f64, lower: Option<f64>) -> IndicatorRow {
        IndicatorRow {
            date: NaiveDate::from_ymd_opt(2024, 2, day).unwrap(),
            close,
            sma_short: None,
            sma_long: None,
            middle_band: lower.map(|l| l + 10.0),
            std_dev: lower.map(|_| 5.0),
            upper_band: lower.map(|l| l + 20.0),
            lower_band: lower,
        }
    }

    #[test]
    fn rows_carry_signal_where_present() {
        let set = IndicatorSet {
            rows: vec![row(1, 100.0, None), row(2, 85.0, Some(90.0))],
            warnings: vec![],
        };
        let signals = vec![SignalPoint {
            date: NaiveDate::from_ymd_opt(2024, 2, 2).unwrap(),
            close: 85.0,
            signal: Signal::Buy,
        }];

        let rows = build_chart_rows(&set, &signals);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].signal, None);
        assert_eq!(rows[0].lower_band, None);
        assert_eq!(rows[1].signal, Some(Signal::Buy));
        assert_eq!(rows[1].upper_band, Some(110.0));
        assert_eq!(rows[1].std_dev, Some(5.0));
    }
}
