//! CSV report adapter implementing ReportPort.
//!
//! Trade log columns: `entry_date,exit_date,entry_price,exit_price,shares,pnl`.
//! Chart columns: `date,close,sma_short,sma_long,middle_band,std_dev,upper_band,lower_band,signal`,
//! with undefined values left empty.

use std::fs;
use std::path::Path;

use serde::Serialize;

use crate::domain::backtest::BacktestResult;
use crate::domain::chart::ChartRow;
use crate::domain::error::BandcrossError;
use crate::ports::report_port::ReportPort;

#[derive(Debug, Default)]
pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn new() -> Self {
        CsvReportAdapter
    }

    fn write_rows<T: Serialize>(
        &self,
        rows: &[T],
        headers: &[&str],
        path: &Path,
    ) -> Result<(), BandcrossError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(path)
            .map_err(|e| BandcrossError::Report {
                reason: format!("failed to create {}: {}", path.display(), e),
            })?;

        let to_report_err = |e: csv::Error| BandcrossError::Report {
            reason: format!("failed to write {}: {}", path.display(), e),
        };
        // Written explicitly so an empty log still carries its header.
        wtr.write_record(headers).map_err(to_report_err)?;
        for row in rows {
            wtr.serialize(row).map_err(to_report_err)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

const TRADE_HEADERS: [&str; 6] = [
    "entry_date",
    "exit_date",
    "entry_price",
    "exit_price",
    "shares",
    "pnl",
];

const CHART_HEADERS: [&str; 9] = [
    "date",
    "close",
    "sma_short",
    "sma_long",
    "middle_band",
    "std_dev",
    "upper_band",
    "lower_band",
    "signal",
];

impl ReportPort for CsvReportAdapter {
    fn write_trades(&self, result: &BacktestResult, path: &Path) -> Result<(), BandcrossError> {
        self.write_rows(&result.trades, &TRADE_HEADERS, path)
    }

    fn write_chart(&self, rows: &[ChartRow], path: &Path) -> Result<(), BandcrossError> {
        self.write_rows(rows, &CHART_HEADERS, path)
    }
}
