//! Output sink for trade logs and chart overlays.

use crate::domain::backtest::BacktestResult;
use crate::domain::chart::ChartRow;
use crate::domain::error::BandcrossError;
use std::path::Path;

pub trait ReportPort {
    fn write_trades(&self, result: &BacktestResult, path: &Path) -> Result<(), BandcrossError>;

    fn write_chart(&self, rows: &[ChartRow], path: &Path) -> Result<(), BandcrossError>;
}
