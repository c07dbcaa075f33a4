//! Price history source.

use crate::domain::error::BandcrossError;
use crate::domain::ohlcv::Bar;
use chrono::NaiveDate;

pub trait DataPort {
    /// Daily bars for `symbol` dated within `[start_date, end_date]`, in the
    /// order the source stores them. An empty result is not an error here.
    fn fetch_bars(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Bar>, BandcrossError>;
}
