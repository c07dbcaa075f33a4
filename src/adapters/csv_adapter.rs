//! CSV file data adapter. One `<SYMBOL>.csv` per symbol with header
//! `date,open,high,low,close,volume`.

use crate::domain::error::BandcrossError;
use crate::domain::ohlcv::Bar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use csv::StringRecord;
use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::debug;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

fn column<T>(record: &StringRecord, index: usize, name: &str, line: u64) -> Result<T, BandcrossError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    record
        .get(index)
        .ok_or_else(|| BandcrossError::Data {
            reason: format!("line {line}: missing {name} column"),
        })?
        .parse()
        .map_err(|e| BandcrossError::Data {
            reason: format!("line {line}: invalid {name} value: {e}"),
        })
}

impl DataPort for CsvAdapter {
    fn fetch_bars(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<Bar>, BandcrossError> {
        let path = self.csv_path(symbol);
        let content = fs::read_to_string(&path).map_err(|e| BandcrossError::Data {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());
        let mut bars = Vec::new();

        for result in rdr.records() {
            let record = result.map_err(|e| BandcrossError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;
            let line = record.position().map_or(0, |p| p.line());

            let date_str = record.get(0).ok_or_else(|| BandcrossError::Data {
                reason: format!("line {line}: missing date column"),
            })?;
            let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
                BandcrossError::Data {
                    reason: format!("line {line}: invalid date format: {e}"),
                }
            })?;

            if date < start_date || date > end_date {
                continue;
            }

            bars.push(Bar {
                date,
                open: column(&record, 1, "open", line)?,
                high: column(&record, 2, "high", line)?,
                low: column(&record, 3, "low", line)?,
                close: column(&record, 4, "close", line)?,
                volume: column(&record, 5, "volume", line)?,
            });
        }

        debug!(symbol, path = %path.display(), bars = bars.len(), "loaded bars");
        Ok(bars)
    }
}
