//! CSV bar data adapter.
//!
//! Reads `{dir}/{SYMBOL}_{timeframe}.csv` with a header row and the columns
//! `timestamp,open,high,low,close,volume`.

use crate::domain::bar::Bar;
use crate::domain::error::HighedgeError;
use crate::domain::timeframe::Timeframe;
use crate::ports::data_port::DataPort;
use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str, timeframe: Timeframe) -> PathBuf {
        self.base_path
            .join(format!("{}_{}.csv", symbol.to_uppercase(), timeframe))
    }
}

/// Accepts `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS` or a bare date.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

fn field(record: &StringRecord, index: usize, name: &str, line: u64) -> Result<f64, HighedgeError> {
    let raw = record.get(index).ok_or_else(|| HighedgeError::DataAccess {
        reason: format!("line {line}: missing {name} column"),
    })?;
    raw.trim().parse().map_err(|e| HighedgeError::DataAccess {
        reason: format!("line {line}: invalid {name} value '{raw}': {e}"),
    })
}

/// Parse one `timestamp,open,high,low,close,volume` record.
pub fn parse_record(record: &StringRecord, line: u64) -> Result<Bar, HighedgeError> {
    let raw_ts = record.get(0).ok_or_else(|| HighedgeError::DataAccess {
        reason: format!("line {line}: missing timestamp column"),
    })?;
    let timestamp = parse_timestamp(raw_ts).ok_or_else(|| HighedgeError::DataAccess {
        reason: format!("line {line}: invalid timestamp '{raw_ts}'"),
    })?;

    Ok(Bar {
        timestamp,
        open: field(record, 1, "open", line)?,
        high: field(record, 2, "high", line)?,
        low: field(record, 3, "low", line)?,
        close: field(record, 4, "close", line)?,
        volume: field(record, 5, "volume", line)?,
    })
}

fn read_bars(path: &Path) -> Result<Vec<Bar>, HighedgeError> {
    let file = File::open(path).map_err(|e| HighedgeError::DataAccess {
        reason: format!("failed to read {}: {}", path.display(), e),
    })?;

    let mut rdr = csv::Reader::from_reader(file);
    let mut bars = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| HighedgeError::DataAccess {
            reason: format!("CSV parse error in {}: {}", path.display(), e),
        })?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        bars.push(parse_record(&record, line)?);
    }
    Ok(bars)
}

impl DataPort for CsvAdapter {
    fn get_historical_bars(
        &self,
        symbol: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
        timeframe: Timeframe,
    ) -> Result<Vec<Bar>, HighedgeError> {
        if !timeframe.supports_historical() {
            return Err(HighedgeError::UnsupportedTimeframe {
                value: timeframe.to_string(),
            });
        }

        let path = self.csv_path(symbol, timeframe);
        let mut bars: Vec<Bar> = read_bars(&path)?
            .into_iter()
            .filter(|b| b.timestamp >= start && b.timestamp <= end)
            .collect();
        bars.sort_by_key(|b| b.timestamp);
        bars.dedup_by_key(|b| b.timestamp);

        debug!(path = %path.display(), bars = bars.len(), "csv bars loaded");

        if bars.is_empty() {
            return Err(HighedgeError::NoData {
                symbol: symbol.to_string(),
                timeframe: timeframe.to_string(),
            });
        }

        Ok(bars)
    }
}
