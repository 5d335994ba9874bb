//! Bar stream over newline-delimited CSV rows.
//!
//! Each row is `timestamp,open,high,low,close,volume`, parsed with the same
//! rules as `CsvAdapter`. Blank lines and a header row are ignored; malformed
//! rows and bars that do not advance the clock are skipped with a warning.
//! End of input ends the stream.

use crate::adapters::csv_adapter::parse_record;
use crate::domain::bar::Bar;
use crate::domain::error::HighedgeError;
use crate::ports::bar_stream_port::BarStreamPort;
use chrono::NaiveDateTime;
use csv::{ReaderBuilder, StringRecord, Trim};
use std::io::Read;
use tracing::warn;

pub struct LineFeedAdapter<R: Read> {
    reader: csv::Reader<R>,
    record: StringRecord,
    last: Option<NaiveDateTime>,
}

impl<R: Read> LineFeedAdapter<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: ReaderBuilder::new()
                .has_headers(false)
                .flexible(true)
                .trim(Trim::All)
                .from_reader(reader),
            record: StringRecord::new(),
            last: None,
        }
    }
}

impl<R: Read> BarStreamPort for LineFeedAdapter<R> {
    fn next_bar(&mut self) -> Result<Option<Bar>, HighedgeError> {
        loop {
            let more = self
                .reader
                .read_record(&mut self.record)
                .map_err(|e| HighedgeError::DataAccess {
                    reason: format!("bar feed read error: {e}"),
                })?;
            if !more {
                return Ok(None);
            }
            let line = self.record.position().map(|p| p.line()).unwrap_or(0);

            if self.record.get(0).is_some_and(|f| f.eq_ignore_ascii_case("timestamp")) {
                continue;
            }

            let bar = match parse_record(&self.record, line) {
                Ok(bar) => bar,
                Err(err) => {
                    warn!(error = %err, "skipping malformed bar");
                    continue;
                }
            };

            if self.last.is_some_and(|last| bar.timestamp <= last) {
                warn!(line, timestamp = %bar.timestamp, "skipping out-of-order bar");
                continue;
            }
            self.last = Some(bar.timestamp);
            return Ok(Some(bar));
        }
    }
}
