//! JSON trade log adapter.
//!
//! Writes one pretty-printed JSON array of trades per run to
//! `{dir}/backtest-{label}-{YYYYMMDDTHHMMSS}.json`. Existing files are never
//! overwritten; a numeric suffix is added instead.

use crate::domain::error::HighedgeError;
use crate::domain::order::Trade;
use crate::ports::trade_log_port::TradeLogPort;
use std::fs::{self, OpenOptions};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::PathBuf;
use tracing::info;

pub struct JsonTradeLogAdapter {
    dir: PathBuf,
}

impl JsonTradeLogAdapter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn candidate(&self, stem: &str, attempt: u32) -> PathBuf {
        if attempt == 0 {
            self.dir.join(format!("{stem}.json"))
        } else {
            self.dir.join(format!("{stem}-{attempt}.json"))
        }
    }
}

impl TradeLogPort for JsonTradeLogAdapter {
    fn write(&self, label: &str, trades: &[Trade]) -> Result<PathBuf, HighedgeError> {
        fs::create_dir_all(&self.dir).map_err(|e| HighedgeError::TradeLog {
            reason: format!("cannot create {}: {}", self.dir.display(), e),
        })?;

        let stem = format!(
            "backtest-{}-{}",
            label,
            chrono::Local::now().format("%Y%m%dT%H%M%S")
        );

        let mut attempt = 0;
        let (path, file) = loop {
            let path = self.candidate(&stem, attempt);
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => break (path, file),
                Err(e) if e.kind() == ErrorKind::AlreadyExists && attempt < 100 => attempt += 1,
                Err(e) => {
                    return Err(HighedgeError::TradeLog {
                        reason: format!("cannot create {}: {}", path.display(), e),
                    });
                }
            }
        };

        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, trades)?;
        writer.flush()?;

        info!(path = %path.display(), trades = trades.len(), "trade log written");
        Ok(path)
    }
}
