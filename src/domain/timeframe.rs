//! Bar timeframes and which data paths support them.

use std::fmt;
use std::str::FromStr;

use crate::domain::error::HighedgeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Timeframe {
    OneSecond,
    OneMinute,
    FiveMinutes,
    FifteenMinutes,
    OneHour,
    OneDay,
}

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::OneSecond => "1S",
            Timeframe::OneMinute => "1Min",
            Timeframe::FiveMinutes => "5Min",
            Timeframe::FifteenMinutes => "15Min",
            Timeframe::OneHour => "1H",
            Timeframe::OneDay => "1D",
        }
    }

    /// Second bars only exist as an aggregated live stream.
    pub fn supports_historical(&self) -> bool {
        !matches!(self, Timeframe::OneSecond)
    }

    pub fn supports_live(&self) -> bool {
        matches!(self, Timeframe::OneSecond | Timeframe::OneMinute)
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = HighedgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1S" => Ok(Timeframe::OneSecond),
            "1Min" => Ok(Timeframe::OneMinute),
            "5Min" => Ok(Timeframe::FiveMinutes),
            "15Min" => Ok(Timeframe::FifteenMinutes),
            "1H" => Ok(Timeframe::OneHour),
            "1D" => Ok(Timeframe::OneDay),
            other => Err(HighedgeError::UnsupportedTimeframe {
                value: other.to_string(),
            }),
        }
    }
}
