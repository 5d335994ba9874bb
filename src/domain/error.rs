//! Domain error types.

/// Top-level error type for highedge.
#[derive(Debug, thiserror::Error)]
pub enum HighedgeError {
    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("unsupported timeframe: {value}")]
    UnsupportedTimeframe { value: String },

    #[error("unsupported venue: {value}")]
    UnsupportedVenue { value: String },

    #[error("unsupported strategy: {value}")]
    UnsupportedStrategy { value: String },

    #[error("data access error: {reason}")]
    DataAccess { reason: String },

    #[error("no data for {symbol} ({timeframe})")]
    NoData { symbol: String, timeframe: String },

    #[error("venue error: {reason}")]
    Venue { reason: String },

    #[error("trade log error: {reason}")]
    TradeLog { reason: String },

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl HighedgeError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            HighedgeError::Io(_)
            | HighedgeError::TradeLog { .. }
            | HighedgeError::Serialization(_) => 1,
            HighedgeError::ConfigParse { .. }
            | HighedgeError::ConfigMissing { .. }
            | HighedgeError::ConfigInvalid { .. }
            | HighedgeError::UnsupportedTimeframe { .. }
            | HighedgeError::UnsupportedVenue { .. }
            | HighedgeError::UnsupportedStrategy { .. } => 2,
            HighedgeError::DataAccess { .. } => 3,
            HighedgeError::NoData { .. } => 5,
            HighedgeError::Venue { .. } => 6,
        }
    }
}

impl From<&HighedgeError> for std::process::ExitCode {
    fn from(err: &HighedgeError) -> Self {
        std::process::ExitCode::from(err.exit_code())
    }
}
