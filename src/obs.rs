//! Tracing subscriber setup for the binary.
//!
//! Logs go to stderr so stdout stays free for the JSON report.

/// Install the global subscriber. `HIGHEDGE_LOG` overrides `log_level`.
pub fn init_tracing(log_level: &str, log_format: &str) -> Result<(), String> {
    let filter = std::env::var("HIGHEDGE_LOG").unwrap_or_else(|_| log_level.to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_new(filter)
        .map_err(|err| format!("invalid log filter: {err}"))?;

    let installed = match log_format.trim().to_lowercase().as_str() {
        "json" => tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .json()
            .try_init(),
        "text" | "" => tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_writer(std::io::stderr)
            .try_init(),
        other => return Err(format!("unknown log format '{other}', expected text or json")),
    };
    installed.map_err(|err| format!("failed to install tracing subscriber: {err}"))
}
