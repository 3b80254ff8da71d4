// src/logging.rs

//! Diagnostics setup for `wrapbar` using `tracing` + `tracing-subscriber`.
//!
//! Priority for determining the log level:
//! 1. `--log-level` CLI flag (if provided)
//! 2. [`LOG_ENV`] (`WRAPBAR_LOG`) environment variable (e.g. "info", "debug")
//! 3. default to `warn`
//!
//! Diagnostics share stderr with the bar, so anything chattier than `warn`
//! will interleave with the render. The per-item run log is separate; see
//! [`sink`](crate::sink).

use anyhow::Result;
use clap::ValueEnum;
use tracing::Level;
use tracing_subscriber::fmt;

use crate::cli::LogLevel;

/// Environment variable consulted when `--log-level` is absent.
pub const LOG_ENV: &str = "WRAPBAR_LOG";

/// Initialise global logging subscriber.
///
/// Safe to call once at startup.
pub fn init_logging(cli_level: Option<LogLevel>) -> Result<()> {
    let level = cli_level
        .or_else(|| std::env::var(LOG_ENV).ok().and_then(|s| parse_level(&s)))
        .map(Level::from)
        .unwrap_or(Level::WARN);

    fmt()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("installing tracing subscriber: {e}"))?;

    Ok(())
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

/// Same names as `--log-level`, case-insensitive, plus `warning`.
fn parse_level(s: &str) -> Option<LogLevel> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("warning") {
        return Some(LogLevel::Warn);
    }
    <LogLevel as ValueEnum>::from_str(s, true).ok()
}
