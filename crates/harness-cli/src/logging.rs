//! Subscriber setup for the harness binary.

use anyhow::{anyhow, Result};
use clap_verbosity_flag::Level as FlagLevel;
use tracing::level_filters::LevelFilter;

/// Maps the `-v`/`-q` flag level onto a tracing filter. Silenced runs log nothing.
#[must_use]
pub const fn level_filter(level: Option<FlagLevel>) -> LevelFilter {
    match level {
        Some(FlagLevel::Error) => LevelFilter::ERROR,
        Some(FlagLevel::Warn) => LevelFilter::WARN,
        Some(FlagLevel::Info) => LevelFilter::INFO,
        Some(FlagLevel::Debug) => LevelFilter::DEBUG,
        Some(FlagLevel::Trace) => LevelFilter::TRACE,
        None => LevelFilter::OFF,
    }
}

/// Installs a stderr `fmt` subscriber filtered at `filter`.
///
/// # Errors
///
/// Returns an error when a global subscriber is already installed.
pub fn init(filter: LevelFilter) -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!("could not install log subscriber: {err}"))
}
