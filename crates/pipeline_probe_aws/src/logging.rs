//! Tracing subscriber setup shared by the probe and the compute function.
//!
//! Verbosity comes from `LOG_LEVEL` (`DEBUG`, `INFO`, `WARNING`, `ERROR`;
//! anything else falls back to `INFO`). `LOG_FORMAT=json` switches from
//! timestamped text lines to JSON lines.

use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::error::ProbeError;

pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

pub fn parse_log_level(raw: Option<&str>) -> Level {
    match raw.map(|value| value.trim().to_ascii_uppercase()).as_deref() {
        Some("DEBUG") => Level::DEBUG,
        Some("WARNING") | Some("WARN") => Level::WARN,
        Some("ERROR") => Level::ERROR,
        _ => Level::INFO,
    }
}

pub fn parse_log_format(raw: Option<&str>) -> LogFormat {
    match raw.map(str::trim) {
        Some(value) if value.eq_ignore_ascii_case("json") => LogFormat::Json,
        _ => LogFormat::Text,
    }
}

pub fn init_tracing_from_env() -> Result<(), ProbeError> {
    let level = parse_log_level(std::env::var(LOG_LEVEL_ENV).ok().as_deref());
    let format = parse_log_format(std::env::var(LOG_FORMAT_ENV).ok().as_deref());
    init_tracing(level, format)
}

/// Installs the global subscriber. Fails if one is already installed.
pub fn init_tracing(level: Level, format: LogFormat) -> Result<(), ProbeError> {
    let filter = EnvFilter::default().add_directive(LevelFilter::from_level(level).into());

    let installed = match format {
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
    };
    installed.map_err(|err| ProbeError::Logging(err.to_string()))
}
