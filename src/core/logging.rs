//! Run-scoped log subscriber built from an explicit [`LogConfig`].
//!
//! Components log through `tracing` macros. The subscriber receiving them is
//! constructed per run and installed only for the duration of that run via
//! [`with_logging`]; nothing is registered as a process-global default.

use std::io::IsTerminal;

use serde::{Deserialize, Serialize};
use tracing::Dispatch;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Full,
    Compact,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogConfig {
    #[serde(default = "default_level")]
    pub level: LogLevel,

    #[serde(default = "default_format")]
    pub format: LogFormat,

    /// chrono strftime pattern for the timestamp column.
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
            timestamp_format: default_timestamp_format(),
        }
    }
}

fn default_level() -> LogLevel {
    LogLevel::Info
}

fn default_format() -> LogFormat {
    LogFormat::Full
}

fn default_timestamp_format() -> String {
    "%Y-%b-%d %H:%M:%S".to_string()
}

impl LogConfig {
    /// `--debug` raises the level but never lowers an explicit `trace`.
    pub fn with_debug(mut self, debug: bool) -> Self {
        if debug && self.level != LogLevel::Trace {
            self.level = LogLevel::Debug;
        }
        self
    }
}

struct LocalTimer(String);

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "[{}]", chrono::Local::now().format(&self.0))
    }
}

fn build_dispatch<W>(config: &LogConfig, writer: W, ansi: bool) -> Dispatch
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let builder = tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(ansi)
        .with_target(false)
        .with_env_filter(EnvFilter::new(config.level.as_str()))
        .with_timer(LocalTimer(config.timestamp_format.clone()));

    match config.format {
        LogFormat::Full => Dispatch::new(builder.finish()),
        LogFormat::Compact => Dispatch::new(builder.compact().finish()),
    }
}

/// Subscriber writing to stderr, leaving stdout for the JSON response.
pub fn dispatch(config: &LogConfig) -> Dispatch {
    build_dispatch(config, std::io::stderr, std::io::stderr().is_terminal())
}

/// Run `f` with a subscriber built from `config` as the active one.
pub fn with_logging<T>(config: &LogConfig, f: impl FnOnce() -> T) -> T {
    tracing::dispatcher::with_default(&dispatch(config), f)
}
