use slog::{o, Drain, Level, Logger};
use sloggers::{null::NullLoggerBuilder, Build};
use std::str::FromStr;

/// How log records are rendered on stdout.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum LogFormat {
    /// Human readable, one record per line.
    #[default]
    Text,
    /// One JSON object per record.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "TEXT" => Ok(LogFormat::Text),
            "JSON" => Ok(LogFormat::Json),
            other => Err(format!("Logging format not supported: {}", other)),
        }
    }
}

#[derive(Debug, PartialEq, Clone)]
pub struct LoggerConfig {
    /// One of `trace`, `debug`, `info`, `warn`, `error` or `crit`.
    pub debug_level: String,
    pub log_format: LogFormat,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        LoggerConfig {
            debug_level: "info".to_string(),
            log_format: LogFormat::Text,
        }
    }
}

/// Parses a `--debug-level` style string into a `slog::Level`.
pub fn parse_level(debug_level: &str) -> Result<Level, String> {
    match debug_level {
        "info" => Ok(Level::Info),
        "debug" => Ok(Level::Debug),
        "trace" => Ok(Level::Trace),
        "warn" => Ok(Level::Warning),
        "error" => Ok(Level::Error),
        "crit" => Ok(Level::Critical),
        unknown => Err(format!("Unknown debug-level: {}", unknown)),
    }
}

/// Builds the asynchronous root logger described by `config`.
///
/// Records are handed to a dedicated thread which writes them to stdout, so the logging thread
/// never waits on I/O.
pub fn build_logger(config: &LoggerConfig) -> Result<Logger, String> {
    let level = parse_level(&config.debug_level)?;

    let drain = match config.log_format {
        LogFormat::Json => {
            let drain = slog_json::Json::default(std::io::stdout()).fuse();
            slog_async::Async::new(drain).build()
        }
        LogFormat::Text => {
            let decorator = slog_term::TermDecorator::new().stdout().build();
            let drain = slog_term::FullFormat::new(decorator).build().fuse();
            slog_async::Async::new(drain).build()
        }
    };

    Ok(Logger::root(drain.filter_level(level).fuse(), o!()))
}

/// A logger that drops every record.
pub fn null_logger() -> Result<Logger, String> {
    NullLoggerBuilder
        .build()
        .map_err(|e| format!("Failed to start null logger: {:?}", e))
}

/// Return a logger suitable for test usage.
///
/// By default no logs will be printed, but they can be enabled via the `test_logger` feature,
/// e.g. `cargo test -p slashing_protection --features 'logging/test_logger'`.
pub fn test_logger() -> Logger {
    if cfg!(feature = "test_logger") {
        sloggers::terminal::TerminalLoggerBuilder::new()
            .level(sloggers::types::Severity::Debug)
            .build()
            .expect("Should build test_logger")
    } else {
        NullLoggerBuilder.build().expect("Should build null_logger")
    }
}
