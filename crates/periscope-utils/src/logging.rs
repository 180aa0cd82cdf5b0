//! # Logging Utilities
//!
//! Logging infrastructure for Periscope using `tracing`.
//!
//! A debugger extension has one hard logging constraint: it must never write
//! to the host's interactive console, where its output would interleave with
//! the user's command results. [`init_logging_for_host`] therefore logs to a
//! file only and is what a session bootstrap should call; the console
//! initializers exist for tests and for running the engine against the mock
//! host.
//!
//! ## Environment Variables
//!
//! - `RUST_LOG`: level filter (e.g. `debug`, `periscope_core=debug`)
//! - `PERISCOPE_LOG_FORMAT`: output format (`json` or `pretty`, default: `pretty`)
//! - `PERISCOPE_LOG_FILE`: optional log file path for the console initializers
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use periscope_utils::init_logging;
//!
//! init_logging().expect("Failed to initialize logging");
//! tracing::info!("extension loaded");
//! ```

use std::path::PathBuf;
use std::str::FromStr;
use std::{env, io};

use chrono::Utc;
use tracing::Level;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::{self};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat
{
    /// Pretty-printed, human-readable format (default for development)
    Pretty,
    /// JSON format (default for production)
    Json,
}

impl FromStr for LogFormat
{
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "pretty" | "dev" | "development" => Ok(LogFormat::Pretty),
            "json" | "prod" | "production" => Ok(LogFormat::Json),
            _ => Err(format!("Unknown log format: {s}. Use 'pretty' or 'json'")),
        }
    }
}

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel
{
    /// Error level
    Error,
    /// Warning level
    Warn,
    /// Info level (default)
    Info,
    /// Debug level
    Debug,
    /// Trace level (most verbose)
    Trace,
}

impl From<LogLevel> for Level
{
    fn from(level: LogLevel) -> Self
    {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

impl FromStr for LogLevel
{
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "error" | "err" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" | "dbg" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(format!(
                "Unknown log level: {s}. Use 'error', 'warn', 'info', 'debug', or 'trace'"
            )),
        }
    }
}

/// Initialize console logging with settings from the environment
///
/// Reads `PERISCOPE_LOG_FORMAT`, `PERISCOPE_LOG_FILE`, and `RUST_LOG`.
/// Only for tests and mock-host runs; inside a real host use
/// [`init_logging_for_host`].
///
/// ## Errors
///
/// Returns an error if logging is already initialized or file logging fails.
pub fn init_logging() -> Result<(), LoggingError>
{
    let format = env::var("PERISCOPE_LOG_FORMAT")
        .ok()
        .and_then(|s| LogFormat::from_str(&s).ok())
        .unwrap_or(LogFormat::Pretty);

    let default_level = env::var("RUST_LOG")
        .unwrap_or_else(|_| "info".to_string())
        .parse::<LogLevel>()
        .map(Into::into)
        .unwrap_or(Level::INFO);

    init_console(format, default_level)
}

/// Initialize console logging with an explicit level and format
///
/// ## Errors
///
/// Returns an error if logging is already initialized or file logging fails.
pub fn init_logging_with_level(level: LogLevel, format: LogFormat) -> Result<(), LoggingError>
{
    init_console(format, level.into())
}

/// Initialize file-only logging for running inside a debugger host
///
/// Writes to `~/.periscope/YYYY-MM-DD-periscope.log` (falling back to
/// `/tmp`) and never to stdout/stderr, so extension logs cannot interleave
/// with the host's interactive console. Returns the log file path.
///
/// ## Arguments
///
/// * `level` - Optional level override. If `None`, uses `RUST_LOG` or `INFO`.
///
/// ## Errors
///
/// Returns an error if logging is already initialized or file creation fails.
pub fn init_logging_for_host(level: Option<LogLevel>) -> Result<PathBuf, LoggingError>
{
    let today = Utc::now().format("%Y-%m-%d");
    let log_file = if let Ok(home) = env::var("HOME") {
        let periscope_dir = PathBuf::from(home).join(".periscope");
        std::fs::create_dir_all(&periscope_dir).map_err(LoggingError::FileError)?;
        periscope_dir.join(format!("{today}-periscope.log"))
    } else {
        PathBuf::from("/tmp").join(format!("{today}-periscope.log"))
    };

    init_file_only(log_file.clone(), level.map(Into::into))?;
    Ok(log_file)
}

/// Filter resolution shared by the initializers.
///
/// Priority: explicit level override, then `RUST_LOG` (which supports
/// module-specific filters), then `INFO`.
fn env_filter(explicit_level: Option<Level>) -> EnvFilter
{
    if let Some(level) = explicit_level {
        EnvFilter::new(level.to_string())
    } else if let Ok(rust_log) = env::var("RUST_LOG") {
        EnvFilter::try_new(&rust_log).unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string()))
    } else {
        EnvFilter::new(Level::INFO.to_string())
    }
}

/// Console initialization, with an optional extra file copy from
/// `PERISCOPE_LOG_FILE`.
fn init_console(format: LogFormat, default_level: Level) -> Result<(), LoggingError>
{
    let filter = env_filter(Some(default_level));
    let log_file = env::var("PERISCOPE_LOG_FILE").ok().map(PathBuf::from);

    match format {
        LogFormat::Pretty => {
            let console_layer = fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_timer(ChronoUtc::rfc_3339())
                .with_ansi(true)
                .with_writer(io::stdout)
                .with_filter(filter);

            match log_file {
                Some(path) => {
                    let file_layer = fmt::layer()
                        .with_writer(non_blocking_appender(&path))
                        .with_target(true)
                        .with_file(true)
                        .with_line_number(true)
                        .with_timer(ChronoUtc::rfc_3339())
                        .with_ansi(false) // No ANSI in files
                        .with_filter(env_filter(None));
                    Registry::default().with(console_layer).with(file_layer).init();
                }
                None => Registry::default().with(console_layer).init(),
            }
        }
        LogFormat::Json => {
            let console_layer = fmt::layer()
                .json()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_timer(ChronoUtc::rfc_3339())
                .with_current_span(true)
                .with_span_list(true)
                .with_writer(io::stdout)
                .with_filter(filter);

            match log_file {
                Some(path) => {
                    let file_layer = fmt::layer()
                        .json()
                        .with_writer(non_blocking_appender(&path))
                        .with_target(true)
                        .with_file(true)
                        .with_line_number(true)
                        .with_timer(ChronoUtc::rfc_3339())
                        .with_current_span(true)
                        .with_span_list(true)
                        .with_ansi(false)
                        .with_filter(env_filter(None));
                    Registry::default().with(console_layer).with(file_layer).init();
                }
                None => Registry::default().with(console_layer).init(),
            }
        }
    }

    Ok(())
}

/// File-only initialization used inside a debugger host.
fn init_file_only(log_file: PathBuf, explicit_level: Option<Level>) -> Result<(), LoggingError>
{
    let file_layer = fmt::layer()
        .with_writer(non_blocking_appender(&log_file))
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .with_timer(ChronoUtc::rfc_3339())
        .with_ansi(false) // No ANSI in files
        .with_filter(env_filter(explicit_level));

    Registry::default().with(file_layer).init();
    Ok(())
}

/// Build a non-blocking appender for `path`, leaking the flush guard.
///
/// The guard must live for the process lifetime; a debugger extension has no
/// shutdown hook to hand it back to, so it is intentionally forgotten.
fn non_blocking_appender(path: &std::path::Path) -> tracing_appender::non_blocking::NonBlocking
{
    // The filename already carries the date, so no rotation.
    let appender = tracing_appender::rolling::never(
        path.parent().unwrap_or_else(|| std::path::Path::new(".")),
        path.file_name().unwrap_or_default(),
    );
    let (non_blocking, guard) = tracing_appender::non_blocking(appender);
    std::mem::forget(guard);
    non_blocking
}

/// Logging initialization error
#[derive(Debug, thiserror::Error)]
pub enum LoggingError
{
    /// Invalid log format
    #[error("Invalid log format: {0}")]
    InvalidFormat(String),

    /// Invalid log level
    #[error("Invalid log level: {0}")]
    InvalidLevel(String),

    /// Failed to initialize logging
    #[error("Failed to initialize logging: {0}")]
    InitializationFailed(String),

    /// File logging error
    #[error("File logging error: {0}")]
    FileError(#[from] io::Error),
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_log_format_from_str()
    {
        assert_eq!(LogFormat::from_str("pretty").unwrap(), LogFormat::Pretty);
        assert_eq!(LogFormat::from_str("json").unwrap(), LogFormat::Json);
        assert_eq!(LogFormat::from_str("dev").unwrap(), LogFormat::Pretty);
        assert_eq!(LogFormat::from_str("prod").unwrap(), LogFormat::Json);
        assert!(LogFormat::from_str("invalid").is_err());
    }

    #[test]
    fn test_log_level_from_str()
    {
        assert_eq!(LogLevel::from_str("error").unwrap(), LogLevel::Error);
        assert_eq!(LogLevel::from_str("warn").unwrap(), LogLevel::Warn);
        assert_eq!(LogLevel::from_str("info").unwrap(), LogLevel::Info);
        assert_eq!(LogLevel::from_str("debug").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("trace").unwrap(), LogLevel::Trace);
        assert!(LogLevel::from_str("invalid").is_err());
    }

    #[test]
    fn test_log_level_to_tracing_level()
    {
        assert_eq!(Level::from(LogLevel::Error), Level::ERROR);
        assert_eq!(Level::from(LogLevel::Warn), Level::WARN);
        assert_eq!(Level::from(LogLevel::Info), Level::INFO);
        assert_eq!(Level::from(LogLevel::Debug), Level::DEBUG);
        assert_eq!(Level::from(LogLevel::Trace), Level::TRACE);
    }
}
