//! Logging: tracing setup plus the client-visible log channel.
//!
//! Pipeline stages never abort a render; failures are recorded as leveled
//! log records that the host transport forwards to the client, and mirrored
//! to `tracing` for the server-side log file.

use chrono::{DateTime, Utc};
use color_eyre::Result;
use serde::Serialize;
use std::fmt;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt as tracing_fmt, prelude::*};

lazy_static::lazy_static! {
    pub static ref LOG_FILE: String = format!("{}.log", env!("CARGO_PKG_NAME"));
}

/// Initialize logging with default settings (WARN level)
pub fn init() -> Result<()> {
    init_with(None, None)
}

/// Initialize logging with custom path and/or level
pub fn init_with(
    custom_log_path: Option<std::path::PathBuf>,
    level: Option<tracing::Level>,
) -> Result<()> {
    let log_path = if let Some(path) = custom_log_path {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        path
    } else {
        std::env::current_dir()?.join(LOG_FILE.clone())
    };

    // Explicit level overrides env; otherwise WARN
    let env_filter = if let Some(lvl) = level {
        EnvFilter::builder()
            .with_default_directive(lvl.into())
            .from_env_lossy()
    } else {
        EnvFilter::builder()
            .with_default_directive(tracing::Level::WARN.into())
            .from_env_lossy()
    };

    let writer_path = log_path.clone();
    let file_subscriber = tracing_fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_writer(move || {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&writer_path)
                .expect("failed to open log file")
        })
        .with_target(false)
        .with_ansi(false)
        .with_filter(env_filter);

    tracing_subscriber::registry()
        .with(file_subscriber)
        .with(ErrorLayer::default())
        .try_init()?;

    Ok(())
}

/// Severity of a client-visible log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// One structured message destined for the client log channel.
#[derive(Debug, Clone, Serialize)]
pub struct LogRecord {
    pub ts: DateTime<Utc>,
    pub source: String,
    pub level: LogLevel,
    pub text: String,
}

impl LogRecord {
    /// Serialize the record for the outbound channel.
    pub fn to_json(&self) -> String {
        // A record is plain data; serialization cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Accumulates client-visible records during one update cycle.
///
/// Every record is also mirrored to `tracing` so the server-side log file
/// sees the same events.
#[derive(Debug, Default)]
pub struct LogBuffer {
    records: Vec<LogRecord>,
}

impl LogBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, level: LogLevel, source: &str, text: String) {
        match level {
            LogLevel::Debug => tracing::debug!(source, "{text}"),
            LogLevel::Info => tracing::info!(source, "{text}"),
            LogLevel::Warn => tracing::warn!(source, "{text}"),
            LogLevel::Error => tracing::error!(source, "{text}"),
        }
        self.records.push(LogRecord {
            ts: Utc::now(),
            source: source.to_string(),
            level,
            text,
        });
    }

    pub fn debug(&mut self, source: &str, text: impl Into<String>) {
        self.push(LogLevel::Debug, source, text.into());
    }

    pub fn info(&mut self, source: &str, text: impl Into<String>) {
        self.push(LogLevel::Info, source, text.into());
    }

    pub fn warn(&mut self, source: &str, text: impl Into<String>) {
        self.push(LogLevel::Warn, source, text.into());
    }

    pub fn error(&mut self, source: &str, text: impl Into<String>) {
        self.push(LogLevel::Error, source, text.into());
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[LogRecord] {
        &self.records
    }

    /// Take all accumulated records, leaving the buffer empty.
    pub fn drain(&mut self) -> Vec<LogRecord> {
        std::mem::take(&mut self.records)
    }
}
