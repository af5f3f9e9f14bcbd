//! # opslog
//!
//! Leveled, structured logging for long-running services, plus a small
//! helper for shipping files to S3-compatible object storage.
//!
//! ## Features
//!
//! - **Leveled Records**: `debug` through `fatal`/`panic`, filtered by one threshold
//! - **Console Output**: Colored text with call-site tags
//! - **Rotating JSON Files**: Size-triggered rotation with count and age pruning
//! - **Backup Uploads**: Single-request file uploads to S3
//!
//! ## Example
//!
//! ```
//! use opslog::prelude::*;
//! use opslog::info;
//!
//! let logger = Logger::new(LoggerConfig::default().with_level("debug"));
//! info!(logger, { "jobs" => 4 }, "scheduler started");
//! ```

pub mod appenders;
pub mod backup;
pub mod core;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{ConsoleAppender, RotatingFileAppender, RotationPolicy};
    pub use crate::core::{
        catch_log_panic, Appender, FieldValue, Fields, LogEntry, LogLevel, LogPanic, Logger,
        LoggerConfig, LoggerError, OutputFormat, Result, TimestampFormat,
    };
}

pub use appenders::{ConsoleAppender, RotatingFileAppender, RotationPolicy};
pub use core::{
    catch_log_panic, default_logger, fatal, install_panic_hook, Appender, FieldValue, Fields,
    LogEntry, LogLevel, LogPanic, Logger, LoggerConfig, LoggerError, OutputFormat, Result,
    TimestampFormat, DEFAULT_MAX_AGE_DAYS, DEFAULT_MAX_BACKUPS, DEFAULT_MAX_SIZE_MB,
    FATAL_EXIT_CODE,
};
