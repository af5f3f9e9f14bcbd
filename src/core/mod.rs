//! Core logger types and traits

pub mod appender;
pub mod config;
pub mod error;
pub mod fields;
pub mod global;
pub mod log_entry;
pub mod log_level;
pub mod log_panic;
pub mod logger;
pub mod output_format;
pub mod timestamp;

pub use appender::Appender;
pub use config::{LoggerConfig, DEFAULT_MAX_AGE_DAYS, DEFAULT_MAX_BACKUPS, DEFAULT_MAX_SIZE_MB};
pub use error::{LoggerError, Result};
pub use fields::{FieldValue, Fields};
pub use global::{default_logger, fatal};
pub use log_entry::LogEntry;
pub use log_level::LogLevel;
pub use log_panic::{catch_log_panic, install_panic_hook, LogPanic};
pub use logger::{Logger, FATAL_EXIT_CODE};
pub use output_format::{OutputFormat, RESERVED_JSON_KEYS};
pub use timestamp::TimestampFormat;
