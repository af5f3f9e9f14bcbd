//! Error types for the logger system

use std::io;

pub type Result<T> = std::result::Result<T, LoggerError>;

/// Failures inside the logger and its appenders.
///
/// The logger never returns these from a logging call; they surface through
/// `flush()`, appender construction, and the `[LOGGER ERROR]` diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// IO error with the operation that was being attempted
    #[error("IO error while {operation}: {message}")]
    IoContext {
        operation: String,
        message: String,
        #[source]
        source: io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Opening or writing the active log file failed
    #[error("Log file error for '{path}': {message}")]
    LogFile { path: String, message: String },

    /// Archiving the active log file failed
    #[error("File rotation failed for '{path}': {message}")]
    Rotation { path: String, message: String },

    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: io::Error,
    ) -> Self {
        LoggerError::IoContext {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    pub fn log_file(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::LogFile {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn rotation(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::Rotation {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }
}
