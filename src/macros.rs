//! Logging macros for ergonomic log message formatting.
//!
//! These macros provide a convenient interface for logging with automatic
//! string formatting, similar to `println!` and `format!`. An optional
//! `{ key => value, .. }` block before the format string attaches
//! structured fields.
//!
//! # Examples
//!
//! ```
//! use opslog::prelude::*;
//! use opslog::{info, warn};
//!
//! let logger = Logger::new(LoggerConfig::default());
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//!
//! // With fields
//! warn!(logger, { "bucket" => "nightly", "attempt" => 2 }, "upload slow after {}s", 30);
//! ```

/// Build a [`Fields`](crate::Fields) map from `key => value` pairs.
///
/// # Examples
///
/// ```
/// use opslog::fields;
///
/// let fields = fields! { "user" => "alice", "attempts" => 3 };
/// assert_eq!(fields.len(), 2);
/// ```
#[macro_export]
macro_rules! fields {
    () => {
        $crate::Fields::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut fields = $crate::Fields::new();
        $( fields.insert($key, $value); )+
        fields
    }};
}

/// Log a message with automatic formatting.
///
/// # Examples
///
/// ```
/// # use opslog::prelude::*;
/// # let logger = Logger::new(LoggerConfig::default());
/// use opslog::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// log!(logger, LogLevel::Warn, { "disk" => "/dev/sda1" }, "usage at {}%", 91);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, { $($key:expr => $value:expr),* $(,)? }, $($arg:tt)+) => {
        $logger.log_with_fields($level, $crate::fields! { $($key => $value),* }, format!($($arg)+))
    };
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, format!($($arg)+))
    };
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use opslog::prelude::*;
/// # let logger = Logger::new(LoggerConfig::default().with_level("debug"));
/// use opslog::debug;
/// debug!(logger, "Debug information");
/// debug!(logger, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use opslog::prelude::*;
/// # let logger = Logger::new(LoggerConfig::default());
/// use opslog::info;
/// info!(logger, "Application started");
/// info!(logger, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use opslog::prelude::*;
/// # let logger = Logger::new(LoggerConfig::default());
/// use opslog::warn;
/// warn!(logger, "Low disk space");
/// warn!(logger, "Retry attempt {} of {}", 3, 5);
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use opslog::prelude::*;
/// # let logger = Logger::new(LoggerConfig::default());
/// use opslog::error;
/// error!(logger, "Failed to connect to database");
/// error!(logger, "Error code: {}, message: {}", 500, "Internal error");
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message, then exit the process with status 1.
///
/// # Examples
///
/// ```no_run
/// # use opslog::prelude::*;
/// # let logger = Logger::new(LoggerConfig::default());
/// use opslog::fatal;
/// fatal!(logger, "Unable to recover from error: {}", "disk full");
/// ```
#[macro_export]
macro_rules! fatal {
    ($logger:expr, { $($key:expr => $value:expr),* $(,)? }, $($arg:tt)+) => {
        $logger.fatal_with_fields($crate::fields! { $($key => $value),* }, format!($($arg)+))
    };
    ($logger:expr, $($arg:tt)+) => {
        $logger.fatal(format!($($arg)+))
    };
}

/// Log a panic-level message, then unwind with a [`LogPanic`](crate::LogPanic).
///
/// # Examples
///
/// ```
/// # use opslog::prelude::*;
/// # let logger = Logger::new(LoggerConfig::default());
/// use opslog::log_panic;
/// let caught = catch_log_panic(|| {
///     log_panic!(logger, { "table" => "users" }, "index {} corrupted", 3);
/// });
/// assert_eq!(caught.unwrap_err().message, "index 3 corrupted");
/// ```
#[macro_export]
macro_rules! log_panic {
    ($logger:expr, { $($key:expr => $value:expr),* $(,)? }, $($arg:tt)+) => {
        $logger.panic_with_fields($crate::fields! { $($key => $value),* }, format!($($arg)+))
    };
    ($logger:expr, $($arg:tt)+) => {
        $logger.panic(format!($($arg)+))
    };
}
