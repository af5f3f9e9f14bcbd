//! Appender trait for log output destinations

use super::{error::Result, log_entry::LogEntry, log_level::LogLevel};

/// A log output destination.
///
/// The logger filters records against its own threshold before calling
/// `append`; an appender with a stricter `min_level` drops the rest itself.
pub trait Appender: Send + Sync {
    fn append(&mut self, entry: &LogEntry) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;

    /// Lowest severity this appender writes.
    fn min_level(&self) -> LogLevel {
        LogLevel::Debug
    }
}
