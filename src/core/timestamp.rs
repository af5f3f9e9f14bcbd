//! Timestamp formatting utilities

use chrono::{DateTime, Local, SecondsFormat};
use serde::{Deserialize, Serialize};

/// Timestamp format options for log output
///
/// # Examples
///
/// ```
/// use opslog::TimestampFormat;
/// use chrono::Local;
///
/// let timestamp = TimestampFormat::Console.format(&Local::now());
/// assert_eq!(timestamp.len(), "2025-01-08 10:30:45".len());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// `2025-01-08 10:30:45`, local time
    #[default]
    Console,

    /// RFC 3339 with the local offset: `2025-01-08T10:30:45+02:00`
    ///
    /// A zero offset is written as `Z`.
    Rfc3339,

    /// Custom strftime format
    Custom(String),
}

impl TimestampFormat {
    /// Format a local `DateTime` according to this format
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Local>) -> String {
        match self {
            TimestampFormat::Console => datetime.format("%Y-%m-%d %H:%M:%S").to_string(),
            TimestampFormat::Rfc3339 => datetime.to_rfc3339_opts(SecondsFormat::Secs, true),
            TimestampFormat::Custom(format_str) => datetime.format(format_str).to_string(),
        }
    }
}
