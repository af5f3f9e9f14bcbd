//! Log level definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Record severity.
///
/// Only `Debug` through `Error` are ever used as a threshold. `Fatal` and
/// `Panic` rank above `Error`, so they pass every threshold the way an
/// `Error` record does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug = 0,
    #[default]
    Info = 1,
    #[serde(rename = "warning")]
    Warn = 2,
    Error = 3,
    Fatal = 4,
    Panic = 5,
}

impl LogLevel {
    /// All severities, lowest first.
    pub const ALL: [LogLevel; 6] = [
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
        LogLevel::Fatal,
        LogLevel::Panic,
    ];

    /// Levels that can be configured as a threshold.
    pub const THRESHOLDS: [LogLevel; 4] = [
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
    ];

    /// Map a configured level name to a threshold.
    ///
    /// Exact, case-sensitive match on `debug`, `info`, `warn` and `error`.
    /// Anything else, including the empty string, yields `Info`.
    ///
    /// ```
    /// use opslog::LogLevel;
    ///
    /// assert_eq!(LogLevel::resolve("warn"), LogLevel::Warn);
    /// assert_eq!(LogLevel::resolve("WARN"), LogLevel::Info);
    /// assert_eq!(LogLevel::resolve(""), LogLevel::Info);
    /// ```
    pub fn resolve(name: &str) -> Self {
        match name {
            "debug" => LogLevel::Debug,
            "warn" => LogLevel::Warn,
            "error" => LogLevel::Error,
            _ => LogLevel::Info,
        }
    }

    /// Whether a record at this level passes `threshold`.
    #[inline]
    pub fn passes(self, threshold: LogLevel) -> bool {
        self >= threshold
    }

    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
            LogLevel::Panic => "PANIC",
        }
    }

    /// Lowercase name used in JSON records.
    pub fn as_json_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warning",
            LogLevel::Error => "error",
            LogLevel::Fatal => "fatal",
            LogLevel::Panic => "panic",
        }
    }

    /// Whether the console routes this level to stderr.
    pub fn is_error_class(&self) -> bool {
        *self >= LogLevel::Error
    }

    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            LogLevel::Debug => BrightBlack,
            LogLevel::Info => Cyan,
            LogLevel::Warn => Yellow,
            LogLevel::Error => Red,
            LogLevel::Fatal => BrightRed,
            LogLevel::Panic => Magenta,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            "FATAL" => Ok(LogLevel::Fatal),
            "PANIC" => Ok(LogLevel::Panic),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_names() {
        assert_eq!(LogLevel::resolve("debug"), LogLevel::Debug);
        assert_eq!(LogLevel::resolve("info"), LogLevel::Info);
        assert_eq!(LogLevel::resolve("warn"), LogLevel::Warn);
        assert_eq!(LogLevel::resolve("error"), LogLevel::Error);
    }

    #[test]
    fn test_resolve_is_case_sensitive_and_total() {
        for name in ["", "Debug", "ERROR", "warning", "fatal", "panic", "trace", " info"] {
            assert_eq!(LogLevel::resolve(name), LogLevel::Info, "name {:?}", name);
        }
    }

    #[test]
    fn test_terminating_levels_pass_every_threshold() {
        for threshold in LogLevel::THRESHOLDS {
            assert!(LogLevel::Fatal.passes(threshold));
            assert!(LogLevel::Panic.passes(threshold));
        }
        assert!(!LogLevel::Debug.passes(LogLevel::Info));
        assert!(LogLevel::Warn.passes(LogLevel::Warn));
    }

    #[test]
    fn test_from_str_is_lenient() {
        assert_eq!("warning".parse::<LogLevel>(), Ok(LogLevel::Warn));
        assert_eq!("Panic".parse::<LogLevel>(), Ok(LogLevel::Panic));
        assert!("verbose".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&LogLevel::Warn).unwrap(), "\"warning\"");
        assert_eq!(serde_json::to_string(&LogLevel::Info).unwrap(), "\"info\"");
        let level: LogLevel = serde_json::from_str("\"panic\"").unwrap();
        assert_eq!(level, LogLevel::Panic);
    }
}
