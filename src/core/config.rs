//! Logger configuration surface
//!
//! Hosts fill a [`LoggerConfig`] (directly or by deserializing it from their
//! own configuration files) and hand it to [`Logger::new`](super::Logger::new).

use super::log_level::LogLevel;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_MAX_SIZE_MB: i64 = 50;
pub const DEFAULT_MAX_BACKUPS: i64 = 3;
pub const DEFAULT_MAX_AGE_DAYS: i64 = 30;

/// Logger configuration
///
/// Zero tuning knobs are replaced with defaults when the logger is built.
/// Negative values are passed through untouched.
///
/// # Example
///
/// ```
/// use opslog::LoggerConfig;
///
/// let config = LoggerConfig::default()
///     .with_level("debug")
///     .with_file("/var/log/app.log")
///     .with_max_backups(7)
///     .with_defaults();
///
/// assert_eq!(config.max_size_mb, 50);
/// assert_eq!(config.max_backups, 7);
/// assert_eq!(config.max_age_days, 30);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// `debug`, `info`, `warn` or `error`; anything else means `info`
    pub level: String,
    /// Log file; `None` or an empty path disables file output
    pub file_path: Option<PathBuf>,
    /// Size in MiB at which the active file is rotated
    pub max_size_mb: i64,
    /// Number of archived files to keep
    pub max_backups: i64,
    /// Age in days after which archived files are deleted
    pub max_age_days: i64,
    /// Gzip archived files
    pub compress: bool,
}

impl LoggerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.level = level.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_max_size_mb(mut self, size: i64) -> Self {
        self.max_size_mb = size;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_max_backups(mut self, count: i64) -> Self {
        self.max_backups = count;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn with_max_age_days(mut self, days: i64) -> Self {
        self.max_age_days = days;
        self
    }

    /// Gzip rotated archives. The archive is compressed synchronously under
    /// the appender lock; see [`RotationPolicy::with_compression`].
    ///
    /// [`RotationPolicy::with_compression`]: crate::appenders::RotationPolicy::with_compression
    #[must_use = "builder methods return a new value"]
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }

    /// Replace zero tuning knobs with their defaults (50 MiB, 3 backups, 30 days)
    pub fn apply_defaults(&mut self) {
        if self.max_size_mb == 0 {
            self.max_size_mb = DEFAULT_MAX_SIZE_MB;
        }
        if self.max_backups == 0 {
            self.max_backups = DEFAULT_MAX_BACKUPS;
        }
        if self.max_age_days == 0 {
            self.max_age_days = DEFAULT_MAX_AGE_DAYS;
        }
    }

    /// Owned form of [`apply_defaults`](Self::apply_defaults)
    #[must_use]
    pub fn with_defaults(mut self) -> Self {
        self.apply_defaults();
        self
    }

    /// Threshold this configuration resolves to
    pub fn threshold(&self) -> LogLevel {
        LogLevel::resolve(&self.level)
    }

    /// The log file, if file output is enabled
    pub fn file(&self) -> Option<&Path> {
        self.file_path
            .as_deref()
            .filter(|path| !path.as_os_str().is_empty())
    }
}
