//! Rotating file appender with size-triggered rotation and archive retention
//!
//! Records are written as one JSON object per line. Before a write that would
//! push the active file past the configured size, the active file is renamed
//! to `<stem>-<UTC timestamp>.<ext>` and a fresh file is opened at the
//! original path. Archives are then pruned by count and by age, and the
//! survivors optionally gzipped.

use crate::core::appender::Appender;
use crate::core::config::LoggerConfig;
use crate::core::error::{LoggerError, Result};
use crate::core::log_entry::LogEntry;
use crate::core::log_level::LogLevel;
use crate::core::output_format::OutputFormat;
use crate::core::timestamp::TimestampFormat;
use chrono::{DateTime, NaiveDateTime, Utc};
use std::collections::HashSet;
use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const MEGABYTE: u64 = 1024 * 1024;

/// Timestamp embedded in archive names, always UTC.
const BACKUP_TIME_FORMAT: &str = "%Y-%m-%dT%H-%M-%S%.3f";

const COMPRESS_SUFFIX: &str = ".gz";

/// Size and retention limits for a rotating file
///
/// # Examples
///
/// ```
/// use opslog::appenders::{RotationPolicy, MEGABYTE};
/// use std::time::Duration;
///
/// let policy = RotationPolicy::new()
///     .with_max_size(10 * MEGABYTE)
///     .with_max_backups(7)
///     .with_max_age(Duration::from_secs(14 * 24 * 3600))
///     .with_compression(true);
/// assert_eq!(policy.max_bytes, 10 * MEGABYTE);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RotationPolicy {
    /// Rotate before a write would take the active file past this size
    pub max_bytes: u64,
    /// Archives to keep, newest first; `None` keeps all
    pub max_backups: Option<usize>,
    /// Archives older than this are deleted; `None` disables the age limit
    pub max_age: Option<Duration>,
    /// Gzip archives after rotation
    pub compress: bool,
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self::from_config(&LoggerConfig::default())
    }
}

impl RotationPolicy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Translate the logger's tuning knobs, defaulting zeros first.
    ///
    /// A negative size rotates before every write to a non-empty file.
    /// Negative backup or age limits disable that limit.
    #[must_use]
    pub fn from_config(config: &LoggerConfig) -> Self {
        let config = config.clone().with_defaults();

        let max_bytes = u64::try_from(config.max_size_mb)
            .map(|mb| mb.saturating_mul(MEGABYTE))
            .unwrap_or(0);
        let max_backups = usize::try_from(config.max_backups)
            .ok()
            .filter(|count| *count > 0);
        let max_age = u64::try_from(config.max_age_days)
            .ok()
            .filter(|days| *days > 0)
            .map(|days| Duration::from_secs(days.saturating_mul(24 * 3600)));

        Self {
            max_bytes,
            max_backups,
            max_age,
            compress: config.compress,
        }
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_size(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_backups(mut self, count: usize) -> Self {
        self.max_backups = Some(count);
        self
    }

    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_max_age(mut self, age: Duration) -> Self {
        self.max_age = Some(age);
        self
    }

    /// Gzip archives after rotation.
    ///
    /// Compression runs inside the write that triggered the rotation, while
    /// the logger's appender lock is held. Other threads logging through the
    /// same logger block until the archive is packed, so a large `max_bytes`
    /// makes that pause proportionally longer.
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_compression(mut self, enabled: bool) -> Self {
        self.compress = enabled;
        self
    }
}

#[derive(Debug, Clone)]
struct Backup {
    path: PathBuf,
    timestamp: DateTime<Utc>,
    compressed: bool,
}

/// Rotating JSON file appender
///
/// # Examples
///
/// ```no_run
/// use opslog::appenders::{RotatingFileAppender, RotationPolicy, MEGABYTE};
/// use opslog::LogLevel;
///
/// let policy = RotationPolicy::new().with_max_size(5 * MEGABYTE).with_max_backups(3);
/// let appender = RotatingFileAppender::with_policy("/var/log/app.log", policy)
///     .unwrap()
///     .with_min_level(LogLevel::Warn);
/// ```
pub struct RotatingFileAppender {
    base_path: PathBuf,
    policy: RotationPolicy,
    min_level: LogLevel,
    writer: Option<BufWriter<File>>,
    current_size: u64,
    timestamp_format: TimestampFormat,
    output_format: OutputFormat,
}

impl RotatingFileAppender {
    /// Create a new rotating file appender with the default policy
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be created or opened
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::with_policy(path, RotationPolicy::default())
    }

    /// Create a new rotating file appender with custom policy
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be created or opened
    pub fn with_policy<P: AsRef<Path>>(path: P, policy: RotationPolicy) -> Result<Self> {
        let base_path = path.as_ref().to_path_buf();
        let (file, current_size) = Self::open_active(&base_path)?;

        Ok(Self {
            base_path,
            policy,
            min_level: LogLevel::Debug,
            writer: Some(BufWriter::new(file)),
            current_size,
            timestamp_format: TimestampFormat::Rfc3339,
            output_format: OutputFormat::Json,
        })
    }

    /// Drop records below `level`
    #[must_use]
    pub fn with_min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Set the timestamp format for this appender
    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    fn open_active(path: &Path) -> Result<(File, u64)> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                LoggerError::io_operation(
                    "create log directory",
                    format!("Failed to create directory '{}'", parent.display()),
                    e,
                )
            })?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                LoggerError::log_file(
                    path.display().to_string(),
                    format!("Failed to open: {}", e),
                )
            })?;

        let size = file
            .metadata()
            .map_err(|e| {
                LoggerError::log_file(
                    path.display().to_string(),
                    format!("Cannot access file metadata: {}", e),
                )
            })?
            .len();

        Ok((file, size))
    }

    fn should_rotate(&self, incoming: u64) -> bool {
        self.current_size > 0 && self.current_size.saturating_add(incoming) > self.policy.max_bytes
    }

    /// Archive the active file, open a fresh one, then prune archives
    fn rotate(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush().map_err(|e| {
                LoggerError::rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to flush before rotation: {}", e),
                )
            })?;
        }

        if self.base_path.exists() {
            // Archive names must sort after every existing archive
            let newest = self
                .list_backups()
                .ok()
                .and_then(|backups| backups.first().map(|b| b.timestamp));
            let start = match newest {
                Some(newest) if newest >= Utc::now() => newest + chrono::Duration::milliseconds(1),
                _ => Utc::now(),
            };
            let backup_path = self.next_backup_path(start);
            fs::rename(&self.base_path, &backup_path).map_err(|e| {
                LoggerError::rotation(
                    self.base_path.display().to_string(),
                    format!("Failed to archive current log file: {}", e),
                )
            })?;
        }

        let (file, size) = Self::open_active(&self.base_path)?;
        self.writer = Some(BufWriter::new(file));
        self.current_size = size;

        self.prune_backups();
        Ok(())
    }

    fn log_dir(&self) -> &Path {
        match self.base_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    }

    /// `("app-", ".log")` for `app.log`, `("app-", "")` for `app`
    fn name_parts(&self) -> (String, String) {
        let file_name = self
            .base_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "opslog.log".to_string());

        match file_name.rfind('.') {
            Some(idx) if idx > 0 => (
                format!("{}-", &file_name[..idx]),
                file_name[idx..].to_string(),
            ),
            _ => (format!("{}-", file_name), String::new()),
        }
    }

    /// Archive path for `now`, bumped by a millisecond until it is unused
    fn next_backup_path(&self, mut now: DateTime<Utc>) -> PathBuf {
        let (prefix, ext) = self.name_parts();
        loop {
            let candidate = self.log_dir().join(format!(
                "{}{}{}",
                prefix,
                now.format(BACKUP_TIME_FORMAT),
                ext
            ));
            if !candidate.exists() && !compressed_path(&candidate).exists() {
                return candidate;
            }
            now += chrono::Duration::milliseconds(1);
        }
    }

    /// Archived files, newest first
    fn list_backups(&self) -> Result<Vec<Backup>> {
        let (prefix, ext) = self.name_parts();
        let compressed_ext = format!("{}{}", ext, COMPRESS_SUFFIX);

        let entries = fs::read_dir(self.log_dir()).map_err(|e| {
            LoggerError::io_operation(
                "list log archives",
                format!("Cannot read directory '{}'", self.log_dir().display()),
                e,
            )
        })?;

        let mut backups = Vec::new();
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().into_owned();
            let Some(rest) = name.strip_prefix(&prefix) else {
                continue;
            };
            let (stamp, compressed) = if let Some(stamp) = rest.strip_suffix(&compressed_ext) {
                (stamp, true)
            } else if let Some(stamp) = rest.strip_suffix(&ext) {
                (stamp, false)
            } else {
                continue;
            };
            let Ok(naive) = NaiveDateTime::parse_from_str(stamp, BACKUP_TIME_FORMAT) else {
                continue;
            };
            backups.push(Backup {
                path: entry.path(),
                timestamp: naive.and_utc(),
                compressed,
            });
        }

        backups.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(backups)
    }

    /// Apply count and age limits, then compress what is left
    ///
    /// Failures here never fail the write that triggered rotation.
    fn prune_backups(&self) {
        let backups = match self.list_backups() {
            Ok(backups) => backups,
            Err(e) => {
                eprintln!("[LOGGER WARNING] Skipping archive cleanup: {}", e);
                return;
            }
        };

        let mut remaining = Vec::with_capacity(backups.len());
        let mut expired = Vec::new();

        match self.policy.max_backups {
            Some(max) => {
                let mut preserved = HashSet::new();
                for backup in backups {
                    if preserved.len() < max || preserved.contains(&backup.timestamp) {
                        preserved.insert(backup.timestamp);
                        remaining.push(backup);
                    } else {
                        expired.push(backup);
                    }
                }
            }
            None => remaining = backups,
        }

        if let Some(max_age) = self.policy.max_age {
            let cutoff = chrono::Duration::from_std(max_age)
                .ok()
                .and_then(|age| Utc::now().checked_sub_signed(age));
            if let Some(cutoff) = cutoff {
                let (old, fresh): (Vec<_>, Vec<_>) =
                    remaining.into_iter().partition(|b| b.timestamp < cutoff);
                expired.extend(old);
                remaining = fresh;
            }
        }

        for backup in &expired {
            if let Err(e) = fs::remove_file(&backup.path) {
                eprintln!(
                    "[LOGGER WARNING] Failed to remove archive {}: {}",
                    backup.path.display(),
                    e
                );
            }
        }

        if self.policy.compress {
            for backup in remaining.iter().filter(|b| !b.compressed) {
                if let Err(e) = compress_file(&backup.path) {
                    eprintln!("[LOGGER WARNING] {}", e);
                }
            }
        }
    }

    /// Archived files for this log, newest first
    ///
    /// # Errors
    ///
    /// Returns error if the log directory cannot be read
    pub fn backups(&self) -> Result<Vec<PathBuf>> {
        Ok(self.list_backups()?.into_iter().map(|b| b.path).collect())
    }

    /// Get current file size
    #[must_use]
    pub fn current_size(&self) -> u64 {
        self.current_size
    }

    /// Get base path
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.base_path
    }

    /// Get rotation policy
    #[must_use]
    pub fn policy(&self) -> &RotationPolicy {
        &self.policy
    }
}

fn compressed_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(COMPRESS_SUFFIX);
    PathBuf::from(name)
}

/// Gzip `path` to `path.gz`, removing the original only once the compressed
/// copy is complete.
fn compress_file(path: &Path) -> Result<()> {
    let gz_path = compressed_path(path);
    let mut temp_name = OsString::from(gz_path.as_os_str());
    temp_name.push(".tmp");
    let temp_gz_path = PathBuf::from(temp_name);

    let compress = || -> std::io::Result<()> {
        let mut reader = BufReader::with_capacity(64 * 1024, File::open(path)?);
        let output = BufWriter::with_capacity(64 * 1024, File::create(&temp_gz_path)?);
        let mut encoder = flate2::write::GzEncoder::new(output, flate2::Compression::default());
        std::io::copy(&mut reader, &mut encoder)?;
        encoder.finish()?.flush()?;
        fs::rename(&temp_gz_path, &gz_path)
    };

    if let Err(e) = compress() {
        let _ = fs::remove_file(&temp_gz_path);
        return Err(LoggerError::io_operation(
            "compress log archive",
            format!("Failed to compress {}", path.display()),
            e,
        ));
    }

    fs::remove_file(path).map_err(|e| {
        LoggerError::io_operation(
            "compress log archive",
            format!("Compressed but could not remove {}", path.display()),
            e,
        )
    })
}

impl Appender for RotatingFileAppender {
    fn name(&self) -> &str {
        "rotating_file"
    }

    fn min_level(&self) -> LogLevel {
        self.min_level
    }

    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        if !entry.level.passes(self.min_level) {
            return Ok(());
        }

        let mut formatted = self
            .output_format
            .format(entry, &self.timestamp_format, false)?;
        formatted.push('\n');
        let bytes_written = formatted.len() as u64;

        if self.should_rotate(bytes_written) {
            if let Err(e) = self.rotate() {
                eprintln!(
                    "[LOGGER ERROR] Log rotation failed: {}. Continuing with current file.",
                    e
                );

                if self.writer.is_none() {
                    let (file, size) = Self::open_active(&self.base_path)?;
                    self.writer = Some(BufWriter::new(file));
                    self.current_size = size;
                }

                // Let the file grow past the limit instead of retrying every write
                self.current_size = 0;
            }
        }

        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| LoggerError::other("Writer not initialized"))?;
        writer
            .write_all(formatted.as_bytes())
            .and_then(|()| writer.flush())
            .map_err(|e| {
                LoggerError::log_file(
                    self.base_path.display().to_string(),
                    format!("Failed to write log entry: {}", e),
                )
            })?;
        self.current_size += bytes_written;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush().map_err(|e| {
                LoggerError::log_file(
                    self.base_path.display().to_string(),
                    format!("Failed to flush: {}", e),
                )
            })?;
        }
        Ok(())
    }
}

impl Drop for RotatingFileAppender {
    fn drop(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            let _ = writer.flush();
        }
    }
}
