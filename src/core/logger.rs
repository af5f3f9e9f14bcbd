//! Main logger implementation

use super::{
    appender::Appender,
    config::LoggerConfig,
    error::{LoggerError, Result},
    fields::Fields,
    log_entry::LogEntry,
    log_level::LogLevel,
    log_panic::LogPanic,
};
use crate::appenders::{ConsoleAppender, RotatingFileAppender, RotationPolicy};
use parking_lot::Mutex;
use std::fs::OpenOptions;
use std::panic::Location;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

/// Exit status used by the `fatal*` calls
pub const FATAL_EXIT_CODE: i32 = 1;

type CallSite = &'static Location<'static>;

/// Leveled logger writing to the console and, optionally, a rotating JSON
/// file.
///
/// Construction never fails. If the log file cannot be opened the logger
/// reports the problem once on the console and carries on without it.
///
/// # Example
///
/// ```no_run
/// use opslog::{fields, Logger, LoggerConfig};
///
/// let logger = Logger::new(
///     LoggerConfig::default()
///         .with_level("debug")
///         .with_file("/var/log/backupd/backupd.log"),
/// );
///
/// logger.info("backup scheduler started");
/// logger.warn_with_fields(fields! { "bucket" => "nightly", "retries" => 2 }, "slow upload");
/// ```
pub struct Logger {
    config: LoggerConfig,
    level: LogLevel,
    file_level: Option<LogLevel>,
    appenders: Mutex<Vec<Box<dyn Appender>>>,
    failed_writes: AtomicU64,
}

impl Logger {
    /// Build a logger with a colored console on stdout/stderr
    #[track_caller]
    #[must_use]
    pub fn new(config: LoggerConfig) -> Self {
        Self::with_console(config, ConsoleAppender::new())
    }

    /// Build a logger around an explicitly configured console appender
    #[track_caller]
    #[must_use]
    pub fn with_console(config: LoggerConfig, console: ConsoleAppender) -> Self {
        let call_site = Location::caller();
        let config = config.with_defaults();
        let level = config.threshold();

        let mut logger = Self {
            config,
            level,
            file_level: None,
            appenders: Mutex::new(vec![Box::new(console)]),
            failed_writes: AtomicU64::new(0),
        };

        if let Some(path) = logger.config.file() {
            match Self::build_file_sink(path, &logger.config, level) {
                Ok(appender) => {
                    logger.file_level = Some(appender.min_level());
                    logger.appenders.get_mut().push(Box::new(appender));
                }
                Err(e) => {
                    let entry =
                        LogEntry::new(LogLevel::Error, e.to_string()).with_caller(call_site);
                    logger.dispatch(&entry);
                }
            }
        }

        logger
    }

    fn build_file_sink(
        path: &Path,
        config: &LoggerConfig,
        level: LogLevel,
    ) -> Result<RotatingFileAppender> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                LoggerError::io_operation(
                    "opening log file",
                    format!("cannot open '{}' for append: {}", path.display(), e),
                    e,
                )
            })?;

        let appender =
            RotatingFileAppender::with_policy(path, RotationPolicy::from_config(config))?
                .with_min_level(level);
        Ok(appender)
    }

    /// Attach an additional output
    ///
    /// It receives every record that passes the logger's threshold.
    pub fn add_appender(&mut self, appender: Box<dyn Appender>) {
        self.appenders.get_mut().push(appender);
    }

    /// Resolved threshold
    pub fn level(&self) -> LogLevel {
        self.level
    }

    /// Configuration after defaults were applied
    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    /// Whether records are also written to the rotating log file
    pub fn has_file_sink(&self) -> bool {
        self.file_level.is_some()
    }

    /// Threshold of the file sink, if one is attached
    pub fn file_sink_level(&self) -> Option<LogLevel> {
        self.file_level
    }

    /// Records that at least one appender failed to write
    pub fn failed_write_count(&self) -> u64 {
        self.failed_writes.load(Ordering::Relaxed)
    }

    pub fn flush(&self) -> Result<()> {
        let mut appenders = self.appenders.lock();
        for appender in appenders.iter_mut() {
            appender.flush()?;
        }
        Ok(())
    }

    fn emit(&self, level: LogLevel, message: String, fields: Fields, call_site: CallSite) {
        if !level.passes(self.level) {
            return;
        }
        self.emit_unfiltered(level, message, fields, call_site);
    }

    fn emit_unfiltered(
        &self,
        level: LogLevel,
        message: String,
        fields: Fields,
        call_site: CallSite,
    ) {
        let entry = LogEntry::new(level, message)
            .with_caller(call_site)
            .with_fields(fields);
        self.dispatch(&entry);
    }

    /// Write one record to every appender
    ///
    /// Each appender is isolated: an error or a panic in one is reported on
    /// stderr and the remaining appenders still receive the record.
    fn dispatch(&self, entry: &LogEntry) {
        let mut appenders = self.appenders.lock();
        let mut has_error = false;

        for (idx, appender) in appenders.iter_mut().enumerate() {
            let append_result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                appender.append(entry)
            }));

            match append_result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    eprintln!(
                        "[LOGGER ERROR] Appender #{} ({}) failed: {}",
                        idx,
                        appender.name(),
                        e
                    );
                    has_error = true;
                }
                Err(panic_info) => {
                    let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                        s.to_string()
                    } else if let Some(s) = panic_info.downcast_ref::<String>() {
                        s.clone()
                    } else {
                        "Unknown panic".to_string()
                    };
                    eprintln!(
                        "[LOGGER ERROR] Appender #{} panicked: {}. \
                         Other appenders continue to function.",
                        idx, panic_msg
                    );
                    has_error = true;
                }
            }
        }

        if has_error {
            self.failed_writes.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn terminate(&self) -> ! {
        if let Err(e) = self.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush before exit: {}", e);
        }
        std::process::exit(FATAL_EXIT_CODE)
    }

    #[track_caller]
    fn raise(&self, entry: LogEntry) -> ! {
        if let Err(e) = self.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush before panic: {}", e);
        }
        let location = entry.caller_path();
        std::panic::panic_any(LogPanic::new(entry.message, entry.fields, location))
    }

    /// Write a record at `level`
    #[track_caller]
    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        self.emit(level, message.into(), Fields::new(), Location::caller());
    }

    /// Write a record at `level` with structured fields
    #[track_caller]
    pub fn log_with_fields(&self, level: LogLevel, fields: Fields, message: impl Into<String>) {
        self.emit(level, message.into(), fields, Location::caller());
    }

    #[inline]
    #[track_caller]
    pub fn debug(&self, message: impl Into<String>) {
        self.emit(LogLevel::Debug, message.into(), Fields::new(), Location::caller());
    }

    #[inline]
    #[track_caller]
    pub fn info(&self, message: impl Into<String>) {
        self.emit(LogLevel::Info, message.into(), Fields::new(), Location::caller());
    }

    #[inline]
    #[track_caller]
    pub fn warn(&self, message: impl Into<String>) {
        self.emit(LogLevel::Warn, message.into(), Fields::new(), Location::caller());
    }

    #[inline]
    #[track_caller]
    pub fn error(&self, message: impl Into<String>) {
        self.emit(LogLevel::Error, message.into(), Fields::new(), Location::caller());
    }

    #[track_caller]
    pub fn debug_with_fields(&self, fields: Fields, message: impl Into<String>) {
        self.emit(LogLevel::Debug, message.into(), fields, Location::caller());
    }

    #[track_caller]
    pub fn info_with_fields(&self, fields: Fields, message: impl Into<String>) {
        self.emit(LogLevel::Info, message.into(), fields, Location::caller());
    }

    #[track_caller]
    pub fn warn_with_fields(&self, fields: Fields, message: impl Into<String>) {
        self.emit(LogLevel::Warn, message.into(), fields, Location::caller());
    }

    #[track_caller]
    pub fn error_with_fields(&self, fields: Fields, message: impl Into<String>) {
        self.emit(LogLevel::Error, message.into(), fields, Location::caller());
    }

    /// Write a fatal record, flush, and exit the process with status 1
    #[track_caller]
    pub fn fatal(&self, message: impl Into<String>) -> ! {
        self.fatal_with_fields(Fields::new(), message)
    }

    /// Write a fatal record with fields, flush, and exit the process with
    /// status 1
    #[track_caller]
    pub fn fatal_with_fields(&self, fields: Fields, message: impl Into<String>) -> ! {
        self.emit(LogLevel::Fatal, message.into(), fields, Location::caller());
        self.terminate()
    }

    /// Write the record unconditionally, then exit. Used by [`crate::fatal`].
    #[track_caller]
    pub(crate) fn fatal_unfiltered(&self, message: String) -> ! {
        self.emit_unfiltered(LogLevel::Fatal, message, Fields::new(), Location::caller());
        self.terminate()
    }

    /// Write a panic record, then unwind with a [`LogPanic`] payload
    #[track_caller]
    pub fn panic(&self, message: impl Into<String>) -> ! {
        self.panic_with_fields(Fields::new(), message)
    }

    /// Write a panic record with fields, then unwind with a [`LogPanic`]
    /// payload
    #[track_caller]
    pub fn panic_with_fields(&self, fields: Fields, message: impl Into<String>) -> ! {
        let call_site = Location::caller();
        let message = message.into();
        let entry = LogEntry::new(LogLevel::Panic, message)
            .with_caller(call_site)
            .with_fields(fields);
        if entry.level.passes(self.level) {
            self.dispatch(&entry);
        }
        self.raise(entry)
    }
}

impl Default for Logger {
    #[track_caller]
    fn default() -> Self {
        Self::new(LoggerConfig::default())
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        for appender in self.appenders.get_mut().iter_mut() {
            if let Err(e) = appender.flush() {
                eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
            }
        }
    }
}
