//! Integration tests for opslog
//!
//! These tests verify:
//! - Level name resolution and threshold filtering
//! - Default rotation knobs
//! - Console-only fallback when the log file cannot be opened
//! - JSON file records and rotation through the logger
//! - Panic records and their recovery

use opslog::prelude::*;
use opslog::{fields, info, DEFAULT_MAX_AGE_DAYS, DEFAULT_MAX_BACKUPS, DEFAULT_MAX_SIZE_MB};
use parking_lot::Mutex;
use std::fs;
use std::io::Write;
use std::sync::Arc;
use tempfile::TempDir;

#[derive(Clone, Default)]
struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    fn contents(&self) -> String {
        String::from_utf8(self.0.lock().clone()).expect("console output is UTF-8")
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<LogEntry>>>);

impl Appender for Captured {
    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        self.0.lock().push(entry.clone());
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "captured"
    }
}

fn console(buffer: &SharedBuffer) -> ConsoleAppender {
    ConsoleAppender::with_colors(false).with_writer(buffer.clone())
}

fn read_json_lines(path: &std::path::Path) -> Vec<serde_json::Value> {
    fs::read_to_string(path)
        .expect("Failed to read log file")
        .lines()
        .map(|line| serde_json::from_str(line).expect("every line is a JSON object"))
        .collect()
}

#[test]
fn test_level_resolution() {
    let cases = [
        ("debug", LogLevel::Debug),
        ("info", LogLevel::Info),
        ("warn", LogLevel::Warn),
        ("error", LogLevel::Error),
        ("", LogLevel::Info),
        ("verbose", LogLevel::Info),
        ("DEBUG", LogLevel::Info),
        ("warning", LogLevel::Info),
    ];

    for (name, expected) in cases {
        let logger = Logger::with_console(
            LoggerConfig::default().with_level(name),
            ConsoleAppender::with_colors(false).with_writer(std::io::sink()),
        );
        assert_eq!(logger.level(), expected, "level name {:?}", name);
    }
}

#[test]
fn test_zero_knobs_take_defaults() {
    let logger = Logger::with_console(
        LoggerConfig::default()
            .with_max_size_mb(0)
            .with_max_backups(0)
            .with_max_age_days(0),
        ConsoleAppender::with_colors(false).with_writer(std::io::sink()),
    );
    assert_eq!(logger.config().max_size_mb, DEFAULT_MAX_SIZE_MB);
    assert_eq!(logger.config().max_backups, DEFAULT_MAX_BACKUPS);
    assert_eq!(logger.config().max_age_days, DEFAULT_MAX_AGE_DAYS);
}

#[test]
fn test_negative_knobs_pass_through() {
    let logger = Logger::with_console(
        LoggerConfig::default()
            .with_max_size_mb(-1)
            .with_max_backups(-2)
            .with_max_age_days(-3),
        ConsoleAppender::with_colors(false).with_writer(std::io::sink()),
    );
    assert_eq!(logger.config().max_size_mb, -1);
    assert_eq!(logger.config().max_backups, -2);
    assert_eq!(logger.config().max_age_days, -3);
}

#[test]
fn test_threshold_matrix() {
    let thresholds = [
        ("debug", LogLevel::Debug),
        ("info", LogLevel::Info),
        ("warn", LogLevel::Warn),
        ("error", LogLevel::Error),
    ];

    for (name, threshold) in thresholds {
        let captured = Captured::default();
        let mut logger = Logger::with_console(
            LoggerConfig::default().with_level(name),
            ConsoleAppender::with_colors(false).with_writer(std::io::sink()),
        );
        logger.add_appender(Box::new(captured.clone()));
        assert_eq!(logger.level(), threshold);

        for level in LogLevel::THRESHOLDS {
            logger.log(level, format!("{} record", level));
        }
        // Fatal exits the process and is covered in fatal_tests.rs
        let caught = catch_log_panic(|| {
            logger.panic("panic record");
        });
        assert!(caught.is_err());

        let emitted: Vec<LogLevel> = captured.0.lock().iter().map(|e| e.level).collect();
        let mut expected: Vec<LogLevel> = LogLevel::THRESHOLDS
            .into_iter()
            .filter(|level| *level >= threshold)
            .collect();
        expected.push(LogLevel::Panic);
        assert_eq!(emitted, expected, "threshold {}", name);
    }
}

#[test]
fn test_with_fields_formats_like_plain_call() {
    let buffer = SharedBuffer::default();
    let logger = Logger::with_console(LoggerConfig::default(), console(&buffer));

    logger.info_with_fields(fields! { "user" => "alice", "attempts" => 3 }, "login ok");
    logger.info("login ok");

    let output = buffer.contents();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("login ok attempts=3 user=alice"), "{}", lines[0]);
    assert!(lines[1].ends_with("login ok"), "{}", lines[1]);
}

#[test]
fn test_console_line_shape() {
    let buffer = SharedBuffer::default();
    let logger = Logger::with_console(LoggerConfig::default(), console(&buffer));

    logger.warn("disk nearly full");

    let output = buffer.contents();
    let line = output.lines().next().expect("one line");
    // [YYYY-MM-DD HH:MM:SS] [WARN ] [integration_tests.rs:N] disk nearly full
    assert_eq!(&line[0..1], "[");
    assert_eq!(&line[20..21], "]");
    assert!(line[21..].starts_with(" [WARN ] [integration_tests.rs:"));
    assert!(line.ends_with("] disk nearly full"));
}

#[test]
fn test_unwritable_file_degrades_to_console() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("missing-dir").join("app.log");
    let buffer = SharedBuffer::default();

    let logger = Logger::with_console(
        LoggerConfig::default().with_file(&log_file),
        console(&buffer),
    );

    assert!(!logger.has_file_sink());
    assert_eq!(logger.file_sink_level(), None);
    assert!(!log_file.exists());

    let setup = buffer.contents();
    let lines: Vec<&str> = setup.lines().collect();
    assert_eq!(lines.len(), 1, "exactly one setup error: {:?}", lines);
    assert!(lines[0].contains("[ERROR]"));
    assert!(lines[0].contains("app.log"));

    logger.info("still running");
    assert!(buffer.contents().lines().last().unwrap().ends_with("still running"));
    assert!(!log_file.exists());
}

#[test]
fn test_file_records_are_json() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("app.log");

    let logger = Logger::with_console(
        LoggerConfig::default().with_level("debug").with_file(&log_file),
        ConsoleAppender::with_colors(false).with_writer(std::io::sink()),
    );
    assert!(logger.has_file_sink());
    assert_eq!(logger.file_sink_level(), Some(LogLevel::Debug));

    logger.debug("cache warm");
    logger.warn_with_fields(
        fields! { "msg" => "shadowed", "bucket" => "nightly", "ok" => false },
        "upload slow",
    );
    logger.flush().expect("Failed to flush");

    let records = read_json_lines(&log_file);
    assert_eq!(records.len(), 2);

    assert_eq!(records[0]["level"], "debug");
    assert_eq!(records[0]["msg"], "cache warm");
    assert!(records[0]["file"]
        .as_str()
        .unwrap()
        .contains("integration_tests.rs:"));
    assert!(chrono::DateTime::parse_from_rfc3339(records[0]["time"].as_str().unwrap()).is_ok());

    assert_eq!(records[1]["level"], "warning");
    assert_eq!(records[1]["msg"], "upload slow");
    assert_eq!(records[1]["fields.msg"], "shadowed");
    assert_eq!(records[1]["bucket"], "nightly");
    assert_eq!(records[1]["ok"], false);
}

#[test]
fn test_file_sink_respects_threshold() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("app.log");

    let logger = Logger::with_console(
        LoggerConfig::default().with_level("error").with_file(&log_file),
        ConsoleAppender::with_colors(false).with_writer(std::io::sink()),
    );
    assert_eq!(logger.file_sink_level(), Some(logger.level()));

    logger.info("dropped");
    logger.warn("dropped");
    logger.error("kept");
    logger.flush().unwrap();

    let records = read_json_lines(&log_file);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["msg"], "kept");
}

#[test]
fn test_log_injection_prevention() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("injection_test.log");

    let logger = Logger::with_console(
        LoggerConfig::default().with_file(&log_file),
        ConsoleAppender::with_colors(false).with_writer(std::io::sink()),
    );

    let malicious_message = "User login\nERROR [2024-10-17] Fake error injected\nINFO Continuation";
    logger.info(malicious_message);
    logger.flush().expect("Failed to flush");

    let records = read_json_lines(&log_file);
    assert_eq!(records.len(), 1, "Log should be a single line, not multiple");
    assert_eq!(records[0]["msg"], malicious_message);
}

#[test]
fn test_multiline_message_survives_file_and_console() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("multiline.log");
    let buffer = SharedBuffer::default();

    let logger = Logger::with_console(
        LoggerConfig::default().with_file(&log_file),
        console(&buffer),
    );

    let message = "query failed:\n\tSELECT 1";
    logger.error(message);
    logger.flush().unwrap();

    let records = read_json_lines(&log_file);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["msg"], message);

    let output = buffer.contents();
    assert_eq!(output.lines().count(), 1);
    assert!(output.trim_end().ends_with("query failed:\\n\\tSELECT 1"));

    let caught = catch_log_panic(|| {
        logger.panic("a\nb");
    })
    .unwrap_err();
    assert_eq!(caught.message, "a\nb");
}

#[test]
fn test_rotation_through_logger() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("service.log");

    let logger = Logger::with_console(
        LoggerConfig::default()
            .with_file(&log_file)
            .with_max_size_mb(1)
            .with_max_backups(2),
        ConsoleAppender::with_colors(false).with_writer(std::io::sink()),
    );

    let payload = "x".repeat(1000);
    for i in 0..2500 {
        info!(logger, "record {} {}", i, payload);
    }
    logger.flush().unwrap();

    let mut archives: Vec<_> = fs::read_dir(temp_dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name != "service.log")
        .collect();
    archives.sort();

    assert!(!archives.is_empty(), "at least one rotation happened");
    assert!(archives.len() <= 2, "backups capped at 2: {:?}", archives);
    for name in &archives {
        assert!(name.starts_with("service-") && name.ends_with(".log"), "{}", name);
    }

    let active = fs::metadata(&log_file).unwrap().len();
    assert!(active <= 1024 * 1024);
    for record in read_json_lines(&log_file) {
        assert_eq!(record["level"], "info");
    }
}

#[test]
fn test_panic_is_recoverable() {
    let buffer = SharedBuffer::default();
    let logger = Logger::with_console(LoggerConfig::default(), console(&buffer));

    let caught = catch_log_panic(|| {
        logger.panic_with_fields(fields! { "node" => "n3" }, "lost quorum");
    })
    .unwrap_err();

    assert_eq!(caught.message, "lost quorum");
    assert_eq!(caught.fields.get("node"), Some(&FieldValue::String("n3".into())));
    assert!(buffer.contents().contains("[PANIC] "));

    logger.info("after recovery");
    assert!(buffer.contents().contains("after recovery"));
}
