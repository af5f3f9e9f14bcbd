//! Log entry structure

use super::fields::Fields;
use super::log_level::LogLevel;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::panic::Location;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub timestamp: DateTime<Local>,
    pub file: Option<String>,
    pub line: Option<u32>,
    #[serde(default, skip_serializing_if = "Fields::is_empty")]
    pub fields: Fields,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: String) -> Self {
        Self {
            level,
            message,
            timestamp: Local::now(),
            file: None,
            line: None,
            fields: Fields::new(),
        }
    }

    pub fn with_location(mut self, file: &str, line: u32) -> Self {
        self.file = Some(file.to_string());
        self.line = Some(line);
        self
    }

    /// Record the call site captured by `#[track_caller]`.
    pub fn with_caller(self, location: &Location<'_>) -> Self {
        self.with_location(location.file(), location.line())
    }

    pub fn with_fields(mut self, fields: Fields) -> Self {
        self.fields = fields;
        self
    }

    /// `[file.rs:line]` with the directory part stripped.
    pub fn caller_tag(&self) -> Option<String> {
        let file = self.file.as_deref()?;
        let filename = file.rsplit(['/', '\\']).next().unwrap_or(file);
        Some(format!("[{}:{}]", filename, self.line.unwrap_or(0)))
    }

    /// Full `path:line` of the call site.
    pub fn caller_path(&self) -> Option<String> {
        self.file
            .as_deref()
            .map(|file| format!("{}:{}", file, self.line.unwrap_or(0)))
    }
}
