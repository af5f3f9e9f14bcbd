//! Output format configuration for log entries
//!
//! - Text: human-readable console line
//! - Json: one JSON object per record, fields flattened to the top level

use super::error::Result;
use super::log_entry::LogEntry;
use super::timestamp::TimestampFormat;
use colored::Colorize;
use std::borrow::Cow;

/// Keys the JSON format writes itself. A field with one of these names is
/// written as `fields.<name>` instead of overwriting the record's own value.
pub const RESERVED_JSON_KEYS: [&str; 4] = ["time", "level", "msg", "file"];

/// Output format for log entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Example: `[2025-01-08 10:30:45] [INFO ] [main.rs:12] Request processed status=200`
    #[default]
    Text,

    /// Example: `{"file":"src/main.rs:12","level":"info","msg":"Request processed","status":200,"time":"2025-01-08T10:30:45Z"}`
    Json,
}

impl OutputFormat {
    /// Format a log entry according to this output format
    ///
    /// `use_colors` only affects `Text`.
    pub fn format(
        &self,
        entry: &LogEntry,
        timestamp_format: &TimestampFormat,
        use_colors: bool,
    ) -> Result<String> {
        match self {
            OutputFormat::Text => Ok(Self::format_text(entry, timestamp_format, use_colors)),
            OutputFormat::Json => Self::format_json(entry, timestamp_format),
        }
    }

    fn format_text(entry: &LogEntry, timestamp_format: &TimestampFormat, use_colors: bool) -> String {
        let label = format!("{:5}", entry.level.to_str());
        let level_str = if use_colors {
            label.color(entry.level.color_code()).to_string()
        } else {
            label
        };

        let mut line = format!(
            "[{}] [{}]",
            timestamp_format.format(&entry.timestamp),
            level_str
        );
        if let Some(caller) = entry.caller_tag() {
            line.push(' ');
            line.push_str(&caller);
        }
        line.push(' ');
        line.push_str(&escape_line_breaks(&entry.message));

        for (key, value) in entry.fields.iter() {
            let key = if use_colors {
                key.color(entry.level.color_code()).to_string()
            } else {
                key.clone()
            };
            line.push_str(&format!(" {}={}", key, value.to_text()));
        }

        line
    }

    fn format_json(entry: &LogEntry, timestamp_format: &TimestampFormat) -> Result<String> {
        let mut json_obj = serde_json::Map::new();

        for (key, value) in entry.fields.iter() {
            let key = if RESERVED_JSON_KEYS.contains(&key.as_str()) {
                format!("fields.{}", key)
            } else {
                key.clone()
            };
            json_obj.insert(key, value.to_json_value());
        }

        json_obj.insert(
            "time".to_string(),
            serde_json::Value::String(timestamp_format.format(&entry.timestamp)),
        );
        json_obj.insert(
            "level".to_string(),
            serde_json::Value::String(entry.level.as_json_str().to_string()),
        );
        json_obj.insert(
            "msg".to_string(),
            serde_json::Value::String(entry.message.clone()),
        );
        if let Some(path) = entry.caller_path() {
            json_obj.insert("file".to_string(), serde_json::Value::String(path));
        }

        Ok(serde_json::to_string(&serde_json::Value::Object(json_obj))?)
    }
}

/// Escape newlines, carriage returns and tabs so one record is one console
/// line. JSON output needs no help: serde_json escapes control characters.
fn escape_line_breaks(message: &str) -> Cow<'_, str> {
    if !message.contains(['\n', '\r', '\t']) {
        return Cow::Borrowed(message);
    }
    Cow::Owned(
        message
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t"),
    )
}
