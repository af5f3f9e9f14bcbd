//! Console appender implementation

use crate::core::{Appender, LogEntry, OutputFormat, Result, TimestampFormat};
use std::io::Write;

/// Colored text output, one line per record.
///
/// By default `Error` and above go to stderr and everything else to stdout.
/// [`with_writer`](ConsoleAppender::with_writer) sends every record to a
/// single writer instead.
///
/// Colors are forced: an appender built with colors on sets the `colored`
/// override for the whole process, so escape codes are written even when
/// the output is not a terminal or `NO_COLOR` is set. Use
/// [`with_colors(false)`](ConsoleAppender::with_colors) for plain text.
pub struct ConsoleAppender {
    use_colors: bool,
    timestamp_format: TimestampFormat,
    output_format: OutputFormat,
    writer: Option<Box<dyn Write + Send + Sync>>,
}

impl ConsoleAppender {
    pub fn new() -> Self {
        Self::with_colors(true)
    }

    pub fn with_colors(use_colors: bool) -> Self {
        if use_colors {
            colored::control::set_override(true);
        }
        Self {
            use_colors,
            timestamp_format: TimestampFormat::Console,
            output_format: OutputFormat::Text,
            writer: None,
        }
    }

    /// Redirect output to `writer`
    ///
    /// # Example
    ///
    /// ```
    /// use opslog::ConsoleAppender;
    ///
    /// let appender = ConsoleAppender::with_colors(false).with_writer(Vec::new());
    /// ```
    #[must_use]
    pub fn with_writer<W: Write + Send + Sync + 'static>(mut self, writer: W) -> Self {
        self.writer = Some(Box::new(writer));
        self
    }

    /// Set the output format for this appender
    #[must_use]
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Set the timestamp format for this appender
    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::new()
    }
}

impl Appender for ConsoleAppender {
    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        let mut output = self
            .output_format
            .format(entry, &self.timestamp_format, self.use_colors)?;
        output.push('\n');

        match self.writer.as_mut() {
            Some(writer) => writer.write_all(output.as_bytes())?,
            None if entry.level.is_error_class() => {
                std::io::stderr().lock().write_all(output.as_bytes())?
            }
            None => std::io::stdout().lock().write_all(output.as_bytes())?,
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        match self.writer.as_mut() {
            Some(writer) => writer.flush()?,
            None => {
                std::io::stdout().flush()?;
                std::io::stderr().flush()?;
            }
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
