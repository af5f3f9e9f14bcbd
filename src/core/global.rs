//! Process-wide default logger

use super::{config::LoggerConfig, logger::Logger};
use std::sync::OnceLock;

static DEFAULT_LOGGER: OnceLock<Logger> = OnceLock::new();

/// Console-only logger at `info`, built on first use
pub fn default_logger() -> &'static Logger {
    DEFAULT_LOGGER.get_or_init(|| Logger::new(LoggerConfig::default()))
}

/// Write a fatal record through the default logger and exit with status 1.
///
/// No threshold applies; the record is always written.
#[track_caller]
pub fn fatal(message: impl Into<String>) -> ! {
    default_logger().fatal_unfiltered(message.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LogLevel;

    #[test]
    fn test_default_logger_is_shared() {
        let first = default_logger();
        let second = default_logger();
        assert!(std::ptr::eq(first, second));
        assert_eq!(first.level(), LogLevel::Info);
        assert!(!first.has_file_sink());
    }
}
