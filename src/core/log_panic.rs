//! Unwinding payload raised by the `panic*` logging calls

use super::fields::Fields;
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

/// Payload carried by the unwind that `Logger::panic` starts after the
/// record has been written.
///
/// It is not an error value: nothing returns it. Recover it at a top-level
/// boundary with [`catch_log_panic`].
#[derive(Debug, Clone, PartialEq)]
pub struct LogPanic {
    pub message: String,
    pub fields: Fields,
    /// `path:line` of the logging call
    pub location: Option<String>,
}

impl LogPanic {
    pub fn new(message: impl Into<String>, fields: Fields, location: Option<String>) -> Self {
        Self {
            message: message.into(),
            fields,
            location,
        }
    }

    /// Borrow the `LogPanic` inside a panic payload, if that is what it holds
    pub fn from_payload(payload: &(dyn Any + Send)) -> Option<&LogPanic> {
        payload.downcast_ref::<LogPanic>()
    }
}

impl fmt::Display for LogPanic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if !self.fields.is_empty() {
            write!(f, " {}", self.fields)?;
        }
        Ok(())
    }
}

impl std::error::Error for LogPanic {}

/// Run `f`, turning an unwind started by a `panic*` logging call into
/// `Err(LogPanic)`.
///
/// Any other panic keeps unwinding. State touched by `f` is not checked for
/// unwind safety; a logger stays usable after the unwind.
///
/// The process panic hook still runs before the unwind reaches this
/// function, so the default hook prints a `panicked at ... Box<dyn Any>`
/// line after the logged record. [`install_panic_hook`] silences it for
/// `LogPanic` payloads.
///
/// # Example
///
/// ```
/// use opslog::{catch_log_panic, Logger, LoggerConfig};
///
/// let logger = Logger::new(LoggerConfig::default());
/// let result = catch_log_panic(|| {
///     logger.panic("state machine corrupted");
/// });
/// assert_eq!(result.unwrap_err().message, "state machine corrupted");
/// ```
pub fn catch_log_panic<F, R>(f: F) -> Result<R, LogPanic>
where
    F: FnOnce() -> R,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => Ok(value),
        Err(payload) => match payload.downcast::<LogPanic>() {
            Ok(log_panic) => Err(*log_panic),
            Err(other) => panic::resume_unwind(other),
        },
    }
}

/// Wrap the current panic hook so it skips `LogPanic` payloads.
///
/// The record for such a panic has already been written by the logger.
/// Every other panic is passed to the previous hook unchanged.
pub fn install_panic_hook() {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        if LogPanic::from_payload(info.payload()).is_none() {
            previous(info);
        }
    }));
}
