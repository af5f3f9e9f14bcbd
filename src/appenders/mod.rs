//! Appender implementations

pub mod console;
pub mod rotating_file;

pub use console::ConsoleAppender;
pub use rotating_file::{RotatingFileAppender, RotationPolicy, MEGABYTE};

pub use crate::core::Appender;
