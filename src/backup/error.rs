//! Error types for uploads

use std::path::PathBuf;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum BackupError {
    /// The local file could not be opened; nothing was sent
    #[error("Failed to open '{path}' for upload: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid storage session: {0}")]
    Session(String),

    #[error("Failed to stream upload body: {0}")]
    Body(#[source] BoxError),

    /// Error returned by the storage service, passed through unchanged
    #[error(transparent)]
    Remote(BoxError),
}

impl BackupError {
    pub fn session(message: impl Into<String>) -> Self {
        Self::Session(message.into())
    }

    pub fn remote<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Remote(Box::new(error))
    }

    /// Underlying service error, if this is one
    pub fn remote_error(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        match self {
            Self::Remote(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}
