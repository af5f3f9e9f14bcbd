//! File uploader

use super::{error::BackupError, store::ObjectStore};
#[cfg(feature = "s3")]
use super::s3::S3ObjectStore;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::fs::File;

/// Uploads local files to an [`ObjectStore`].
///
/// Each call opens its own file handle and closes it before returning,
/// whatever the outcome. Calls on one uploader may run concurrently.
///
/// # Example
///
/// ```no_run
/// use opslog::backup::Uploader;
///
/// # async fn run() -> Result<(), opslog::backup::BackupError> {
/// let uploader = Uploader::new("us-east-1", "AKIDEXAMPLE", "secret")?;
/// uploader
///     .upload("/var/backups/db-2024-05-01.tar.gz", "nightly-backups", "db/2024-05-01.tar.gz")
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Uploader<S> {
    store: S,
}

#[cfg(feature = "s3")]
impl Uploader<S3ObjectStore> {
    /// Uploader for AWS S3 in `region` using a static key pair
    pub fn new(
        region: impl Into<String>,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Result<Self, BackupError> {
        Ok(Self::with_store(S3ObjectStore::new(
            region, access_key, secret_key,
        )?))
    }
}

impl<S: ObjectStore> Uploader<S> {
    pub fn with_store(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Upload the file at `source` to `bucket`/`key`
    pub async fn upload(
        &self,
        source: impl AsRef<Path>,
        bucket: &str,
        key: &str,
    ) -> Result<(), BackupError> {
        let source = source.as_ref();
        let file = File::open(source).await.map_err(|e| BackupError::Open {
            path: source.to_path_buf(),
            source: e,
        })?;

        self.store.put_object(bucket, key, file).await
    }
}

/// One upload described entirely by value
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadTarget {
    pub region: String,
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    pub source: PathBuf,
    pub key: String,
}

impl fmt::Debug for UploadTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UploadTarget")
            .field("region", &self.region)
            .field("access_key", &self.access_key)
            .field("secret_key", &"<redacted>")
            .field("bucket", &self.bucket)
            .field("source", &self.source)
            .field("key", &self.key)
            .finish()
    }
}

/// Build a fresh S3 uploader for `target` and perform its upload
#[cfg(feature = "s3")]
pub async fn upload_target(target: &UploadTarget) -> Result<(), BackupError> {
    Uploader::new(
        target.region.clone(),
        target.access_key.clone(),
        target.secret_key.clone(),
    )?
    .upload(&target.source, &target.bucket, &target.key)
    .await
}
