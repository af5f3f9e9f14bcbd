//! Object storage abstraction

use super::error::BackupError;
use async_trait::async_trait;
use tokio::fs::File;

/// Smallest part S3 accepts in a multipart upload (the last part excepted)
pub const MIN_PART_SIZE: u64 = 5 * 1024 * 1024;

/// Most parts a single multipart upload may have
pub const MAX_PARTS: u64 = 10_000;

/// Destination for uploaded objects.
///
/// Implementations store `body` whole under `bucket`/`key`, replacing any
/// existing object, and report the service's own error as
/// [`BackupError::Remote`]. A store that splits large bodies must leave no
/// partial object behind when it fails.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put_object(&self, bucket: &str, key: &str, body: File) -> Result<(), BackupError>;

    fn name(&self) -> &str;
}

/// How a body of a given length is sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPlan {
    /// One request carries the whole body
    Single,
    /// `parts` requests of `part_size` bytes, the last one possibly shorter
    Multipart { part_size: u64, parts: u64 },
}

impl UploadPlan {
    /// Bodies no larger than `part_size` go up in one request.
    ///
    /// `part_size` is raised to [`MIN_PART_SIZE`], and raised further when
    /// the body would otherwise need more than [`MAX_PARTS`] parts.
    pub fn for_len(len: u64, part_size: u64) -> Self {
        let part_size = part_size.max(MIN_PART_SIZE);
        if len <= part_size {
            return UploadPlan::Single;
        }

        let part_size = part_size.max(len.div_ceil(MAX_PARTS));
        UploadPlan::Multipart {
            part_size,
            parts: len.div_ceil(part_size),
        }
    }

    /// Byte length of part `number` (1-based) of a `len`-byte body
    pub fn part_len(&self, len: u64, number: u64) -> u64 {
        match *self {
            UploadPlan::Single => len,
            UploadPlan::Multipart { part_size, .. } => {
                let start = number.saturating_sub(1).saturating_mul(part_size);
                len.saturating_sub(start).min(part_size)
            }
        }
    }
}
