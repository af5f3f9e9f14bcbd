//! Single-file uploads to S3-compatible object storage
//!
//! Independent of the logger: an [`Uploader`] opens a local file and hands
//! it to an [`ObjectStore`], which stores it whole under one key. The S3
//! store switches to a multipart upload for bodies larger than one part.

pub mod error;
#[cfg(feature = "s3")]
pub mod s3;
pub mod store;
pub mod uploader;

pub use error::BackupError;
#[cfg(feature = "s3")]
pub use s3::{S3ObjectStore, DEFAULT_PART_SIZE};
pub use store::{ObjectStore, UploadPlan, MAX_PARTS, MIN_PART_SIZE};
#[cfg(feature = "s3")]
pub use uploader::upload_target;
pub use uploader::{UploadTarget, Uploader};
