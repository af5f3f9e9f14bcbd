//! Amazon S3 (and S3-compatible) object store

use super::{
    error::BackupError,
    store::{ObjectStore, UploadPlan, MIN_PART_SIZE},
};
use async_trait::async_trait;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{CompletedMultipartUpload, CompletedPart};
use aws_sdk_s3::Client;
use tokio::fs::File;
use tokio::io::AsyncReadExt;

const CREDENTIALS_PROVIDER: &str = "opslog-static";

/// Part size used unless [`S3ObjectStore::with_part_size`] says otherwise
pub const DEFAULT_PART_SIZE: u64 = MIN_PART_SIZE;

/// S3 client authenticated with a static access key pair.
///
/// Bodies up to the part size go up in one `PutObject`. Larger bodies use a
/// multipart upload, which is aborted if any step fails so no partial
/// object is left behind. Building a store performs no network I/O.
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: Client,
    region: String,
    part_size: u64,
}

impl S3ObjectStore {
    pub fn new(
        region: impl Into<String>,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Result<Self, BackupError> {
        Self::with_endpoint(region, access_key, secret_key, None::<String>)
    }

    /// Target an S3-compatible service at `endpoint` with path-style
    /// addressing. `None` uses the AWS endpoint for the region.
    pub fn with_endpoint(
        region: impl Into<String>,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
        endpoint: Option<impl Into<String>>,
    ) -> Result<Self, BackupError> {
        let region = region.into();
        validate_region(&region)?;

        let credentials = Credentials::new(access_key, secret_key, None, None, CREDENTIALS_PROVIDER);
        let mut builder = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(region.clone()))
            .credentials_provider(credentials);

        if let Some(endpoint) = endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        Ok(Self {
            client: Client::from_conf(builder.build()),
            region,
            part_size: DEFAULT_PART_SIZE,
        })
    }

    /// Multipart part size, and the body size above which multipart is used.
    /// Values below [`MIN_PART_SIZE`] are raised to it.
    #[must_use]
    pub fn with_part_size(mut self, bytes: u64) -> Self {
        self.part_size = bytes.max(MIN_PART_SIZE);
        self
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn part_size(&self) -> u64 {
        self.part_size
    }

    async fn put_single(&self, bucket: &str, key: &str, body: File) -> Result<(), BackupError> {
        let body = ByteStream::read_from()
            .file(body)
            .build()
            .await
            .map_err(|e| BackupError::Body(Box::new(e)))?;

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .send()
            .await
            .map_err(|e| BackupError::remote(aws_sdk_s3::Error::from(e)))?;

        Ok(())
    }

    async fn put_multipart(
        &self,
        bucket: &str,
        key: &str,
        body: File,
        len: u64,
        plan: UploadPlan,
    ) -> Result<(), BackupError> {
        let created = self
            .client
            .create_multipart_upload()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| BackupError::remote(aws_sdk_s3::Error::from(e)))?;
        let upload_id = created
            .upload_id()
            .map(str::to_owned)
            .ok_or_else(|| BackupError::Remote("multipart upload created without an upload id".into()))?;

        let result: Result<(), BackupError> = async {
            let parts = self
                .upload_parts(bucket, key, &upload_id, body, len, plan)
                .await?;
            self.client
                .complete_multipart_upload()
                .bucket(bucket)
                .key(key)
                .upload_id(&upload_id)
                .multipart_upload(CompletedMultipartUpload::builder().set_parts(Some(parts)).build())
                .send()
                .await
                .map_err(|e| BackupError::remote(aws_sdk_s3::Error::from(e)))?;
            Ok(())
        }
        .await;

        if result.is_err() {
            self.abort(bucket, key, &upload_id).await;
        }
        result
    }

    async fn upload_parts(
        &self,
        bucket: &str,
        key: &str,
        upload_id: &str,
        mut body: File,
        len: u64,
        plan: UploadPlan,
    ) -> Result<Vec<CompletedPart>, BackupError> {
        let UploadPlan::Multipart { parts, .. } = plan else {
            return Ok(Vec::new());
        };

        let mut completed = Vec::new();
        for number in 1..=parts {
            let part_len = usize::try_from(plan.part_len(len, number))
                .map_err(|e| BackupError::Body(Box::new(e)))?;
            let mut chunk = vec![0u8; part_len];
            body.read_exact(&mut chunk)
                .await
                .map_err(|e| BackupError::Body(Box::new(e)))?;

            // parts never exceeds MAX_PARTS, so the part number fits in i32
            let part_number = number as i32;
            let output = self
                .client
                .upload_part()
                .bucket(bucket)
                .key(key)
                .upload_id(upload_id)
                .part_number(part_number)
                .body(ByteStream::from(chunk))
                .send()
                .await
                .map_err(|e| BackupError::remote(aws_sdk_s3::Error::from(e)))?;

            completed.push(
                CompletedPart::builder()
                    .part_number(part_number)
                    .set_e_tag(output.e_tag().map(str::to_owned))
                    .build(),
            );
        }
        Ok(completed)
    }

    async fn abort(&self, bucket: &str, key: &str, upload_id: &str) {
        let aborted = self
            .client
            .abort_multipart_upload()
            .bucket(bucket)
            .key(key)
            .upload_id(upload_id)
            .send()
            .await;
        if let Err(e) = aborted {
            eprintln!(
                "[BACKUP WARNING] Failed to abort multipart upload {} for {}/{}: {}",
                upload_id,
                bucket,
                key,
                aws_sdk_s3::Error::from(e)
            );
        }
    }
}

fn validate_region(region: &str) -> Result<(), BackupError> {
    if region.is_empty() {
        return Err(BackupError::session("region must not be empty"));
    }
    let well_formed = region
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        && !region.starts_with('-')
        && !region.ends_with('-');
    if !well_formed {
        return Err(BackupError::session(format!("malformed region '{}'", region)));
    }
    Ok(())
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_object(&self, bucket: &str, key: &str, body: File) -> Result<(), BackupError> {
        let len = body
            .metadata()
            .await
            .map_err(|e| BackupError::Body(Box::new(e)))?
            .len();

        match UploadPlan::for_len(len, self.part_size) {
            UploadPlan::Single => self.put_single(bucket, key, body).await,
            plan @ UploadPlan::Multipart { .. } => {
                self.put_multipart(bucket, key, body, len, plan).await
            }
        }
    }

    fn name(&self) -> &str {
        "s3"
    }
}
