//! Writes merged calendars to disk, and uploads them to an object storage bucket

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use s3::creds::Credentials;
use s3::{Bucket, Region};

use crate::calendar::MergedCalendar;
use crate::config::StorageConfig;
use crate::error::{PublishError, StorageError};
use crate::ical::build_calendar;

const ICAL_CONTENT_TYPE: &str = "text/calendar";


/// A bucket artifacts are uploaded to
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Create or overwrite the object `key`
    async fn put_object(&self, key: &str, content: &[u8]) -> Result<(), StorageError>;

    /// A human-readable name for this store, used in logs
    fn describe(&self) -> String;
}


/// An S3-compatible bucket hosted on Cloudflare R2
pub struct R2Bucket {
    bucket: Box<Bucket>,
}

impl R2Bucket {
    /// Create a bucket handle with static credentials. This does not start a connection
    pub fn new(config: &StorageConfig) -> Result<Self, StorageError> {
        let credentials = Credentials::new(
            Some(config.access_key.as_str()),
            Some(config.secret_key.as_str()),
            None, None, None,
        )?;
        let region = Region::R2 { account_id: config.account_id.clone() };
        let bucket = Bucket::new(&config.bucket_name, region, credentials)?;

        log::debug!("Using bucket {} at {}", config.bucket_name, config.endpoint());
        Ok(Self { bucket })
    }
}

#[async_trait]
impl ObjectStore for R2Bucket {
    async fn put_object(&self, key: &str, content: &[u8]) -> Result<(), StorageError> {
        let response = self.bucket
            .put_object_with_content_type(key, content, ICAL_CONTENT_TYPE)
            .await?;

        match response.status_code() {
            200..=299 => Ok(()),
            status => Err(StorageError::Status(status)),
        }
    }

    fn describe(&self) -> String {
        self.bucket.name()
    }
}


/// The object key of an artifact: its file name
pub fn object_key(path: &Path) -> Result<String, PublishError> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.to_string())
        .ok_or_else(|| PublishError::InvalidPath(path.to_path_buf()))
}

/// Serialize `calendar` to `{output_dir}/{name}.ics`, creating `output_dir` if needed.
///
/// Returns the path of the written file
pub async fn write_artifact(calendar: &MergedCalendar, output_dir: &Path) -> Result<PathBuf, PublishError> {
    tokio::fs::create_dir_all(output_dir).await
        .map_err(|source| PublishError::Write { path: output_dir.to_path_buf(), source })?;

    let path = output_dir.join(format!("{}.ics", calendar.name()));
    let content = build_calendar(calendar);
    tokio::fs::write(&path, content).await
        .map_err(|source| PublishError::Write { path: path.clone(), source })?;

    Ok(path)
}

/// Upload an artifact, keyed by its file name
pub async fn upload_artifact(path: &Path, store: &dyn ObjectStore) -> Result<String, PublishError> {
    let key = object_key(path)?;
    let content = tokio::fs::read(path).await
        .map_err(|source| PublishError::Read { path: path.to_path_buf(), source })?;

    store.put_object(&key, &content).await
        .map_err(|source| PublishError::Upload { key: key.clone(), source })?;
    Ok(key)
}

/// Write `calendar` to disk, then upload it.
///
/// The local file is kept whatever the upload outcome.
pub async fn publish(calendar: &MergedCalendar, output_dir: &Path, store: &dyn ObjectStore) -> Result<PathBuf, PublishError> {
    let path = write_artifact(calendar, output_dir).await?;
    let key = upload_artifact(&path, store).await?;
    log::info!("Uploaded {} to bucket {} as {}", path.display(), store.describe(), key);
    Ok(path)
}
