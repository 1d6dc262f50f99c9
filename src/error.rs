//! Error types of the aggregation pipeline
//!
//! [`FetchError`]s are recoverable: the offending source is logged and left out of its group.
//! Every other error is fatal for the run.

use std::path::PathBuf;

use thiserror::Error;

/// Why a single source feed could not be retrieved
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid source identifier {0:?}")]
    InvalidSource(String),

    #[error("invalid feed URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("malformed iCal data: {0}")]
    Malformed(String),
}

/// Invalid or missing configuration. This aborts the run before anything is fetched
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable {0}")]
    MissingVar(&'static str),

    #[error("invalid value {value:?} for environment variable {name}")]
    InvalidVar { name: &'static str, value: String },

    #[error("unable to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to parse the calendar list: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid calendar {name:?}: {reason}")]
    InvalidGroup { name: String, reason: &'static str },

    #[error("calendar {0:?} is defined more than once")]
    DuplicateGroup(String),
}

/// Errors reported by an [`ObjectStore`](crate::publisher::ObjectStore)
#[derive(Debug, Error)]
pub enum StorageError {
    #[error(transparent)]
    S3(#[from] s3::error::S3Error),

    #[error(transparent)]
    Credentials(#[from] s3::creds::error::CredentialsError),

    #[error("unexpected status code {0}")]
    Status(u16),

    #[error("{0}")]
    Other(String),
}

/// Writing or uploading an artifact failed
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("unable to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unable to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0:?} has no usable file name")]
    InvalidPath(PathBuf),

    #[error("unable to upload {key}: {source}")]
    Upload {
        key: String,
        #[source]
        source: StorageError,
    },
}
