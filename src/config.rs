//! Support for runtime configuration
//!
//! Settings are read once from the environment (optionally seeded from a `.env` file) and then
//! handed explicitly to the components that need them.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Part of the ProdID string that describes the organization (example of a ProdID string: `-//ABC Corporation//My Product//EN`).
pub const ORG_NAME: &str = "s3ansh33p";

/// Part of the ProdID string that describes the product name (example of a ProdID string: `-//ABC Corporation//My Product//EN`).
pub const PRODUCT_NAME: &str = "Curtin-Clubs";

/// Where a feed is published. `{source}` is replaced by the source identifier
pub const DEFAULT_FEED_URL_TEMPLATE: &str = "https://{source}.tidyhq.com/public/schedule/events.ics";

/// How many feeds of a group may be in flight at the same time
pub const DEFAULT_MAX_CONCURRENT_FETCHES: usize = 8;

/// The product identifier of every calendar this crate generates
pub fn default_prod_id() -> String {
    format!("-//{}//{}//EN", ORG_NAME, PRODUCT_NAME)
}

/// Credentials and location of the destination bucket
#[derive(Clone)]
pub struct StorageConfig {
    pub access_key: String,
    pub secret_key: String,
    /// Used to build the endpoint URL
    pub account_id: String,
    pub bucket_name: String,
}

impl StorageConfig {
    pub fn endpoint(&self) -> String {
        format!("https://{}.r2.cloudflarestorage.com", self.account_id)
    }
}

// Never print the secrets
impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("account_id", &self.account_id)
            .field("bucket_name", &self.bucket_name)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub storage: StorageConfig,
    pub feed_url_template: String,
    /// Always at least 1
    pub max_concurrent_fetches: usize,
}

/// Seed the process environment from the `.env` file of the current directory (or one of its parents).
///
/// Call it before the logger is set up, so that a `RUST_LOG` in this file is honored.
/// Returns the path of the file that was loaded, `None` if there is none.
/// Variables already set in the environment are not overridden.
pub fn load_dotenv() -> Result<Option<PathBuf>, dotenvy::Error> {
    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(err) if err.not_found() => Ok(None),
        Err(err) => Err(err),
    }
}

/// Same as [`load_dotenv`], from a given file
pub fn load_dotenv_from(path: &Path) -> Result<Option<PathBuf>, dotenvy::Error> {
    match dotenvy::from_path(path) {
        Ok(()) => Ok(Some(path.to_path_buf())),
        Err(err) if err.not_found() => Ok(None),
        Err(err) => Err(err),
    }
}

impl Settings {
    /// Read the settings from the process environment. See [`load_dotenv`] to seed it from a file
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the settings from any variable source. `lookup` returns `None` for unset variables
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|value| value.is_empty() == false)
                .ok_or(ConfigError::MissingVar(name))
        };

        let storage = StorageConfig {
            access_key: required("ACCESS_KEY")?,
            secret_key: required("SECRET_KEY")?,
            account_id: required("ACCOUNT_ID")?,
            bucket_name: required("BUCKET_NAME")?,
        };

        let feed_url_template = lookup("FEED_URL_TEMPLATE")
            .unwrap_or_else(|| DEFAULT_FEED_URL_TEMPLATE.to_string());
        if feed_url_template.contains("{source}") == false {
            return Err(ConfigError::InvalidVar { name: "FEED_URL_TEMPLATE", value: feed_url_template });
        }

        let max_concurrent_fetches = match lookup("MAX_CONCURRENT_FETCHES") {
            None => DEFAULT_MAX_CONCURRENT_FETCHES,
            Some(value) => match value.trim().parse::<usize>() {
                Ok(n) if n > 0 => n,
                _ => return Err(ConfigError::InvalidVar { name: "MAX_CONCURRENT_FETCHES", value }),
            },
        };

        Ok(Self { storage, feed_url_template, max_concurrent_fetches })
    }
}
