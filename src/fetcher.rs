//! This module provides the sources feeds are fetched from

use async_trait::async_trait;
use url::Url;

use crate::error::FetchError;
use crate::ical::{parse_feed, Feed};


/// Something that can retrieve the feed of a source identifier
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetch and parse the current feed of `source`.
    /// Every call goes to the source: nothing is cached
    async fn fetch(&self, source: &str) -> Result<Feed, FetchError>;
}


/// A [`FeedSource`] that downloads feeds over HTTP(S)
pub struct HttpFeedSource {
    client: reqwest::Client,
    url_template: String,
}

impl HttpFeedSource {
    /// Create a source. `url_template` must contain `{source}`, e.g. [`DEFAULT_FEED_URL_TEMPLATE`](crate::config::DEFAULT_FEED_URL_TEMPLATE).
    /// This does not start a connection
    pub fn new<S: ToString>(url_template: S) -> Self {
        Self {
            client: reqwest::Client::new(),
            url_template: url_template.to_string(),
        }
    }

    /// The URL of the feed of `source`
    pub fn feed_url(&self, source: &str) -> Result<Url, FetchError> {
        if is_valid_source_id(source) == false {
            return Err(FetchError::InvalidSource(source.to_string()));
        }
        let url = self.url_template.replace("{source}", source);
        Url::parse(&url).map_err(|source| FetchError::InvalidUrl { url, source })
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch(&self, source: &str) -> Result<Feed, FetchError> {
        let url = self.feed_url(source)?;
        log::debug!("Fetching {}", url);

        let response = self.client
            .get(url.clone())
            .send()
            .await?;

        if response.status().is_success() == false {
            return Err(FetchError::Status { url: url.to_string(), status: response.status().as_u16() });
        }

        let text = response.text().await?;
        parse_feed(&text)
    }
}

/// Whether `source` can be used as a DNS label (dots allowed)
pub fn is_valid_source_id(source: &str) -> bool {
    let edges_ok = |c: char| c != '-' && c != '.';

    source.is_empty() == false
        && source.len() <= 63
        && source.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
        && source.starts_with(edges_ok)
        && source.ends_with(edges_ok)
}
