//! Mocked feed sources and buckets shared by the integration tests
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use calmerge::error::{FetchError, StorageError};
use calmerge::fetcher::FeedSource;
use calmerge::ical::{parse_feed, Feed};
use calmerge::publisher::ObjectStore;

/// An iCal document with `n_events` events, whose UIDs are `{prefix}-{i}`
pub fn feed_document(product_id: &str, prefix: &str, n_events: usize) -> String {
    let mut doc = format!("BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:{}\r\n", product_id);
    for i in 0..n_events {
        doc.push_str(&format!(
            "BEGIN:VEVENT\r\n\
             UID:{prefix}-{i}\r\n\
             DTSTAMP:20240301T100000Z\r\n\
             DTSTART:20240305T180000Z\r\n\
             SUMMARY:{prefix} event {i}\r\n\
             URL:https://{prefix}.example/events/{i}\r\n\
             DESCRIPTION:Event {i} of {prefix}\r\n\
             END:VEVENT\r\n",
            prefix = prefix, i = i,
        ));
    }
    doc.push_str("END:VCALENDAR\r\n");
    doc
}

/// A feed served by [`MockFeedSource`]
enum MockFeed {
    Document{ delay: Duration, body: String },
    /// Fetching it panics
    Panic,
}

/// A [`FeedSource`] that serves canned documents, after an optional delay.
/// Unknown sources fail like an unreachable server would
#[derive(Default)]
pub struct MockFeedSource {
    feeds: HashMap<String, MockFeed>,
    fetch_count: Mutex<HashMap<String, usize>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl MockFeedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_feed(mut self, source: &str, body: String, delay: Duration) -> Self {
        self.feeds.insert(source.to_string(), MockFeed::Document { delay, body });
        self
    }

    pub fn with_panic(mut self, source: &str) -> Self {
        self.feeds.insert(source.to_string(), MockFeed::Panic);
        self
    }

    /// The highest number of fetches that were running at the same time
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    pub fn fetch_count(&self, source: &str) -> usize {
        self.fetch_count.lock().unwrap().get(source).copied().unwrap_or(0)
    }
}

#[async_trait]
impl FeedSource for MockFeedSource {
    async fn fetch(&self, source: &str) -> Result<Feed, FetchError> {
        *self.fetch_count.lock().unwrap().entry(source.to_string()).or_insert(0) += 1;

        let (delay, body) = match self.feeds.get(source) {
            None => return Err(FetchError::Status { url: format!("mock://{}", source), status: 404 }),
            Some(MockFeed::Panic) => panic!("fetching {} panicked", source),
            Some(MockFeed::Document { delay, body }) => (*delay, body),
        };

        let running = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(running, Ordering::SeqCst);
        if delay.is_zero() == false {
            tokio::time::sleep(delay).await;
        } else {
            tokio::task::yield_now().await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        parse_feed(body)
    }
}


/// An [`ObjectStore`] that keeps every upload in memory
#[derive(Default)]
pub struct RecordingStore {
    uploads: Mutex<Vec<(String, Vec<u8>)>>,
    failing_keys: Vec<String>,
}

impl RecordingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uploads of these keys will fail
    pub fn failing_on(keys: &[&str]) -> Self {
        Self {
            failing_keys: keys.iter().map(|k| k.to_string()).collect(),
            ..Self::default()
        }
    }

    /// Keys of every upload attempt that succeeded, in order
    pub fn keys(&self) -> Vec<String> {
        self.uploads.lock().unwrap().iter().map(|(key, _)| key.clone()).collect()
    }

    pub fn content(&self, key: &str) -> Option<String> {
        self.uploads.lock().unwrap().iter()
            .find(|(k, _)| k == key)
            .map(|(_, content)| String::from_utf8_lossy(content).into_owned())
    }
}

#[async_trait]
impl ObjectStore for RecordingStore {
    async fn put_object(&self, key: &str, content: &[u8]) -> Result<(), StorageError> {
        if self.failing_keys.iter().any(|k| k == key) {
            return Err(StorageError::Status(403));
        }
        self.uploads.lock().unwrap().push((key.to_string(), content.to_vec()));
        Ok(())
    }

    fn describe(&self) -> String {
        "recording-store".to_string()
    }
}
