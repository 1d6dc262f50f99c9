//! Fetches every feed of a group concurrently, and merges their events into a single calendar

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::calendar::MergedCalendar;
use crate::config::default_prod_id;
use crate::error::FetchError;
use crate::event::Event;
use crate::fetcher::FeedSource;
use crate::groups::Group;
use crate::progress::{RunEvent, RunProgress};


/// What a single fetch task reports back to the merger
struct FetchOutcome {
    source: String,
    result: Result<Vec<Event>, FetchError>,
}

/// Builds the merged calendar of a group.
///
/// One task is spawned per source (a source listed twice is fetched twice), but at most
/// `max_concurrent_fetches` of them talk to the network at the same time.
/// Tasks never share the calendar: each one hands back its annotated events, and the merger appends them once the task is done.
pub struct GroupMerger {
    source: Arc<dyn FeedSource>,
    max_concurrent_fetches: usize,
}

impl GroupMerger {
    pub fn new(source: Arc<dyn FeedSource>, max_concurrent_fetches: usize) -> Self {
        Self { source, max_concurrent_fetches: max_concurrent_fetches.max(1) }
    }

    /// Fetch every source of `group` and merge them.
    ///
    /// Sources that cannot be fetched are reported to `progress` and left out. This never fails: with no reachable source, the calendar is simply empty.
    pub async fn merge(&self, group: &Group, progress: &mut RunProgress) -> MergedCalendar {
        progress.feedback(RunEvent::Fetching{ group: group.name().to_string(), sources: group.sources().len() });

        let permits = Arc::new(Semaphore::new(self.max_concurrent_fetches));
        let mut tasks = JoinSet::new();
        for source_id in group.sources() {
            let feeds = Arc::clone(&self.source);
            let permits = Arc::clone(&permits);
            let source_id = source_id.clone();

            tasks.spawn(async move {
                // The semaphore is never closed
                let _permit = permits.acquire_owned().await.ok();
                let result = fetch_and_annotate(feeds.as_ref(), &source_id).await;
                FetchOutcome { source: source_id, result }
            });
        }

        let mut calendar = MergedCalendar::new(group.name(), default_prod_id());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Err(err) => progress.source_crashed(&format!("[{}] A fetch task has crashed: {}", group.name(), err)),
                Ok(FetchOutcome{ source, result: Err(err) }) => {
                    progress.source_skipped(&format!("[{}] Unable to fetch {} ({}). Skipping it", group.name(), source, err));
                },
                Ok(FetchOutcome{ source: _, result: Ok(events) }) => {
                    progress.source_merged();
                    calendar.extend(events);
                },
            }
        }

        progress.debug(&format!("[{}] Merged {} events", group.name(), calendar.len()));
        calendar
    }
}

/// Fetch a single source, and annotate each of its events with the feed product id
pub async fn fetch_and_annotate(feeds: &dyn FeedSource, source_id: &str) -> Result<Vec<Event>, FetchError> {
    let feed = feeds.fetch(source_id).await?;
    let product_id = feed.product_id().to_string();

    let mut events = feed.into_events();
    log::info!("Fetched {} ({}) - {} events", source_id, product_id, events.len());

    for event in events.iter_mut() {
        event.annotate(&product_id);
    }
    Ok(events)
}
