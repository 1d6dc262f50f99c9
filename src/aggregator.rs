//! This module runs the whole job: every group is merged, written and uploaded in turn

use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::fetcher::FeedSource;
use crate::groups::Group;
use crate::merger::GroupMerger;
use crate::progress::{FeedbackSender, RunEvent, RunProgress};
use crate::publisher::{publish, ObjectStore};


/// Builds and publishes the calendar of every group, one group after the other.
///
/// By default, the first group that cannot be written or uploaded stops the run (later groups are not processed).
/// With [`Aggregator::keep_going`], later groups are still processed and the run fails at the end instead.
pub struct Aggregator {
    merger: GroupMerger,
    store: Arc<dyn ObjectStore>,
    output_dir: PathBuf,
    keep_going: bool,
}

impl Aggregator {
    pub fn new<P: AsRef<Path>>(source: Arc<dyn FeedSource>, store: Arc<dyn ObjectStore>, output_dir: P, max_concurrent_fetches: usize) -> Self {
        Self {
            merger: GroupMerger::new(source, max_concurrent_fetches),
            store,
            output_dir: output_dir.as_ref().to_path_buf(),
            keep_going: false,
        }
    }

    /// Whether a group that fails to publish should stop the run
    pub fn keep_going(mut self, keep_going: bool) -> Self {
        self.keep_going = keep_going;
        self
    }

    /// Process every group, and provide feeedback to the user about the progress.
    ///
    /// Feeds that cannot be fetched are only logged. Errors while writing or uploading are returned.
    pub async fn run_with_feedback(&self, groups: &[Group], feedback_sender: FeedbackSender) -> Result<(), Box<dyn Error>> {
        let mut progress = RunProgress::new_with_feedback_channel(feedback_sender);
        self.run_inner(groups, &mut progress).await
    }

    /// Process every group, without giving any feedback.
    ///
    /// See [`Self::run_with_feedback`]
    pub async fn run(&self, groups: &[Group]) -> Result<(), Box<dyn Error>> {
        let mut progress = RunProgress::new();
        self.run_inner(groups, &mut progress).await
    }

    async fn run_inner(&self, groups: &[Group], progress: &mut RunProgress) -> Result<(), Box<dyn Error>> {
        progress.info(&format!("Starting a run over {} calendar(s).", groups.len()));
        progress.feedback(RunEvent::Started{ groups: groups.len() });

        for group in groups {
            match self.run_group(group, progress).await {
                Ok(()) => progress.group_published(group.name()),
                Err(err) => {
                    progress.group_failed(group.name(), &format!("[{}] Unable to publish: {}", group.name(), err));
                    if self.keep_going == false {
                        progress.info(&progress.summary());
                        progress.feedback(RunEvent::Finished{ success: false });
                        return Err(err);
                    }
                },
            }
        }

        progress.feedback(RunEvent::Finished{ success: progress.is_success() });
        progress.info(&progress.summary());
        if progress.groups_failed().is_empty() == false {
            return Err(format!("{} calendar(s) could not be published: {}", progress.groups_failed().len(), progress.groups_failed().join(", ")).into());
        }
        Ok(())
    }

    async fn run_group(&self, group: &Group, progress: &mut RunProgress) -> Result<(), Box<dyn Error>> {
        let calendar = self.merger.merge(group, progress).await;
        progress.info(&format!("[{}] {} events from {} feed(s)", group.name(), calendar.len(), group.sources().len()));

        progress.feedback(RunEvent::Publishing{ group: group.name().to_string(), events: calendar.len() });
        publish(&calendar, &self.output_dir, self.store.as_ref()).await?;
        Ok(())
    }
}
