//! Tracks what a run has done so far: feeds merged or skipped, calendars published or not

use std::fmt::{Display, Formatter};

/// A step of a run, as reported to a feedback listener
#[derive(Clone, Debug, PartialEq)]
pub enum RunEvent {
    NotStarted,
    Started{ groups: usize },
    /// The feeds of `group` are being fetched
    Fetching{ group: String, sources: usize },
    /// The merged calendar of `group` is being written and uploaded
    Publishing{ group: String, events: usize },
    /// `success` is false as soon as a feed was skipped or a calendar could not be published
    Finished{ success: bool },
}

impl Display for RunEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RunEvent::NotStarted => write!(f, "Not started"),
            RunEvent::Started{groups} => write!(f, "Building {} calendar(s)...", groups),
            RunEvent::Fetching{group, sources} => write!(f, "[{}] fetching {} feed(s)...", group, sources),
            RunEvent::Publishing{group, events} => write!(f, "[{}] publishing {} events...", group, events),
            RunEvent::Finished{success: true} => write!(f, "Every calendar was published"),
            RunEvent::Finished{success: false} => write!(f, "Run finished with errors"),
        }
    }
}

impl Default for RunEvent {
    fn default() -> Self {
        Self::NotStarted
    }
}

/// See [`feedback_channel`]
pub type FeedbackSender = tokio::sync::watch::Sender<RunEvent>;

/// Create a feeback channel, that can be used to watch the progress of a run
pub fn feedback_channel() -> (FeedbackSender, tokio::sync::watch::Receiver<RunEvent>) {
    tokio::sync::watch::channel(RunEvent::default())
}

/// Counts the outcome of every feed and every calendar of a run, and logs them
#[derive(Default)]
pub struct RunProgress {
    sources_merged: u32,
    sources_skipped: u32,
    groups_published: Vec<String>,
    groups_failed: Vec<String>,
    feedback_channel: Option<FeedbackSender>,
}

impl RunProgress {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn new_with_feedback_channel(channel: FeedbackSender) -> Self {
        Self { feedback_channel: Some(channel), ..Self::default() }
    }

    /// A feed has been fetched and its events merged
    pub fn source_merged(&mut self) {
        self.sources_merged += 1;
    }
    /// A feed could not be fetched or parsed, and is left out of its calendar
    pub fn source_skipped(&mut self, text: &str) {
        log::warn!("{}", text);
        self.sources_skipped += 1;
    }
    /// A fetch task died before reporting back. Its feed is left out, like a skipped one
    pub fn source_crashed(&mut self, text: &str) {
        log::error!("{}", text);
        self.sources_skipped += 1;
    }

    pub fn group_published(&mut self, group: &str) {
        self.groups_published.push(group.to_string());
    }
    pub fn group_failed(&mut self, group: &str, text: &str) {
        log::error!("{}", text);
        self.groups_failed.push(group.to_string());
    }

    pub fn sources_merged(&self) -> u32 { self.sources_merged }
    pub fn sources_skipped(&self) -> u32 { self.sources_skipped }
    pub fn groups_published(&self) -> &[String] { &self.groups_published }
    pub fn groups_failed(&self) -> &[String] { &self.groups_failed }

    /// Skipped feeds plus calendars that could not be published
    pub fn n_errors(&self) -> u32 {
        self.sources_skipped + self.groups_failed.len() as u32
    }
    pub fn is_success(&self) -> bool {
        self.n_errors() == 0
    }

    /// One line describing the whole run
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "{} calendar(s) published, {} feed(s) merged, {} feed(s) skipped",
            self.groups_published.len(), self.sources_merged, self.sources_skipped,
        );
        if self.groups_failed.is_empty() == false {
            summary.push_str(&format!(", {} calendar(s) not published: {}", self.groups_failed.len(), self.groups_failed.join(", ")));
        }
        summary
    }

    pub fn info(&self, text: &str) {
        log::info!("{}", text);
    }
    pub fn debug(&self, text: &str) {
        log::debug!("{}", text);
    }

    /// Send an event to the listener (if any)
    pub fn feedback(&self, event: RunEvent) {
        if let Some(sender) = &self.feedback_channel {
            // Nobody listening anymore is fine
            let _ = sender.send(event);
        }
    }
}
