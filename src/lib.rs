//! This crate merges public iCal feeds into one calendar per group, and publishes the results.
//!
//! Each [`Group`](groups::Group) lists a set of sources. Their feeds are fetched concurrently by a [`FeedSource`](fetcher::FeedSource)
//! and every event is [annotated](Event::annotate) with the product id and URL it comes from. \
//! The [`GroupMerger`](merger::GroupMerger) gathers them into a single [`MergedCalendar`](calendar::MergedCalendar),
//! which is then written to disk and uploaded to an [`ObjectStore`](publisher::ObjectStore).
//!
//! An [`Aggregator`] runs this for every group, one group at a time.

pub mod config;
pub mod error;
pub mod groups;
pub mod ical;

mod event;
pub use event::Event;
pub mod calendar;
pub use calendar::MergedCalendar;

pub mod fetcher;
pub mod merger;
pub mod progress;
pub mod publisher;

pub mod aggregator;
pub use aggregator::Aggregator;
