//! Conversion between iCal text and the events this crate merges
//!
//! Parsing relies on `ical` and generation on `ics`: neither crate does both.

mod parser;
pub use parser::{parse_feed, unescape_text, Feed};
mod builder;
pub use builder::build_calendar;
