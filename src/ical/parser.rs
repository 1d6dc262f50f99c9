//! A module to parse ICal feeds

use chrono::Utc;

use crate::error::FetchError;
use crate::event::Event;


/// A parsed feed: its product identifier and its events
#[derive(Clone, Debug)]
pub struct Feed {
    product_id: String,
    events: Vec<Event>,
}

impl Feed {
    pub fn new(product_id: String, events: Vec<Event>) -> Self {
        Self { product_id, events }
    }

    /// The unescaped PRODID of the feed, or an empty string
    pub fn product_id(&self) -> &str { &self.product_id }
    pub fn events(&self) -> &[Event] { &self.events }
    pub fn into_events(self) -> Vec<Event> { self.events }
}

/// Parse an iCal document into a [`Feed`].
///
/// Only the first VCALENDAR of the document is considered.
/// Events without UID or DTSTAMP are given one, so that they can be written back as valid iCal.
pub fn parse_feed(content: &str) -> Result<Feed, FetchError> {
    let content = content.trim_start_matches('\u{feff}').trim_start();
    if content.starts_with("BEGIN:VCALENDAR") == false {
        return Err(FetchError::Malformed("document does not start with BEGIN:VCALENDAR".to_string()));
    }

    let mut reader = ::ical::IcalParser::new(content.as_bytes());
    let calendar = match reader.next() {
        None => return Err(FetchError::Malformed("no calendar found".to_string())),
        Some(Err(err)) => return Err(FetchError::Malformed(err.to_string())),
        Some(Ok(calendar)) => calendar,
    };

    let product_id = calendar.properties.iter()
        .find(|prop| prop.name.eq_ignore_ascii_case("PRODID"))
        .and_then(|prop| prop.value.as_deref())
        .map(unescape_text)
        .unwrap_or_default();

    let events = calendar.events.into_iter()
        .map(|event| {
            let mut event = Event::from_ical(event);
            fill_required_properties(&mut event);
            event
        })
        .collect();

    Ok(Feed::new(product_id, events))
}

fn fill_required_properties(event: &mut Event) {
    if event.uid().is_none() {
        let uid = uuid::Uuid::new_v4().to_hyphenated().to_string();
        log::debug!("Event has no UID, using {}", uid);
        event.set_property("UID", uid);
    }
    if event.property("DTSTAMP").is_none() {
        event.set_property("DTSTAMP", Utc::now().format("%Y%m%dT%H%M%SZ").to_string());
    }
}

/// Turn an escaped iCal TEXT value into plain text (`\n`, `\,`, `\;` and `\\`)
pub fn unescape_text(raw: &str) -> String {
    let mut text = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            text.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => text.push('\n'),
            Some(other) => text.push(other),
            None => text.push('\\'),
        }
    }
    text
}
