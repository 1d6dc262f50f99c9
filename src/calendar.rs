//! The calendar a group of feeds is merged into

use crate::event::Event;

/// One output calendar per group.
///
/// Events are kept in the order they were added, which depends on which feed answered first.
#[derive(Clone, Debug)]
pub struct MergedCalendar {
    name: String,
    product_id: String,
    events: Vec<Event>,
}

impl MergedCalendar {
    /// Create an empty calendar
    pub fn new<S: ToString>(name: S, product_id: String) -> Self {
        Self {
            name: name.to_string(),
            product_id,
            events: Vec::new(),
        }
    }

    pub fn name(&self) -> &str { &self.name }
    pub fn product_id(&self) -> &str { &self.product_id }
    pub fn events(&self) -> &[Event] { &self.events }

    pub fn len(&self) -> usize { self.events.len() }
    pub fn is_empty(&self) -> bool { self.events.is_empty() }

    /// Append the (already annotated) events of one feed
    pub fn extend(&mut self, events: Vec<Event>) {
        self.events.extend(events);
    }
}
