//! Calendar events, and their provenance annotation

use ical::parser::ical::component::IcalEvent;
use ical::property::Property;

/// A VEVENT taken from a feed.
///
/// Property values are kept in their raw (still escaped) iCal form, so that they can be written back untouched.
#[derive(Clone, Debug)]
pub struct Event {
    properties: Vec<Property>,
}

impl Event {
    pub fn from_properties(properties: Vec<Property>) -> Self {
        Self { properties }
    }

    /// Nested components (alarms) are dropped
    pub fn from_ical(event: IcalEvent) -> Self {
        if event.alarms.is_empty() == false {
            log::debug!("Dropping {} alarm(s) of an event", event.alarms.len());
        }
        Self::from_properties(event.properties)
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    /// The raw value of the first property called `name`
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.iter()
            .find(|prop| prop.name.eq_ignore_ascii_case(name))
            .and_then(|prop| prop.value.as_deref())
    }

    /// Set the raw value of the first property called `name`, or append it
    pub fn set_property(&mut self, name: &str, value: String) {
        match self.properties.iter_mut().find(|prop| prop.name.eq_ignore_ascii_case(name)) {
            Some(prop) => prop.value = Some(value),
            None => self.properties.push(Property {
                name: name.to_string(),
                params: None,
                value: Some(value),
            }),
        }
    }

    pub fn uid(&self) -> Option<&str> {
        self.property("UID")
    }

    pub fn url(&self) -> Option<&str> {
        self.property("URL")
    }

    /// The description, unescaped. Empty if the event has none
    pub fn description(&self) -> String {
        self.property("DESCRIPTION")
            .map(crate::ical::unescape_text)
            .unwrap_or_default()
    }

    /// Replace the description with one that records where this event comes from.
    ///
    /// See [`annotation`]
    pub fn annotate(&mut self, product_id: &str) {
        let text = annotation(product_id, self.url().unwrap_or(""), &self.description());
        self.set_property("DESCRIPTION", ics::escape_text(text).into_owned());
    }
}

/// The annotated description: the feed product id, the event URL and the original description, each on its own line
pub fn annotation(product_id: &str, url: &str, description: &str) -> String {
    format!("{}\nURL: {}\n{}", product_id, url, description)
}


#[cfg(test)]
mod tests {
    use super::*;

    fn prop(name: &str, value: &str) -> Property {
        Property { name: name.to_string(), params: None, value: Some(value.to_string()) }
    }

    #[test]
    fn test_annotate() {
        let mut event = Event::from_properties(vec![
            prop("UID", "1@club"),
            prop("URL", "https://club.tidyhq.com/public/schedule/events/1"),
            prop("DESCRIPTION", "Bring snacks\\, drinks"),
        ]);
        event.annotate("-//TidyHQ//Club//EN");

        let description = event.description();
        let lines: Vec<&str> = description.lines().collect();
        assert_eq!(lines, vec![
            "-//TidyHQ//Club//EN",
            "URL: https://club.tidyhq.com/public/schedule/events/1",
            "Bring snacks, drinks",
        ]);
        assert_eq!(
            event.property("DESCRIPTION").unwrap(),
            "-//TidyHQ//Club//EN\\nURL: https://club.tidyhq.com/public/schedule/events/1\\nBring snacks\\, drinks"
        );
    }

    #[test]
    fn test_annotate_missing_fields() {
        let mut event = Event::from_properties(vec![prop("UID", "2@club")]);
        event.annotate("prod");

        assert_eq!(event.description(), "prod\nURL: \n");
        assert_eq!(event.properties().len(), 2);
    }

    #[test]
    fn test_annotation_is_deterministic() {
        let a = annotation("p", "u", "d");
        let b = annotation("p", "u", "d");
        assert_eq!(a, b);
        assert_eq!(a, "p\nURL: u\nd");
    }

    #[test]
    fn test_property_names_are_case_insensitive() {
        let mut event = Event::from_properties(vec![prop("description", "old")]);
        event.set_property("DESCRIPTION", "new".to_string());
        assert_eq!(event.properties().len(), 1);
        assert_eq!(event.property("Description"), Some("new"));
    }
}
