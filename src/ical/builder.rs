//! A module to build ICal files

use ics::components::{Parameter, Property};
use ics::ICalendar;

use crate::calendar::MergedCalendar;
use crate::event::Event;

/// Properties that `ics::Event::new` already writes
const BUILT_IN_PROPERTIES: [&str; 2] = ["UID", "DTSTAMP"];

/// Render a merged calendar to iCal text
pub fn build_calendar(calendar: &MergedCalendar) -> String {
    let mut ical = ICalendar::new("2.0", calendar.product_id());
    for event in calendar.events() {
        ical.add_event(build_event(event));
    }
    ical.to_string()
}

fn build_event(event: &Event) -> ics::Event<'_> {
    let mut built = ics::Event::new(
        event.uid().unwrap_or_default(),
        event.property("DTSTAMP").unwrap_or_default(),
    );

    for prop in event.properties() {
        if BUILT_IN_PROPERTIES.iter().any(|name| prop.name.eq_ignore_ascii_case(name)) {
            continue;
        }

        let mut property = Property::new(prop.name.as_str(), prop.value.as_deref().unwrap_or(""));
        if let Some(params) = &prop.params {
            for (key, values) in params {
                let values: Vec<String> = values.iter().map(|value| param_value(value)).collect();
                property.add(Parameter::new(key.as_str(), values.join(",")));
            }
        }
        built.push(property);
    }
    built
}

/// The parser drops the DQUOTEs around parameter values, they must be put back when a value needs them
fn param_value(value: &str) -> String {
    if value.contains(|c| c == ':' || c == ';' || c == ',') {
        // A quoted value cannot contain DQUOTEs itself
        format!("\"{}\"", value.replace('"', ""))
    } else {
        value.to_string()
    }
}
