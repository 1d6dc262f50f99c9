//! The list of calendars to build, and the feeds each of them merges

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// A named set of feeds, merged into `{name}.ics`
#[derive(Clone, Debug, PartialEq)]
pub struct Group {
    name: String,
    sources: Vec<String>,
}

impl Group {
    /// Create a group. Fails when `name` cannot be used as a file name
    pub fn new<S: ToString>(name: S, sources: Vec<String>) -> Result<Self, ConfigError> {
        let name = name.to_string();
        check_name(&name)?;
        Ok(Self { name, sources })
    }

    pub fn name(&self) -> &str { &self.name }
    /// Source identifiers, in configuration order. Duplicates are fetched once per occurrence
    pub fn sources(&self) -> &[String] { &self.sources }

    /// The name of the artifact this group produces
    pub fn file_name(&self) -> String {
        format!("{}.ics", self.name)
    }
}

fn check_name(name: &str) -> Result<(), ConfigError> {
    let reason = if name.trim().is_empty() {
        Some("name is empty")
    } else if name.starts_with('.') {
        Some("name starts with a dot")
    } else if name.contains('/') || name.contains('\\') {
        Some("name contains a path separator")
    } else if sanitize_filename::sanitize(name) != name {
        Some("name is not a valid file name")
    } else {
        None
    };

    match reason {
        None => Ok(()),
        Some(reason) => Err(ConfigError::InvalidGroup { name: name.to_string(), reason }),
    }
}


/// On-disk layout of the calendar list
#[derive(Debug, Deserialize)]
struct CalendarList {
    calendars: Vec<CalendarEntry>,
}

#[derive(Debug, Deserialize)]
struct CalendarEntry {
    name: String,
    /// Only the first identifier of each inner list is used
    #[serde(default)]
    domains: Vec<Vec<String>>,
}

/// Read and validate the calendar list from a JSON file
pub fn load_groups(path: &Path) -> Result<Vec<Group>, ConfigError> {
    let content = std::fs::read_to_string(path)
        .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
    parse_groups(&content)
}

/// Parse and validate a calendar list, e.g. `{"calendars":[{"name":"clubs","domains":[["clubA"],["clubB"]]}]}`
pub fn parse_groups(content: &str) -> Result<Vec<Group>, ConfigError> {
    let list: CalendarList = serde_json::from_str(content)?;

    let mut seen_names = HashSet::new();
    let mut groups = Vec::with_capacity(list.calendars.len());
    for entry in list.calendars {
        if seen_names.insert(entry.name.clone()) == false {
            return Err(ConfigError::DuplicateGroup(entry.name));
        }

        let mut sources = Vec::with_capacity(entry.domains.len());
        for domains in entry.domains {
            match domains.into_iter().next() {
                Some(source) => sources.push(source),
                None => log::warn!("Calendar {} has an empty domain list. Ignoring it", entry.name),
            }
        }

        groups.push(Group::new(entry.name, sources)?);
    }
    Ok(groups)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_groups() {
        let groups = parse_groups(r#"{"calendars":[
            {"name":"clubs","domains":[["clubA"],["clubB", "ignored"],[],["clubA"]]},
            {"name":"sports","domains":[]}
        ]}"#).unwrap();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].name(), "clubs");
        assert_eq!(groups[0].sources(), &["clubA", "clubB", "clubA"]);
        assert_eq!(groups[0].file_name(), "clubs.ics");
        assert!(groups[1].sources().is_empty());
    }

    #[test]
    fn test_invalid_names() {
        for name in ["", "  ", "../etc", "a/b", ".hidden", "what?"] {
            let json = format!(r#"{{"calendars":[{{"name":{:?},"domains":[]}}]}}"#, name);
            match parse_groups(&json) {
                Err(ConfigError::InvalidGroup { .. }) => {},
                other => panic!("{:?} should be rejected, got {:?}", name, other),
            }
        }
    }

    #[test]
    fn test_valid_names() {
        for name in ["clubs", "clubs-2024", "Curtin Clubs", "sports_and_games"] {
            let group = Group::new(name, vec!["clubA".to_string()]).unwrap();
            assert_eq!(group.file_name(), format!("{}.ics", name));
        }
    }

    #[test]
    fn test_duplicate_names() {
        let err = parse_groups(r#"{"calendars":[{"name":"a"},{"name":"a"}]}"#).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateGroup(name) if name == "a"));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(parse_groups("{\"calendars\": 3}"), Err(ConfigError::Parse(_))));
    }
}
