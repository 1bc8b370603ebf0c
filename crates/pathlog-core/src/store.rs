//! The in-memory event store.
//!
//! [`EventStore`] is built once at startup from a JSON file holding a
//! single array of event objects. It is never mutated afterwards: index
//! `i` refers to the same record for the life of the process, and
//! duplicate records are kept as they appear in the file.
//!
//! Loading is fail-soft. [`EventStore::load`] logs the failure and returns
//! an empty store so the service keeps answering queries; use
//! [`EventStore::try_load`] when the cause matters.

use std::path::Path;

use pathlog_types::Event;
use tracing::{error, info};

use crate::error::StoreError;

/// Immutable, ordered collection of loaded events.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    /// A store with no events.
    pub const fn empty() -> Self {
        Self { events: Vec::new() }
    }

    /// Wrap an already-built sequence of events, preserving its order.
    pub const fn from_events(events: Vec<Event>) -> Self {
        Self { events }
    }

    /// Load the event log at `path`, falling back to an empty store.
    ///
    /// Failures are reported through `tracing` at `error` level and never
    /// reach the caller.
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(store) => {
                info!(path = %path.display(), events = store.len(), "Loaded log events");
                store
            }
            Err(e) => {
                error!(error = %e, "Event log unavailable, serving an empty store");
                Self::empty()
            }
        }
    }

    /// Load the event log at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file cannot be read, or
    /// [`StoreError::Json`] if it is not a JSON array.
    pub fn try_load(path: &Path) -> Result<Self, StoreError> {
        let contents = std::fs::read_to_string(path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&contents).map_err(|source| StoreError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse a JSON array of event objects.
    ///
    /// Element fields of an unexpected type are left out of the typed
    /// header but kept in the stored record.
    ///
    /// # Errors
    ///
    /// Returns an error if `json` is not valid JSON or not an array.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let events: Vec<Event> = serde_json::from_str(json)?;
        Ok(Self::from_events(events))
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the store holds no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// The event at position `index`.
    pub fn get(&self, index: usize) -> Option<&Event> {
        self.events.get(index)
    }

    /// Iterate over events in load order.
    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.events.iter()
    }
}

impl<'a> IntoIterator for &'a EventStore {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::query::{Criteria, filter};

    const TWO_EVENTS: &str = r#"[
        {"event_id": 1, "event": "path_calculation_started", "bot_id": "B1",
         "timestamp": "T1", "src": {"coordinate": {"x": 1, "y": 2}},
         "dest": {"coordinate": {"x": 5, "y": 5}}},
        {"event_id": 2, "event": "other", "bot_id": "B2", "timestamp": "T2"}
    ]"#;

    fn write_fixture(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn load_preserves_order() {
        let file = write_fixture(TWO_EVENTS);
        let store = EventStore::load(file.path());
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(0).unwrap().bot_id(), Some("B1"));
        assert_eq!(store.get(1).unwrap().kind(), Some("other"));
        assert!(store.get(2).is_none());
    }

    #[test]
    fn load_keeps_duplicates() {
        let file = write_fixture(r#"[{"event": "a"}, {"event": "a"}, {"event": "a"}]"#);
        let store = EventStore::load(file.path());
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn missing_file_yields_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = EventStore::load(&dir.path().join("parsed_log.json"));
        assert!(store.is_empty());
    }

    #[test]
    fn missing_file_error_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("parsed_log.json");
        let err = EventStore::try_load(&path).unwrap_err();
        assert!(matches!(err, StoreError::Io { .. }));
        assert!(err.to_string().contains("parsed_log.json"));
    }

    #[test]
    fn malformed_json_yields_empty_store() {
        let file = write_fixture("[{\"event\": ");
        assert!(EventStore::load(file.path()).is_empty());
        assert!(matches!(
            EventStore::try_load(file.path()),
            Err(StoreError::Json { .. })
        ));
    }

    #[test]
    fn top_level_object_is_rejected() {
        let file = write_fixture(r#"{"event": "a"}"#);
        assert!(EventStore::load(file.path()).is_empty());
    }

    #[test]
    fn wrong_typed_fields_do_not_fail_the_load() {
        let file = write_fixture(
            r#"[
                {"bot_id": "B1"},
                {"bot_id": 7},
                {"event": "chosen_node", "coordinate": {"x": null, "y": 1}},
                {"event": "chosen_node", "coordinate": {"x": 1.0, "y": 1}}
            ]"#,
        );
        let store = EventStore::load(file.path());
        assert_eq!(store.len(), 4);
        assert_eq!(store.get(1).unwrap().bot_id(), None);
        assert_eq!(store.get(1).unwrap().raw().get("bot_id"), Some(&serde_json::json!(7)));
        assert_eq!(store.get(2).unwrap().coordinates().count(), 0);
        assert_eq!(store.get(3).unwrap().coordinates().count(), 0);

        let criteria = Criteria {
            bot_id: Some("B1".to_owned()),
            ..Criteria::default()
        };
        let result = filter(&store, &criteria);
        assert_eq!(result.len(), 1);
        assert!(std::ptr::eq(*result.first().unwrap(), store.get(0).unwrap()));
    }

    #[test]
    fn empty_array_loads() {
        let store = EventStore::from_json_str("[]").unwrap();
        assert!(store.is_empty());
        assert_eq!(store.iter().count(), 0);
    }
}
