//! Query engine: filtered listing and positional lookup.
//!
//! Filters are independent predicates combined with AND. An absent filter
//! passes every event through. Malformed filter values never fail the
//! query; they simply match nothing.
//!
//! | filter | keeps events where |
//! |--------|--------------------|
//! | `bot_id` | `bot_id` equals the value |
//! | `timestamp` | `timestamp` equals the value |
//! | `start` (`"x,y"`) | the event is `path_calculation_started` and `src.coordinate` equals `(x, y)` |
//! | `dest` (`"x,y"`) | the event is `path_calculation_started` and `dest.coordinate` equals `(x, y)` |

use pathlog_types::{Coordinate, Event};
use serde::Deserialize;

use crate::store::EventStore;

// ---------------------------------------------------------------------------
// StepQuery
// ---------------------------------------------------------------------------

/// Filter parameters as received from the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StepQuery {
    /// Exact bot identifier.
    pub bot_id: Option<String>,
    /// Exact timestamp string.
    pub timestamp: Option<String>,
    /// Source coordinate as `"x,y"`.
    pub start: Option<String>,
    /// Destination coordinate as `"x,y"`.
    pub dest: Option<String>,
}

// ---------------------------------------------------------------------------
// CoordinateFilter
// ---------------------------------------------------------------------------

/// A parsed `"x,y"` filter value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateFilter {
    /// Matches exactly this coordinate.
    Exact(Coordinate),
    /// The value did not parse; matches no coordinate.
    Unmatchable,
}

impl CoordinateFilter {
    /// Parse `"x,y"` into a filter.
    ///
    /// Exactly two comma-separated tokens are required, each a decimal
    /// integer with optional surrounding whitespace. Anything else yields
    /// [`CoordinateFilter::Unmatchable`].
    pub fn parse(value: &str) -> Self {
        let mut tokens = value.split(',');
        let (Some(x), Some(y), None) = (tokens.next(), tokens.next(), tokens.next()) else {
            return Self::Unmatchable;
        };
        match (x.trim().parse::<i64>(), y.trim().parse::<i64>()) {
            (Ok(x), Ok(y)) => Self::Exact(Coordinate::new(x, y)),
            _ => Self::Unmatchable,
        }
    }

    /// Whether `coordinate` satisfies the filter. An absent coordinate
    /// never does.
    pub fn matches(&self, coordinate: Option<Coordinate>) -> bool {
        match self {
            Self::Exact(expected) => coordinate.as_ref() == Some(expected),
            Self::Unmatchable => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Criteria
// ---------------------------------------------------------------------------

/// Compiled filter set applied to each event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria {
    /// Exact bot identifier.
    pub bot_id: Option<String>,
    /// Exact timestamp string.
    pub timestamp: Option<String>,
    /// Source coordinate of a path calculation.
    pub start: Option<CoordinateFilter>,
    /// Destination coordinate of a path calculation.
    pub dest: Option<CoordinateFilter>,
}

impl Criteria {
    /// Compile query-string parameters. Empty values count as absent.
    pub fn from_query(query: &StepQuery) -> Self {
        Self {
            bot_id: non_empty(query.bot_id.as_deref()).map(str::to_owned),
            timestamp: non_empty(query.timestamp.as_deref()).map(str::to_owned),
            start: non_empty(query.start.as_deref()).map(CoordinateFilter::parse),
            dest: non_empty(query.dest.as_deref()).map(CoordinateFilter::parse),
        }
    }

    /// Whether `event` satisfies every filter that is set.
    pub fn matches(&self, event: &Event) -> bool {
        if let Some(bot_id) = &self.bot_id
            && event.bot_id() != Some(bot_id.as_str())
        {
            return false;
        }
        if let Some(timestamp) = &self.timestamp
            && event.timestamp() != Some(timestamp.as_str())
        {
            return false;
        }
        if let Some(start) = &self.start
            && !(event.is_path_calculation_started() && start.matches(event.src_coordinate()))
        {
            return false;
        }
        if let Some(dest) = &self.dest
            && !(event.is_path_calculation_started() && dest.matches(event.dest_coordinate()))
        {
            return false;
        }
        true
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Events of `store` matching `criteria`, in store order.
pub fn filter<'a>(store: &'a EventStore, criteria: &Criteria) -> Vec<&'a Event> {
    store.iter().filter(|e| criteria.matches(e)).collect()
}

/// The event at the position named by `id`.
///
/// `id` must be a non-negative decimal integer in range; anything else is
/// `None`.
pub fn get_by_index<'a>(store: &'a EventStore, id: &str) -> Option<&'a Event> {
    id.parse::<usize>().ok().and_then(|index| store.get(index))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::panic)]
mod tests {
    use serde_json::json;

    use super::*;

    fn scenario_store() -> EventStore {
        let events = vec![
            json!({
                "event": "path_calculation_started",
                "bot_id": "B1",
                "timestamp": "T1",
                "src": {"coordinate": {"x": 1, "y": 2}},
                "dest": {"coordinate": {"x": 5, "y": 5}}
            }),
            json!({"event": "other", "bot_id": "B2", "timestamp": "T2"}),
        ];
        EventStore::from_events(
            events
                .into_iter()
                .map(Event::from_value)
                .collect(),
        )
    }

    fn mixed_store() -> EventStore {
        let events = vec![
            json!({"event": "path_calculation_started", "bot_id": "b1", "timestamp": "t1",
                   "src": {"coordinate": {"x": 0, "y": 0}}, "dest": {"coordinate": {"x": 3, "y": 4}}}),
            json!({"event": "chosen_node", "bot_id": "b1", "timestamp": "t1",
                   "coordinate": {"x": 0, "y": 1}}),
            json!({"event": "chosen_node", "bot_id": "b2", "timestamp": "t1"}),
            json!({"event": "path_calculation_started", "bot_id": "b1", "timestamp": "t2",
                   "src": {}, "dest": {}}),
            json!({"event": "chosen_node", "bot_id": "b1", "timestamp": "t2",
                   "src": {"coordinate": {"x": 0, "y": 0}}}),
            json!({"event": "path_calculation_started", "bot_id": "b2", "timestamp": "t3",
                   "src": {"coordinate": {"x": 0, "y": 0}}, "dest": {"coordinate": {"x": 3, "y": 4}}}),
        ];
        EventStore::from_events(
            events
                .into_iter()
                .map(Event::from_value)
                .collect(),
        )
    }

    fn criteria(pairs: &[(&str, &str)]) -> Criteria {
        let mut query = StepQuery::default();
        for (key, value) in pairs {
            let value = Some((*value).to_owned());
            match *key {
                "bot_id" => query.bot_id = value,
                "timestamp" => query.timestamp = value,
                "start" => query.start = value,
                "dest" => query.dest = value,
                other => panic!("unknown filter {other}"),
            }
        }
        Criteria::from_query(&query)
    }

    fn positions(store: &EventStore, result: &[&Event]) -> Vec<usize> {
        result
            .iter()
            .map(|r| {
                store
                    .iter()
                    .position(|e| std::ptr::eq(e, *r))
                    .unwrap()
            })
            .collect()
    }

    #[test]
    fn no_filters_returns_whole_store() {
        let store = mixed_store();
        let result = filter(&store, &Criteria::default());
        assert_eq!(positions(&store, &result), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn empty_values_count_as_absent() {
        let store = mixed_store();
        let c = criteria(&[("bot_id", ""), ("start", ""), ("dest", ""), ("timestamp", "")]);
        assert_eq!(c, Criteria::default());
        assert_eq!(filter(&store, &c).len(), store.len());
    }

    #[test]
    fn scenario_bot_id() {
        let store = scenario_store();
        let result = filter(&store, &criteria(&[("bot_id", "B1")]));
        assert_eq!(positions(&store, &result), vec![0]);
    }

    #[test]
    fn scenario_start() {
        let store = scenario_store();
        let result = filter(&store, &criteria(&[("start", "1,2")]));
        assert_eq!(positions(&store, &result), vec![0]);
        assert!(filter(&store, &criteria(&[("start", "9,9")])).is_empty());
    }

    #[test]
    fn scenario_lookup() {
        let store = scenario_store();
        assert_eq!(get_by_index(&store, "1").unwrap().kind(), Some("other"));
        assert!(get_by_index(&store, "5").is_none());
    }

    #[test]
    fn filters_preserve_order() {
        let store = mixed_store();
        let result = filter(&store, &criteria(&[("bot_id", "b1")]));
        assert_eq!(positions(&store, &result), vec![0, 1, 3, 4]);
    }

    #[test]
    fn filters_combine_with_and() {
        let store = mixed_store();
        let by_bot = filter(&store, &criteria(&[("bot_id", "b1")]));
        let by_both = filter(&store, &criteria(&[("bot_id", "b1"), ("timestamp", "t1")]));
        assert!(by_both.len() <= by_bot.len());
        assert_eq!(positions(&store, &by_both), vec![0, 1]);
    }

    #[test]
    fn start_requires_path_calculation_started() {
        let store = mixed_store();
        // Event 4 carries a matching src but is not a start event.
        let result = filter(&store, &criteria(&[("start", "0,0")]));
        assert_eq!(positions(&store, &result), vec![0, 5]);
    }

    #[test]
    fn start_and_dest_combine() {
        let store = mixed_store();
        let result = filter(
            &store,
            &criteria(&[("start", "0,0"), ("dest", "3,4"), ("bot_id", "b2")]),
        );
        assert_eq!(positions(&store, &result), vec![5]);
    }

    #[test]
    fn dest_skips_events_without_coordinates() {
        let store = mixed_store();
        let result = filter(&store, &criteria(&[("dest", "3,4")]));
        assert_eq!(positions(&store, &result), vec![0, 5]);
    }

    #[test]
    fn malformed_coordinates_match_nothing() {
        let store = mixed_store();
        for value in ["abc,def", "0", "0,0,0", "0;0", ",", "0,", "1.5,0"] {
            assert!(
                filter(&store, &criteria(&[("start", value)])).is_empty(),
                "start={value}"
            );
            assert!(
                filter(&store, &criteria(&[("dest", value)])).is_empty(),
                "dest={value}"
            );
        }
    }

    #[test]
    fn coordinate_parse_trims_whitespace() {
        assert_eq!(
            CoordinateFilter::parse(" 3 , -4 "),
            CoordinateFilter::Exact(Coordinate::new(3, -4))
        );
        assert_eq!(CoordinateFilter::parse("x,1"), CoordinateFilter::Unmatchable);
        assert!(!CoordinateFilter::Unmatchable.matches(Some(Coordinate::new(0, 0))));
        assert!(!CoordinateFilter::Exact(Coordinate::new(0, 0)).matches(None));
    }

    #[test]
    fn result_is_subsequence_of_store() {
        let store = mixed_store();
        let cases: [&[(&str, &str)]; 5] = [
            &[("bot_id", "b1")],
            &[("timestamp", "t1")],
            &[("start", "0,0")],
            &[("dest", "3,4"), ("timestamp", "t3")],
            &[("bot_id", "nobody")],
        ];
        for pairs in cases {
            let idx = positions(&store, &filter(&store, &criteria(pairs)));
            assert!(idx.windows(2).all(|w| w[0] < w[1]), "{pairs:?}: {idx:?}");
        }
    }

    #[test]
    fn lookup_in_range_returns_exact_record() {
        let store = mixed_store();
        for (i, event) in store.iter().enumerate() {
            let found = get_by_index(&store, &i.to_string()).unwrap();
            assert!(std::ptr::eq(found, event));
        }
    }

    #[test]
    fn lookup_rejects_non_indices() {
        let store = mixed_store();
        for id in ["6", "-1", "abc", "1.0", "2x", "", " 1", "99999999999999999999999"] {
            assert!(get_by_index(&store, id).is_none(), "id={id:?}");
        }
    }

    #[test]
    fn empty_store_matches_nothing() {
        let store = EventStore::empty();
        assert!(filter(&store, &Criteria::default()).is_empty());
        assert!(get_by_index(&store, "0").is_none());
    }
}
