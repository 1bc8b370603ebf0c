//! Path calculation event records.
//!
//! An [`Event`] keeps the JSON object exactly as it was loaded and exposes a
//! typed [`EventHeader`] with the fields that filters and summaries inspect.
//! Serializing an [`Event`] writes the stored object back unchanged, so
//! `null` values and fields unknown to this crate survive a round trip.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Event tags
// ---------------------------------------------------------------------------

/// Tag of the event that opens a path calculation (carries `src`/`dest`).
pub const PATH_CALCULATION_STARTED: &str = "path_calculation_started";

/// Tag of the event recording a node chosen onto the planned path.
pub const CHOSEN_NODE: &str = "chosen_node";

/// Tag of the event recording a reservation conflict check.
pub const CONFLICT_CHECK: &str = "conflict_check";

// ---------------------------------------------------------------------------
// Coordinates
// ---------------------------------------------------------------------------

/// An integer grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Coordinate {
    /// Column.
    #[ts(type = "number")]
    pub x: i64,
    /// Row.
    #[ts(type = "number")]
    pub y: i64,
}

impl Coordinate {
    /// Create a coordinate from its components.
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Manhattan distance to `other`.
    pub const fn manhattan(&self, other: &Self) -> u64 {
        self.x
            .abs_diff(other.x)
            .saturating_add(self.y.abs_diff(other.y))
    }
}

/// The `src` or `dest` object of a path calculation.
///
/// The upstream producer writes `{}` when it could not read the position,
/// so `coordinate` is optional even on well-formed start events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Endpoint {
    /// Grid position of the endpoint.
    pub coordinate: Option<Coordinate>,
    /// Heading of the bot at the source, when recorded.
    pub bot_direction: Option<String>,
}

// ---------------------------------------------------------------------------
// EventHeader
// ---------------------------------------------------------------------------

/// Typed view of the event fields the query engine and summaries read.
///
/// Every field is optional. A missing field, an explicit `null` and a value
/// of an unexpected JSON type are all `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventHeader {
    /// Event tag (`path_calculation_started`, `chosen_node`, ...).
    pub event: Option<String>,
    /// Identifier of the bot that produced the event.
    pub bot_id: Option<String>,
    /// Opaque timestamp string.
    pub timestamp: Option<String>,
    /// Source of a path calculation.
    pub src: Option<Endpoint>,
    /// Destination of a path calculation.
    pub dest: Option<Endpoint>,
    /// Node position carried by node-level events.
    pub coordinate: Option<Coordinate>,
    /// Predecessor position carried by node-level events.
    pub from_coordinate: Option<Coordinate>,
    /// Outcome of a conflict check.
    pub conflict_found: Option<bool>,
}

impl EventHeader {
    /// Extract the header fields from a loaded JSON value.
    ///
    /// Non-object values yield an empty header.
    pub fn from_value(raw: &Value) -> Self {
        Self {
            event: string_field(raw, "event"),
            bot_id: string_field(raw, "bot_id"),
            timestamp: string_field(raw, "timestamp"),
            src: raw.get("src").and_then(endpoint),
            dest: raw.get("dest").and_then(endpoint),
            coordinate: raw.get("coordinate").and_then(coordinate),
            from_coordinate: raw.get("from_coordinate").and_then(coordinate),
            conflict_found: raw.get("conflict_found").and_then(Value::as_bool),
        }
    }
}

fn string_field(raw: &Value, key: &str) -> Option<String> {
    raw.get(key).and_then(Value::as_str).map(str::to_owned)
}

/// `{"x": int, "y": int}`; anything else is no coordinate.
fn coordinate(value: &Value) -> Option<Coordinate> {
    let x = value.get("x")?.as_i64()?;
    let y = value.get("y")?.as_i64()?;
    Some(Coordinate::new(x, y))
}

fn endpoint(value: &Value) -> Option<Endpoint> {
    value.is_object().then(|| Endpoint {
        coordinate: value.get("coordinate").and_then(coordinate),
        bot_direction: string_field(value, "bot_direction"),
    })
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// One record of the path calculation log.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    header: EventHeader,
    raw: Value,
}

impl Event {
    /// Build an event from a JSON value, extracting its typed header.
    pub fn from_value(raw: Value) -> Self {
        let header = EventHeader::from_value(&raw);
        Self { header, raw }
    }

    /// The typed header.
    pub const fn header(&self) -> &EventHeader {
        &self.header
    }

    /// The JSON object as it was loaded.
    pub const fn raw(&self) -> &Value {
        &self.raw
    }

    /// The event tag, if present.
    pub fn kind(&self) -> Option<&str> {
        self.header.event.as_deref()
    }

    /// The bot identifier, if present.
    pub fn bot_id(&self) -> Option<&str> {
        self.header.bot_id.as_deref()
    }

    /// The timestamp string, if present.
    pub fn timestamp(&self) -> Option<&str> {
        self.header.timestamp.as_deref()
    }

    /// Whether this event opens a path calculation.
    pub fn is_path_calculation_started(&self) -> bool {
        self.kind() == Some(PATH_CALCULATION_STARTED)
    }

    /// Source coordinate, if the event carries one.
    pub fn src_coordinate(&self) -> Option<Coordinate> {
        self.header.src.as_ref().and_then(|e| e.coordinate)
    }

    /// Destination coordinate, if the event carries one.
    pub fn dest_coordinate(&self) -> Option<Coordinate> {
        self.header.dest.as_ref().and_then(|e| e.coordinate)
    }

    /// Every coordinate the event references, in field order
    /// (`coordinate`, `from_coordinate`, `src`, `dest`).
    pub fn coordinates(&self) -> impl Iterator<Item = Coordinate> + '_ {
        [
            self.header.coordinate,
            self.header.from_coordinate,
            self.src_coordinate(),
            self.dest_coordinate(),
        ]
        .into_iter()
        .flatten()
    }
}

impl Serialize for Event {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Event {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from_value)
    }
}
