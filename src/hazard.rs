//! Selecting hazardous objects and ranking them by approach time.
//!
//! Selection keeps an object only when it is flagged hazardous and its
//! first close approach is to the watched body. Survivors are grouped by
//! the instant of that approach, then flattened in ascending time order.

use std::collections::HashMap;

use jiff::{civil::Date, tz::TimeZone};

use crate::model::TrackedObject;

/// Calendar format of `close_approach_date`.
const APPROACH_DATE_FORMAT: &str = "%Y-%m-%d";

/// A close-approach date that could not be turned into a timestamp.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("malformed close-approach date {date:?} for object {id}: {source}")]
    Malformed {
        id: String,
        date: String,
        source: jiff::Error,
    },

    #[error("close-approach date {date:?} for object {id} does not fit a nanosecond timestamp")]
    OutOfRange { id: String, date: String },
}

/// Objects grouped by the nanosecond instant of their first approach.
#[derive(Debug, Default)]
pub struct TimestampGroup {
    groups: HashMap<i64, Vec<TrackedObject>>,
    // Distinct keys in first-seen order.
    keys: Vec<i64>,
}

impl TimestampGroup {
    fn insert(&mut self, timestamp: i64, object: TrackedObject) {
        self.groups
            .entry(timestamp)
            .or_insert_with(|| {
                self.keys.push(timestamp);
                Vec::new()
            })
            .push(object);
    }

    /// Number of distinct instants.
    pub fn len(&self) -> usize {
        self.keys.len()
    }
}

/// Keeps hazardous objects whose first approach is to `target_body`.
///
/// Non-qualifying objects are dropped silently. A malformed date on a
/// qualifying object fails the whole selection.
pub fn select_hazardous<'a>(
    batch: impl IntoIterator<Item = &'a TrackedObject>,
    target_body: &str,
) -> Result<TimestampGroup, ParseError> {
    let mut group = TimestampGroup::default();

    for object in batch {
        if !object.hazardous {
            continue;
        }
        let Some(approach) = object.first_approach() else {
            continue;
        };
        if approach.orbiting_body != target_body {
            continue;
        }
        let timestamp = approach_timestamp(&object.id, &approach.close_approach_date)?;
        group.insert(timestamp, object.clone());
    }

    Ok(group)
}

/// All distinct timestamps, strictly ascending.
pub fn ordered_timestamps(group: &TimestampGroup) -> Vec<i64> {
    let mut keys = group.keys.clone();
    keys.sort_unstable();
    keys
}

/// Flattens the groups into one sequence, earliest approach first.
pub fn flatten(mut group: TimestampGroup) -> Vec<TrackedObject> {
    let mut objects = Vec::new();
    for timestamp in ordered_timestamps(&group) {
        if let Some(members) = group.groups.remove(&timestamp) {
            objects.extend(members);
        }
    }
    objects
}

/// Parses an approach date to Unix nanoseconds at UTC midnight.
pub fn approach_timestamp(id: &str, date: &str) -> Result<i64, ParseError> {
    let parsed =
        Date::strptime(APPROACH_DATE_FORMAT, date).map_err(|source| ParseError::Malformed {
            id: id.to_string(),
            date: date.to_string(),
            source,
        })?;
    let zoned = parsed
        .to_zoned(TimeZone::UTC)
        .map_err(|source| ParseError::Malformed {
            id: id.to_string(),
            date: date.to_string(),
            source,
        })?;
    i64::try_from(zoned.timestamp().as_nanosecond()).map_err(|_| ParseError::OutOfRange {
        id: id.to_string(),
        date: date.to_string(),
    })
}
