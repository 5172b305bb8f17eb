//! Merging a fetched batch into the observed set.
//!
//! The merge is where "new" is decided: an object is novel exactly when its
//! reference ID has never been seen, either in the stored set or earlier in
//! the same batch.

use std::collections::HashSet;

use crate::model::{ObservedSet, TrackedObject};

/// Result of merging a batch.
#[derive(Debug, Clone, Default)]
pub struct Merge {
    /// The previous set followed by the novel objects.
    pub merged: ObservedSet,

    /// Objects never seen before, in batch order.
    pub novel: Vec<TrackedObject>,
}

/// Merges `current` into `previous`.
///
/// `previous` is kept as an exact prefix of `merged`; unseen objects are
/// appended in the order they appear in `current`.
pub fn merge(
    previous: ObservedSet,
    current: impl IntoIterator<Item = TrackedObject>,
) -> Merge {
    let mut seen: HashSet<String> = previous.iter().map(|o| o.id.clone()).collect();
    let mut merged = previous;
    let mut novel = Vec::new();

    for object in current {
        if !seen.insert(object.id.clone()) {
            continue;
        }
        merged.push(object.clone());
        novel.push(object);
    }

    Merge { merged, novel }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(id: &str) -> TrackedObject {
        serde_json::from_value(serde_json::json!({ "neo_reference_id": id })).unwrap()
    }

    fn ids<'a>(objects: impl IntoIterator<Item = &'a TrackedObject>) -> Vec<&'a str> {
        objects.into_iter().map(|o| o.id.as_str()).collect()
    }

    #[test]
    fn everything_is_novel_against_empty_set() {
        let result = merge(ObservedSet::new(), ["a", "b"].map(object));

        assert_eq!(ids(&result.novel), ["a", "b"]);
        assert_eq!(ids(&result.merged), ["a", "b"]);
    }

    #[test]
    fn second_merge_is_idempotent() {
        let batch = ["a", "b", "c"].map(object);
        let first = merge(ObservedSet::new(), batch.clone());
        let second = merge(first.merged.clone(), batch);

        assert_eq!(first.novel.len(), 3);
        assert!(second.novel.is_empty());
        assert_eq!(second.merged, first.merged);
    }

    #[test]
    fn previous_is_prefix_and_growth_matches_novel() {
        let previous = merge(ObservedSet::new(), ["x", "a", "y"].map(object)).merged;
        let result = merge(previous.clone(), ["a", "d", "x", "e"].map(object));

        assert_eq!(ids(&result.novel), ["d", "e"]);
        assert!(result.merged.iter().zip(&previous).all(|(a, b)| a == b));
        assert_eq!(result.merged.len(), previous.len() + result.novel.len());
        assert_eq!(ids(&result.merged), ["x", "a", "y", "d", "e"]);
    }

    #[test]
    fn duplicates_within_batch_reported_once() {
        let result = merge(ObservedSet::new(), ["a", "b", "a"].map(object));

        assert_eq!(ids(&result.novel), ["a", "b"]);
        assert_eq!(result.merged.len(), 2);
    }

    #[test]
    fn empty_batch_changes_nothing() {
        let previous = merge(ObservedSet::new(), ["a"].map(object)).merged;
        let result = merge(previous.clone(), Vec::new());

        assert!(result.novel.is_empty());
        assert_eq!(result.merged, previous);
    }
}
