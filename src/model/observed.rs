//! The observed set: every object ever reported as new.

use serde::{Deserialize, Serialize};

use super::TrackedObject;

/// Accumulated objects in the order they were first reported.
///
/// Serialized as a plain JSON array. Only grows; nothing is ever removed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObservedSet {
    objects: Vec<TrackedObject>,
}

impl ObservedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TrackedObject> {
        self.objects.iter()
    }

    /// Appends an object. Callers are responsible for key uniqueness.
    pub(crate) fn push(&mut self, object: TrackedObject) {
        self.objects.push(object);
    }
}

impl<'a> IntoIterator for &'a ObservedSet {
    type Item = &'a TrackedObject;
    type IntoIter = std::slice::Iter<'a, TrackedObject>;

    fn into_iter(self) -> Self::IntoIter {
        self.objects.iter()
    }
}
