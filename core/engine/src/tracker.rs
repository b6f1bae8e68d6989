//! FILENAME: core/engine/src/tracker.rs
//! PURPOSE: Remembers every distinct value seen per tag.
//! CONTEXT: Source for range resolution. Values are kept in coerced form so
//! that `1` and `true` fed to a BOOL tag are one value, matching the counts.

use rustc_hash::FxHashSet;
use crate::value::TagValue;

/// Observed values, one set per tag in schema order. Only ever grows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeTracker {
    observed: Vec<FxHashSet<TagValue>>,
}

impl RangeTracker {
    pub fn new(tag_count: usize) -> Self {
        RangeTracker {
            observed: vec![FxHashSet::default(); tag_count],
        }
    }

    pub fn tag_count(&self) -> usize {
        self.observed.len()
    }

    /// Adds one value per tag. `values` is in schema order.
    pub fn observe(&mut self, values: &[TagValue]) {
        for (set, value) in self.observed.iter_mut().zip(values) {
            if !set.contains(value) {
                set.insert(value.clone());
            }
        }
    }

    /// Adds a single value for the tag at `depth`. Ignored for unknown depths.
    pub fn insert(&mut self, depth: usize, value: TagValue) {
        if let Some(set) = self.observed.get_mut(depth) {
            set.insert(value);
        }
    }

    pub fn observed(&self, depth: usize) -> Option<&FxHashSet<TagValue>> {
        self.observed.get(depth)
    }

    /// Observed values at `depth` in natural order.
    pub fn sorted(&self, depth: usize) -> Vec<TagValue> {
        let mut values: Vec<TagValue> = self
            .observed
            .get(depth)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default();
        values.sort();
        values
    }

    /// Smallest and largest integer observed at `depth`.
    pub fn int_bounds(&self, depth: usize) -> Option<(i64, i64)> {
        let set = self.observed.get(depth)?;
        let mut ints = set.iter().filter_map(TagValue::as_int);
        let first = ints.next()?;
        Some(ints.fold((first, first), |(lo, hi), n| (lo.min(n), hi.max(n))))
    }
}
