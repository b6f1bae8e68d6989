//! FILENAME: core/engine/src/range.rs
//! PURPOSE: Enumerates the domain of a tag for table axes.

use crate::schema::{DomainKind, TagDefinition};
use crate::tracker::RangeTracker;
use crate::value::TagValue;

/// Values of the tag at `depth`, in natural order.
///
/// DISTINCT tags yield what was observed. RANGE tags yield every integer
/// between the smallest and largest observed value, inclusive, so gaps show
/// up as zero rows in a table. A tag with no observations yields nothing.
pub fn resolve_range(def: &TagDefinition, depth: usize, tracker: &RangeTracker) -> Vec<TagValue> {
    match def.domain {
        DomainKind::Distinct => tracker.sorted(depth),
        DomainKind::Range => match tracker.int_bounds(depth) {
            Some((min, max)) => (min..=max).map(TagValue::Int).collect(),
            None => Vec::new(),
        },
    }
}
