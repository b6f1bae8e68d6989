//! FILENAME: core/engine/src/query.rs
//! PURPOSE: Aggregate count queries over the count store.
//! CONTEXT: A `Query` names constraints by tag. It is resolved against the
//! schema into one positional `Constraint` per tag, then evaluated by a
//! recursive descent that sums every leaf consistent with all constraints.

use std::collections::BTreeMap;
use smallvec::SmallVec;
use crate::error::MatrixError;
use crate::schema::TagSchema;
use crate::store::CountNode;
use crate::value::{RawValue, TagValue};

// ============================================================================
// FILTERS
// ============================================================================

/// Per-tag filter as written by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// Sum over every value of the tag.
    Any,
    /// Only this value.
    Exact(RawValue),
    /// Sum over each value in the set.
    OneOf(Vec<RawValue>),
}

impl From<RawValue> for FilterValue {
    fn from(value: RawValue) -> Self {
        FilterValue::Exact(value)
    }
}

impl From<Vec<RawValue>> for FilterValue {
    fn from(values: Vec<RawValue>) -> Self {
        FilterValue::OneOf(values)
    }
}

/// A set of named filters. Tags not mentioned are wildcards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    filters: BTreeMap<String, FilterValue>,
}

impl Query {
    pub fn new() -> Self {
        Query::default()
    }

    /// Sets (or replaces) the filter for `tag`.
    pub fn with(mut self, tag: impl Into<String>, filter: impl Into<FilterValue>) -> Self {
        self.set(tag, filter);
        self
    }

    pub fn exact(self, tag: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.with(tag, FilterValue::Exact(value.into()))
    }

    pub fn one_of<I, V>(self, tag: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<RawValue>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.with(tag, FilterValue::OneOf(values))
    }

    pub fn set(&mut self, tag: impl Into<String>, filter: impl Into<FilterValue>) {
        self.filters.insert(tag.into(), filter.into());
    }

    pub fn get(&self, tag: &str) -> Option<&FilterValue> {
        self.filters.get(tag)
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.filters.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Resolves names against the schema into positional constraints.
    /// Fails only when a filter names an undeclared tag.
    pub fn resolve(&self, schema: &TagSchema) -> Result<Constraints, MatrixError> {
        for tag in self.filters.keys() {
            if schema.get(tag).is_none() {
                return Err(MatrixError::Lookup(tag.clone()));
            }
        }

        Ok(schema
            .iter()
            .map(|def| match self.filters.get(&def.name) {
                None | Some(FilterValue::Any) => Constraint::Any,
                Some(FilterValue::Exact(raw)) => match raw.coerce(def.value_type) {
                    Some(value) => Constraint::Exact(value),
                    None => {
                        log::warn!(
                            "filter value {} on '{}' cannot be {} and matches nothing",
                            raw,
                            def.name,
                            def.value_type
                        );
                        Constraint::OneOf(Vec::new())
                    }
                },
                Some(FilterValue::OneOf(raws)) => {
                    let mut values: Vec<TagValue> = raws
                        .iter()
                        .filter_map(|raw| raw.coerce(def.value_type))
                        .collect();
                    if values.len() < raws.len() {
                        log::warn!(
                            "{} value(s) in filter on '{}' cannot be {} and match nothing",
                            raws.len() - values.len(),
                            def.name,
                            def.value_type
                        );
                    }
                    values.sort();
                    values.dedup();
                    Constraint::OneOf(values)
                }
            })
            .collect())
    }
}

/// A filter after coercion, at a fixed position in the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Constraint {
    Any,
    Exact(TagValue),
    OneOf(Vec<TagValue>),
}

/// One constraint per tag, in schema order.
pub type Constraints = SmallVec<[Constraint; 8]>;

// ============================================================================
// EVALUATION
// ============================================================================

/// Sums every leaf under `node` whose path satisfies `constraints`.
/// Missing branches contribute 0.
pub fn count_matching(node: Option<&CountNode>, constraints: &[Constraint]) -> u64 {
    let Some(node) = node else {
        return 0;
    };

    match (node, constraints.split_first()) {
        (CountNode::Leaf(n), None) => *n,
        (CountNode::Branch(children), Some((constraint, rest))) => match constraint {
            Constraint::Any => children
                .values()
                .map(|child| count_matching(Some(child), rest))
                .sum(),
            Constraint::Exact(value) => count_matching(children.get(value), rest),
            Constraint::OneOf(values) => values
                .iter()
                .map(|value| count_matching(children.get(value), rest))
                .sum(),
        },
        // Shape and constraint length disagree; nothing can match.
        _ => 0,
    }
}
