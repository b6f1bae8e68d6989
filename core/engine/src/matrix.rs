//! FILENAME: core/engine/src/matrix.rs
//! PURPOSE: The `TagMatrix` facade: schema, tracker, store and entry log.
//! CONTEXT: Owns all counting state as one unit. Recording validates and
//! coerces every tag before anything is mutated, so a failed call leaves the
//! matrix exactly as it was.

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use crate::error::{MatrixError, SchemaError};
use crate::query::{count_matching, Query};
use crate::range::resolve_range;
use crate::schema::{TagDefinition, TagSchema};
use crate::store::CountStore;
use crate::tracker::RangeTracker;
use crate::value::{RawValue, TagValue};

/// Tags of one record, by name, as supplied by the caller.
pub type TagAssignment = BTreeMap<String, RawValue>;

/// One audited record: the caller's payload and the tags it was filed under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordEntry {
    pub payload: Value,
    pub tags: TagAssignment,
}

/// An N-dimensional counting matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct TagMatrix {
    schema: TagSchema,
    tracker: RangeTracker,
    store: CountStore,
    entries: Vec<RecordEntry>,
}

impl TagMatrix {
    pub fn new(schema: TagSchema) -> Self {
        let depth = schema.len();
        TagMatrix {
            schema,
            tracker: RangeTracker::new(depth),
            store: CountStore::new(depth),
            entries: Vec::new(),
        }
    }

    /// Validates `definitions` and builds an empty matrix over them.
    pub fn with_tags(definitions: Vec<TagDefinition>) -> Result<Self, SchemaError> {
        Ok(Self::new(TagSchema::new(definitions)?))
    }

    /// Reassembles a matrix from parts built elsewhere.
    /// Returns `None` if the store depth or tracker width differs from `schema`.
    pub fn from_parts(
        schema: TagSchema,
        tracker: RangeTracker,
        store: CountStore,
        entries: Vec<RecordEntry>,
    ) -> Option<Self> {
        if store.depth() != schema.len() || tracker.tag_count() != schema.len() {
            return None;
        }
        Some(TagMatrix {
            schema,
            tracker,
            store,
            entries,
        })
    }

    pub fn schema(&self) -> &TagSchema {
        &self.schema
    }

    pub fn tracker(&self) -> &RangeTracker {
        &self.tracker
    }

    pub fn store(&self) -> &CountStore {
        &self.store
    }

    pub fn entries(&self) -> &[RecordEntry] {
        &self.entries
    }

    // ========================================================================
    // RECORDING
    // ========================================================================

    /// Counts one occurrence tagged with every declared tag.
    ///
    /// A non-null `payload` is kept in the entry log with its tags; it has no
    /// effect on counting.
    pub fn record<I, K, V>(&mut self, tags: I, payload: Option<Value>) -> Result<(), MatrixError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<RawValue>,
    {
        let mut assignment = TagAssignment::new();
        for (k, v) in tags {
            let name = k.into();
            if assignment.contains_key(&name) {
                return Err(MatrixError::DuplicateTag(name));
            }
            assignment.insert(name, v.into());
        }
        let tags = assignment;
        let path = self.coerce_assignment(&tags)?;

        self.store.increment(&path);
        self.tracker.observe(&path);
        log::trace!("recorded {:?}", path);

        match payload {
            None | Some(Value::Null) => {}
            Some(payload) => self.entries.push(RecordEntry { payload, tags }),
        }
        Ok(())
    }

    /// Checks the assignment against the schema and returns the coerced
    /// values in schema order.
    fn coerce_assignment(&self, tags: &TagAssignment) -> Result<Vec<TagValue>, MatrixError> {
        if let Some(unknown) = tags.keys().find(|name| self.schema.get(name).is_none()) {
            return Err(MatrixError::UnknownTag(unknown.clone()));
        }
        if tags.len() != self.schema.len() {
            return Err(MatrixError::TagCountMismatch {
                expected: self.schema.len(),
                got: tags.len(),
            });
        }

        self.schema
            .iter()
            .map(|def| {
                let Some(raw) = tags.get(&def.name) else {
                    return Err(MatrixError::TagCountMismatch {
                        expected: self.schema.len(),
                        got: tags.len(),
                    });
                };
                raw.coerce(def.value_type).ok_or_else(|| MatrixError::Coercion {
                    tag: def.name.clone(),
                    value: raw.to_string(),
                })
            })
            .collect()
    }

    // ========================================================================
    // QUERYING
    // ========================================================================

    /// Number of records matching every filter in `query`.
    pub fn count(&self, query: &Query) -> Result<u64, MatrixError> {
        let constraints = query.resolve(&self.schema)?;
        Ok(count_matching(Some(self.store.root()), &constraints))
    }

    /// Number of records since construction or the last load.
    pub fn total(&self) -> u64 {
        self.store.total()
    }

    /// The values a table axis over `tag` iterates, in natural order.
    pub fn range(&self, tag: &str) -> Result<Vec<TagValue>, MatrixError> {
        self.try_range(tag)
            .ok_or_else(|| MatrixError::Lookup(tag.to_string()))
    }

    /// Like `range`, but None for an undeclared tag.
    pub fn try_range(&self, tag: &str) -> Option<Vec<TagValue>> {
        let depth = self.schema.position(tag)?;
        let def = self.schema.at(depth)?;
        Some(resolve_range(def, depth, &self.tracker))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn school_matrix() -> TagMatrix {
        let mut matrix = TagMatrix::with_tags(vec![
            TagDefinition::string("school"),
            TagDefinition::int_range("age"),
        ])
        .unwrap();
        for _ in 0..3 {
            matrix
                .record([("school", RawValue::from("A")), ("age", RawValue::from(7))], None)
                .unwrap();
        }
        for _ in 0..2 {
            matrix
                .record([("school", RawValue::from("B")), ("age", RawValue::from(7))], None)
                .unwrap();
        }
        matrix
    }

    #[test]
    fn test_school_scenario_counts() {
        let matrix = school_matrix();

        assert_eq!(matrix.count(&Query::new().exact("school", "A")).unwrap(), 3);
        assert_eq!(matrix.count(&Query::new().exact("age", 7)).unwrap(), 5);
        assert_eq!(matrix.count(&Query::new()).unwrap(), 5);
        assert_eq!(matrix.count(&Query::new().one_of("school", ["A", "B"])).unwrap(), 5);
        assert_eq!(matrix.count(&Query::new().exact("school", "C")).unwrap(), 0);
        assert_eq!(matrix.total(), 5);
    }

    #[test]
    fn test_missing_tag_rejected_without_mutation() {
        let mut matrix = school_matrix();
        let before = matrix.clone();

        let err = matrix.record([("school", "A")], None).unwrap_err();
        assert_eq!(err, MatrixError::TagCountMismatch { expected: 2, got: 1 });
        assert!(err.is_tag_mismatch());
        assert_eq!(matrix, before);
    }

    #[test]
    fn test_extra_tag_rejected_without_mutation() {
        let mut matrix = school_matrix();
        let before = matrix.clone();

        let err = matrix
            .record(
                [
                    ("school", RawValue::from("A")),
                    ("age", RawValue::from(7)),
                    ("town", RawValue::from("X")),
                ],
                Some(json!({"id": 1})),
            )
            .unwrap_err();
        assert_eq!(err, MatrixError::UnknownTag("town".to_string()));
        assert_eq!(matrix, before);
        assert!(matrix.entries().is_empty());
    }

    #[test]
    fn test_repeated_tag_rejected_without_mutation() {
        let mut matrix = TagMatrix::with_tags(vec![TagDefinition::int_range("age")]).unwrap();
        let before = matrix.clone();

        let err = matrix
            .record([("age", 7), ("age", 8)], Some(json!({"id": 1})))
            .unwrap_err();
        assert_eq!(err, MatrixError::DuplicateTag("age".to_string()));
        assert!(err.is_tag_mismatch());
        assert_eq!(matrix, before);
        assert_eq!(matrix.total(), 0);
        assert!(matrix.range("age").unwrap().is_empty());

        let mut matrix = school_matrix();
        let before = matrix.clone();
        let err = matrix
            .record([("school", RawValue::from("A")), ("school", RawValue::from("B"))], None)
            .unwrap_err();
        assert_eq!(err, MatrixError::DuplicateTag("school".to_string()));
        assert_eq!(matrix, before);
    }

    #[test]
    fn test_from_parts_rejects_mismatched_shape() {
        let schema = TagSchema::new(vec![TagDefinition::string("school"), TagDefinition::int_range("age")]).unwrap();
        assert!(TagMatrix::from_parts(schema.clone(), RangeTracker::new(2), CountStore::new(1), Vec::new()).is_none());
        assert!(TagMatrix::from_parts(schema.clone(), RangeTracker::new(3), CountStore::new(2), Vec::new()).is_none());

        let matrix = TagMatrix::from_parts(schema, RangeTracker::new(2), CountStore::new(2), Vec::new()).unwrap();
        assert_eq!(matrix.total(), 0);
    }

    #[test]
    fn test_coercion_failure_rejected_without_mutation() {
        let mut matrix = school_matrix();
        let before = matrix.clone();

        let err = matrix
            .record([("school", RawValue::from("A")), ("age", RawValue::from("old"))], None)
            .unwrap_err();
        assert!(matches!(err, MatrixError::Coercion { ref tag, .. } if tag == "age"));

        let err = matrix
            .record([("school", RawValue::from(3)), ("age", RawValue::from(7))], None)
            .unwrap_err();
        assert!(matches!(err, MatrixError::Coercion { ref tag, .. } if tag == "school"));

        assert_eq!(matrix, before);
    }

    #[test]
    fn test_int_tags_accept_numeric_strings() {
        let mut matrix = school_matrix();
        matrix
            .record([("school", RawValue::from("A")), ("age", RawValue::from("9"))], None)
            .unwrap();
        assert_eq!(matrix.count(&Query::new().exact("age", 9)).unwrap(), 1);
        assert_eq!(matrix.count(&Query::new().exact("age", "9")).unwrap(), 1);
    }

    #[test]
    fn test_payload_logged_only_when_present() {
        let mut matrix = school_matrix();
        matrix
            .record(
                [("school", RawValue::from("B")), ("age", RawValue::from(8))],
                Some(json!({"name": "Ann"})),
            )
            .unwrap();
        matrix
            .record([("school", RawValue::from("B")), ("age", RawValue::from(8))], Some(Value::Null))
            .unwrap();

        assert_eq!(matrix.entries().len(), 1);
        let entry = &matrix.entries()[0];
        assert_eq!(entry.payload, json!({"name": "Ann"}));
        assert_eq!(entry.tags.get("age"), Some(&RawValue::Int(8)));
        assert_eq!(matrix.total(), 7);
    }

    #[test]
    fn test_range_lookup() {
        let mut matrix = school_matrix();
        matrix
            .record([("school", RawValue::from("A")), ("age", RawValue::from(10))], None)
            .unwrap();

        assert_eq!(
            matrix.range("age").unwrap(),
            (7..=10).map(TagValue::Int).collect::<Vec<_>>()
        );
        assert_eq!(
            matrix.range("school").unwrap(),
            vec![TagValue::from("A"), TagValue::from("B")]
        );
        assert_eq!(matrix.range("town").unwrap_err(), MatrixError::Lookup("town".to_string()));
        assert!(matrix.try_range("town").is_none());
        assert_eq!(matrix.count(&Query::new().exact("age", 9)).unwrap(), 0);
    }

    #[test]
    fn test_bool_tag_tracks_coerced_values() {
        let mut matrix = TagMatrix::with_tags(vec![TagDefinition::boolean("vegetarian")]).unwrap();
        matrix.record([("vegetarian", RawValue::from(1))], None).unwrap();
        matrix.record([("vegetarian", RawValue::from(true))], None).unwrap();
        matrix.record([("vegetarian", RawValue::from(0))], None).unwrap();

        assert_eq!(
            matrix.range("vegetarian").unwrap(),
            vec![TagValue::Bool(false), TagValue::Bool(true)]
        );
        assert_eq!(matrix.count(&Query::new().exact("vegetarian", true)).unwrap(), 2);
    }

    #[test]
    fn test_zero_tag_matrix_counts_records() {
        let mut matrix = TagMatrix::with_tags(Vec::new()).unwrap();
        matrix.record(Vec::<(String, RawValue)>::new(), None).unwrap();
        matrix.record(Vec::<(String, RawValue)>::new(), None).unwrap();
        assert_eq!(matrix.count(&Query::new()).unwrap(), 2);
    }
}
