//! FILENAME: core/persistence/src/json_reader.rs

use crate::{MatrixDocument, PersistenceError, COUNT_KEY};
use engine::{
    CountNode, CountStore, RangeTracker, RecordEntry, TagDefinition, TagMatrix, TagSchema,
    TagValue,
};
use rustc_hash::FxHashMap;
use serde_json::Value;
use std::fs;
use std::path::Path;

pub fn load_json(path: &Path) -> Result<TagMatrix, PersistenceError> {
    let text = fs::read_to_string(path)?;
    let matrix = from_json_str(&text)?;
    log::info!(
        "loaded matrix ({} tags, {} records) from {}",
        matrix.schema().len(),
        matrix.total(),
        path.display()
    );
    Ok(matrix)
}

/// Replaces `matrix` with the one stored at `path`.
/// On any error `matrix` is left untouched.
pub fn load_into(matrix: &mut TagMatrix, path: &Path) -> Result<(), PersistenceError> {
    let loaded = load_json(path)?;
    *matrix = loaded;
    Ok(())
}

pub fn from_json_str(text: &str) -> Result<TagMatrix, PersistenceError> {
    let document: MatrixDocument = serde_json::from_str(text)?;
    from_document(document)
}

/// Rebuilds a matrix from its document. The schema and tag order come
/// first, since they decide how every key in `_matrix` is read.
pub fn from_document(document: MatrixDocument) -> Result<TagMatrix, PersistenceError> {
    let MatrixDocument {
        tags,
        tag_order,
        tag_values,
        entries,
        matrix,
    } = document;

    if tag_order.len() != tags.len() {
        return Err(PersistenceError::invalid(format!(
            "_tag_order lists {} tags but {} are defined",
            tag_order.len(),
            tags.len()
        )));
    }

    let definitions = tag_order
        .iter()
        .map(|name| {
            let saved = tags.get(name).ok_or_else(|| {
                PersistenceError::invalid(format!("_tag_order names undefined tag '{}'", name))
            })?;
            Ok(TagDefinition::new(
                name.clone(),
                saved.value_type.parse()?,
                saved.range.parse()?,
            ))
        })
        .collect::<Result<Vec<_>, PersistenceError>>()?;
    let schema = TagSchema::new(definitions)?;

    let mut tracker = RangeTracker::new(schema.len());
    for (name, values) in &tag_values {
        let depth = schema.position(name).ok_or_else(|| {
            PersistenceError::invalid(format!("_tag_values names undefined tag '{}'", name))
        })?;
        let value_type = schema.value_types()[depth];
        for raw in values {
            let value = raw.coerce(value_type).ok_or_else(|| {
                PersistenceError::invalid(format!("value {} is not a valid {} for tag '{}'", raw, value_type, name))
            })?;
            tracker.insert(depth, value);
        }
    }

    let root = read_node(&matrix, &schema, 0)?;
    let store = CountStore::from_root(root, schema.len())
        .ok_or_else(|| PersistenceError::invalid("_matrix depth does not match tag count"))?;

    let entries = entries
        .into_iter()
        .map(|(payload, tags)| RecordEntry { payload, tags })
        .collect();

    TagMatrix::from_parts(schema, tracker, store, entries)
        .ok_or_else(|| PersistenceError::invalid("matrix parts do not match tag count"))
}

/// Reads the subtree at `depth`, coercing keys with that depth's tag type.
fn read_node(value: &Value, schema: &TagSchema, depth: usize) -> Result<CountNode, PersistenceError> {
    let object = value.as_object().ok_or_else(|| {
        PersistenceError::invalid(format!("_matrix: expected an object at depth {}", depth))
    })?;

    let Some(def) = schema.at(depth) else {
        return read_leaf(object);
    };

    let mut children = FxHashMap::default();
    for (key, child) in object {
        let tag_value = TagValue::from_key(key, def.value_type).ok_or_else(|| {
            PersistenceError::invalid(format!(
                "_matrix: key '{}' is not a valid {} for tag '{}'",
                key, def.value_type, def.name
            ))
        })?;
        if children.contains_key(&tag_value) {
            return Err(PersistenceError::invalid(format!(
                "_matrix: key '{}' repeats a value of tag '{}'",
                key, def.name
            )));
        }
        children.insert(tag_value, read_node(child, schema, depth + 1)?);
    }
    Ok(CountNode::Branch(children))
}

fn read_leaf(object: &serde_json::Map<String, Value>) -> Result<CountNode, PersistenceError> {
    if let Some(key) = object.keys().find(|k| k.as_str() != COUNT_KEY) {
        return Err(PersistenceError::invalid(format!(
            "_matrix: unexpected key '{}' below the last tag",
            key
        )));
    }
    let count = match object.get(COUNT_KEY) {
        None => 0,
        Some(n) => n.as_u64().ok_or_else(|| {
            PersistenceError::invalid(format!("_matrix: count {} is not a non-negative integer", n))
        })?,
    };
    Ok(CountNode::Leaf(count))
}
