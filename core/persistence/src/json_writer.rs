//! FILENAME: core/persistence/src/json_writer.rs

use crate::{MatrixDocument, PersistenceError, SavedTag, COUNT_KEY};
use engine::{CountNode, RawValue, TagMatrix};
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// How the document is laid out on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveOptions {
    /// Indent nested objects; otherwise write a single line.
    #[serde(default = "default_pretty")]
    pub pretty: bool,

    /// Spaces per level when `pretty` is set.
    #[serde(default = "default_indent")]
    pub indent: usize,
}

fn default_pretty() -> bool {
    true
}

fn default_indent() -> usize {
    4
}

impl Default for SaveOptions {
    fn default() -> Self {
        SaveOptions {
            pretty: default_pretty(),
            indent: default_indent(),
        }
    }
}

pub fn save_json(matrix: &TagMatrix, path: &Path) -> Result<(), PersistenceError> {
    save_json_with(matrix, path, SaveOptions::default())
}

pub fn save_json_with(matrix: &TagMatrix, path: &Path, options: SaveOptions) -> Result<(), PersistenceError> {
    let document = to_document(matrix);
    let mut writer = BufWriter::new(File::create(path)?);
    write_document(&document, &mut writer, options)?;
    writer.flush()?;

    log::info!(
        "saved matrix ({} tags, {} records) to {}",
        document.tag_order.len(),
        matrix.total(),
        path.display()
    );
    Ok(())
}

pub fn to_json_string(matrix: &TagMatrix, options: SaveOptions) -> Result<String, PersistenceError> {
    let mut buffer = Vec::new();
    write_document(&to_document(matrix), &mut buffer, options)?;
    String::from_utf8(buffer).map_err(|e| PersistenceError::invalid(e.to_string()))
}

fn write_document<W: Write>(document: &MatrixDocument, writer: W, options: SaveOptions) -> Result<(), PersistenceError> {
    if options.pretty {
        let indent = vec![b' '; options.indent];
        let formatter = PrettyFormatter::with_indent(&indent);
        let mut serializer = serde_json::Serializer::with_formatter(writer, formatter);
        document.serialize(&mut serializer)?;
    } else {
        serde_json::to_writer(writer, document)?;
    }
    Ok(())
}

/// Snapshot of the matrix in document form.
pub fn to_document(matrix: &TagMatrix) -> MatrixDocument {
    let schema = matrix.schema();

    let tags = schema
        .iter()
        .map(|def| {
            (
                def.name.clone(),
                SavedTag {
                    value_type: def.value_type.to_string(),
                    range: def.domain.to_string(),
                },
            )
        })
        .collect();

    let tag_values = schema
        .iter()
        .enumerate()
        .map(|(depth, def)| {
            let values = matrix
                .tracker()
                .sorted(depth)
                .into_iter()
                .map(RawValue::from)
                .collect();
            (def.name.clone(), values)
        })
        .collect();

    let entries = matrix
        .entries()
        .iter()
        .map(|entry| (entry.payload.clone(), entry.tags.clone()))
        .collect();

    MatrixDocument {
        tags,
        tag_order: schema.names().map(str::to_string).collect(),
        tag_values,
        entries,
        matrix: node_to_json(matrix.store().root()),
    }
}

fn node_to_json(node: &CountNode) -> Value {
    let mut object = Map::new();
    match node {
        CountNode::Leaf(count) => {
            object.insert(COUNT_KEY.to_string(), Value::from(*count));
        }
        CountNode::Branch(children) => {
            for (key, child) in children {
                object.insert(key.to_key(), node_to_json(child));
            }
        }
    }
    Value::Object(object)
}
