//! FILENAME: core/persistence/src/lib.rs
//! Tag Matrix Persistence Module
//!
//! Handles saving and loading a `TagMatrix` as a single JSON document.
//! The document carries the tag schema, its order, the observed values,
//! the entry log and the nested count tree. JSON object keys are always
//! strings, so the reader restores each key by the declared type of the tag
//! at that nesting depth.

mod error;
mod json_reader;
mod json_writer;

pub use error::PersistenceError;
pub use json_reader::{from_document, from_json_str, load_into, load_json};
pub use json_writer::{save_json, save_json_with, to_document, to_json_string, SaveOptions};

use engine::{RawValue, TagAssignment};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Reserved key holding the count in the innermost objects of `_matrix`.
/// Only interpreted at leaf depth, so a STR tag may use it as a value.
pub const COUNT_KEY: &str = "__COUNT__";

// ============================================================================
// DOCUMENT
// ============================================================================

/// The on-disk layout of a matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixDocument {
    pub tags: BTreeMap<String, SavedTag>,

    #[serde(rename = "_tag_order")]
    pub tag_order: Vec<String>,

    #[serde(rename = "_tag_values")]
    pub tag_values: BTreeMap<String, Vec<RawValue>>,

    /// `[payload, tags]` pairs.
    #[serde(rename = "_datas")]
    pub entries: Vec<(Value, TagAssignment)>,

    #[serde(rename = "_matrix")]
    pub matrix: Value,
}

/// A tag definition in textual form, e.g. `{"type": "INT", "range": "RANGE"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedTag {
    #[serde(rename = "type")]
    pub value_type: String,
    pub range: String,
}
