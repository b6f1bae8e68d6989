//! FILENAME: core/engine/src/lib.rs
//! PURPOSE: Main library entry point for the tag counting engine.
//! CONTEXT: Re-exports public types and modules for use by other crates.

pub mod error;
pub mod matrix;
pub mod query;
pub mod range;
pub mod schema;
pub mod store;
pub mod tracker;
pub mod value;

// Re-export commonly used types at the crate root
pub use error::{MatrixError, SchemaError};
pub use matrix::{RecordEntry, TagAssignment, TagMatrix};
pub use query::{count_matching, Constraint, Constraints, FilterValue, Query};
pub use range::resolve_range;
pub use schema::{DomainKind, TagDefinition, TagSchema, ValueType};
pub use store::{CountNode, CountStore};
pub use tracker::RangeTracker;
pub use value::{RawValue, TagValue};
