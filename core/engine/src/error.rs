//! FILENAME: core/engine/src/error.rs

use thiserror::Error;

/// Raised while building a `TagSchema`. Never raised once data is accepted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Invalid data type '{0}'")]
    InvalidType(String),

    #[error("Invalid tag range '{0}'")]
    InvalidDomain(String),

    #[error("Invalid tag range '{domain}' for type '{value_type}' on tag '{tag}'")]
    DomainForType {
        tag: String,
        value_type: String,
        domain: String,
    },

    #[error("Tag '{0}' is defined more than once")]
    DuplicateTag(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatrixError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("Tag '{0}' is not in defined tags")]
    UnknownTag(String),

    #[error("Tag '{0}' is assigned more than once")]
    DuplicateTag(String),

    #[error("All data must be tagged with all defined tags (expected {expected}, got {got})")]
    TagCountMismatch { expected: usize, got: usize },

    #[error("Invalid value for tag '{tag}': {value}")]
    Coercion { tag: String, value: String },

    #[error("Tag '{0}' not found")]
    Lookup(String),
}

impl MatrixError {
    /// True for the ways a tag assignment can disagree with the schema.
    pub fn is_tag_mismatch(&self) -> bool {
        matches!(
            self,
            MatrixError::UnknownTag(_)
                | MatrixError::DuplicateTag(_)
                | MatrixError::TagCountMismatch { .. }
        )
    }
}
