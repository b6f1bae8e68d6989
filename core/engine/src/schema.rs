//! FILENAME: core/engine/src/schema.rs
//! PURPOSE: Tag (dimension) definitions and their validation.
//! CONTEXT: A `TagSchema` is fixed when the matrix is built. Its order is the
//! nesting order of the count store and is persisted alongside the data.

use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::error::SchemaError;

// ============================================================================
// VALUE TYPE / DOMAIN KIND
// ============================================================================

/// The type every value of a tag is coerced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ValueType {
    #[serde(rename = "INT")]
    Int,
    #[serde(rename = "STR")]
    Str,
    #[serde(rename = "BOOL")]
    Bool,
}

impl ValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::Int => "INT",
            ValueType::Str => "STR",
            ValueType::Bool => "BOOL",
        }
    }

    /// Domain kinds this type may be declared with.
    pub fn allowed_domains(&self) -> &'static [DomainKind] {
        match self {
            ValueType::Int => &[DomainKind::Range, DomainKind::Distinct],
            ValueType::Str | ValueType::Bool => &[DomainKind::Distinct],
        }
    }
}

impl FromStr for ValueType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "INT" => Ok(ValueType::Int),
            "STR" => Ok(ValueType::Str),
            "BOOL" => Ok(ValueType::Bool),
            other => Err(SchemaError::InvalidType(other.to_string())),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a tag's values are enumerated as observed, or as the full
/// integer interval between the smallest and largest observed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DomainKind {
    #[serde(rename = "RANGE")]
    Range,
    #[serde(rename = "DISTINCT")]
    Distinct,
}

impl DomainKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DomainKind::Range => "RANGE",
            DomainKind::Distinct => "DISTINCT",
        }
    }
}

impl FromStr for DomainKind {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RANGE" => Ok(DomainKind::Range),
            "DISTINCT" => Ok(DomainKind::Distinct),
            other => Err(SchemaError::InvalidDomain(other.to_string())),
        }
    }
}

impl fmt::Display for DomainKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// TAG DEFINITION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagDefinition {
    pub name: String,
    pub value_type: ValueType,
    pub domain: DomainKind,
}

impl TagDefinition {
    pub fn new(name: impl Into<String>, value_type: ValueType, domain: DomainKind) -> Self {
        TagDefinition {
            name: name.into(),
            value_type,
            domain,
        }
    }

    pub fn int_range(name: impl Into<String>) -> Self {
        Self::new(name, ValueType::Int, DomainKind::Range)
    }

    pub fn int(name: impl Into<String>) -> Self {
        Self::new(name, ValueType::Int, DomainKind::Distinct)
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, ValueType::Str, DomainKind::Distinct)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, ValueType::Bool, DomainKind::Distinct)
    }

    fn validate(&self) -> Result<(), SchemaError> {
        if self.value_type.allowed_domains().contains(&self.domain) {
            Ok(())
        } else {
            Err(SchemaError::DomainForType {
                tag: self.name.clone(),
                value_type: self.value_type.to_string(),
                domain: self.domain.to_string(),
            })
        }
    }
}

// ============================================================================
// TAG SCHEMA
// ============================================================================

/// The ordered, validated set of tags of a matrix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagSchema {
    tags: Vec<TagDefinition>,
}

impl TagSchema {
    /// Validates every definition and fixes the order in which they were given.
    pub fn new(definitions: Vec<TagDefinition>) -> Result<Self, SchemaError> {
        for (i, def) in definitions.iter().enumerate() {
            def.validate()?;
            if definitions[..i].iter().any(|d| d.name == def.name) {
                return Err(SchemaError::DuplicateTag(def.name.clone()));
            }
        }
        log::debug!(
            "tag schema: [{}]",
            definitions
                .iter()
                .map(|d| format!("{}:{}/{}", d.name, d.value_type, d.domain))
                .collect::<Vec<_>>()
                .join(", ")
        );
        Ok(TagSchema { tags: definitions })
    }

    /// Builds a schema from textual `(name, type, range)` triples such as
    /// `("age", "INT", "RANGE")`.
    pub fn from_specs<'a, I>(specs: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = (&'a str, &'a str, &'a str)>,
    {
        let definitions = specs
            .into_iter()
            .map(|(name, value_type, domain)| {
                Ok(TagDefinition::new(name, value_type.parse()?, domain.parse()?))
            })
            .collect::<Result<Vec<_>, SchemaError>>()?;
        Self::new(definitions)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&TagDefinition> {
        self.tags.iter().find(|t| t.name == name)
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.tags.iter().position(|t| t.name == name)
    }

    /// The definition at a given nesting depth.
    pub fn at(&self, depth: usize) -> Option<&TagDefinition> {
        self.tags.get(depth)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TagDefinition> {
        self.tags.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(|t| t.name.as_str())
    }

    /// Value types in nesting order.
    pub fn value_types(&self) -> Vec<ValueType> {
        self.tags.iter().map(|t| t.value_type).collect()
    }
}
