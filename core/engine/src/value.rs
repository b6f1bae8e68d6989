//! FILENAME: core/engine/src/value.rs
//! PURPOSE: Input values and their coerced, hashable counterparts.
//! CONTEXT: Callers hand the matrix loosely typed `RawValue`s. Each one is
//! coerced against the declared `ValueType` of its tag into a `TagValue`,
//! which is what the count store and range tracker key on.

use std::fmt;
use serde::{Deserialize, Serialize};
use crate::schema::ValueType;

// ============================================================================
// RAW (INPUT) VALUES
// ============================================================================

/// A value as supplied by the caller, before coercion.
/// Serialized as the bare JSON scalar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawValue {
    /// Coerces this value to the given type.
    /// Returns None when the value has no representation in that type.
    pub fn coerce(&self, value_type: ValueType) -> Option<TagValue> {
        match value_type {
            ValueType::Int => self.to_int().map(TagValue::Int),
            ValueType::Str => match self {
                RawValue::Text(s) => Some(TagValue::Str(s.clone())),
                _ => None,
            },
            ValueType::Bool => Some(TagValue::Bool(self.truthy())),
        }
    }

    fn to_int(&self) -> Option<i64> {
        match self {
            RawValue::Null => None,
            RawValue::Bool(b) => Some(i64::from(*b)),
            RawValue::Int(n) => Some(*n),
            RawValue::Float(f) => {
                let t = f.trunc();
                // i64::MAX as f64 rounds up to 2^63, hence the strict bound
                if t.is_finite() && t >= i64::MIN as f64 && t < i64::MAX as f64 {
                    Some(t as i64)
                } else {
                    None
                }
            }
            RawValue::Text(s) => s.trim().parse::<i64>().ok(),
        }
    }

    fn truthy(&self) -> bool {
        match self {
            RawValue::Null => false,
            RawValue::Bool(b) => *b,
            RawValue::Int(n) => *n != 0,
            RawValue::Float(f) => *f != 0.0,
            RawValue::Text(s) => !s.is_empty(),
        }
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::Null => write!(f, "null"),
            RawValue::Bool(b) => write!(f, "{}", b),
            RawValue::Int(n) => write!(f, "{}", n),
            RawValue::Float(x) => write!(f, "{}", x),
            RawValue::Text(s) => write!(f, "{:?}", s),
        }
    }
}

impl From<bool> for RawValue {
    fn from(value: bool) -> Self {
        RawValue::Bool(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        RawValue::Int(value)
    }
}

impl From<i32> for RawValue {
    fn from(value: i32) -> Self {
        RawValue::Int(i64::from(value))
    }
}

impl From<u32> for RawValue {
    fn from(value: u32) -> Self {
        RawValue::Int(i64::from(value))
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Float(value)
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        RawValue::Text(value)
    }
}

impl From<&TagValue> for RawValue {
    fn from(value: &TagValue) -> Self {
        match value {
            TagValue::Int(n) => RawValue::Int(*n),
            TagValue::Str(s) => RawValue::Text(s.clone()),
            TagValue::Bool(b) => RawValue::Bool(*b),
        }
    }
}

impl From<TagValue> for RawValue {
    fn from(value: TagValue) -> Self {
        RawValue::from(&value)
    }
}

// ============================================================================
// TAG (COERCED) VALUES
// ============================================================================

/// A value after coercion. All values stored under one tag share a variant,
/// so the derived ordering is the natural ordering within a dimension.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum TagValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl TagValue {
    pub fn value_type(&self) -> ValueType {
        match self {
            TagValue::Int(_) => ValueType::Int,
            TagValue::Str(_) => ValueType::Str,
            TagValue::Bool(_) => ValueType::Bool,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            TagValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// The string form used for JSON object keys.
    pub fn to_key(&self) -> String {
        match self {
            TagValue::Int(n) => n.to_string(),
            TagValue::Str(s) => s.clone(),
            TagValue::Bool(b) => b.to_string(),
        }
    }

    /// Parses a JSON object key back into a value of the given type.
    pub fn from_key(key: &str, value_type: ValueType) -> Option<TagValue> {
        match value_type {
            ValueType::Int => key.parse::<i64>().ok().map(TagValue::Int),
            ValueType::Str => Some(TagValue::Str(key.to_string())),
            ValueType::Bool => match key {
                "true" => Some(TagValue::Bool(true)),
                "false" => Some(TagValue::Bool(false)),
                _ => None,
            },
        }
    }
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::Int(n) => write!(f, "{}", n),
            TagValue::Str(s) => write!(f, "{}", s),
            TagValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

impl From<i64> for TagValue {
    fn from(value: i64) -> Self {
        TagValue::Int(value)
    }
}

impl From<bool> for TagValue {
    fn from(value: bool) -> Self {
        TagValue::Bool(value)
    }
}

impl From<&str> for TagValue {
    fn from(value: &str) -> Self {
        TagValue::Str(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_int_coercion() {
        assert_eq!(RawValue::Int(7).coerce(ValueType::Int), Some(TagValue::Int(7)));
        assert_eq!(RawValue::from(" 42 ").coerce(ValueType::Int), Some(TagValue::Int(42)));
        assert_eq!(RawValue::from("-3").coerce(ValueType::Int), Some(TagValue::Int(-3)));
        assert_eq!(RawValue::Float(7.9).coerce(ValueType::Int), Some(TagValue::Int(7)));
        assert_eq!(RawValue::Float(-7.9).coerce(ValueType::Int), Some(TagValue::Int(-7)));
        assert_eq!(RawValue::Bool(true).coerce(ValueType::Int), Some(TagValue::Int(1)));

        assert_eq!(RawValue::from("7.0").coerce(ValueType::Int), None);
        assert_eq!(RawValue::from("seven").coerce(ValueType::Int), None);
        assert_eq!(RawValue::Null.coerce(ValueType::Int), None);
        assert_eq!(RawValue::Float(f64::NAN).coerce(ValueType::Int), None);
        assert_eq!(RawValue::Float(f64::INFINITY).coerce(ValueType::Int), None);
        assert_eq!(RawValue::Float(1e300).coerce(ValueType::Int), None);
    }

    #[test]
    fn test_string_coercion_requires_text() {
        assert_eq!(RawValue::from("A").coerce(ValueType::Str), Some(TagValue::from("A")));
        assert_eq!(RawValue::Int(1).coerce(ValueType::Str), None);
        assert_eq!(RawValue::Bool(false).coerce(ValueType::Str), None);
        assert_eq!(RawValue::Null.coerce(ValueType::Str), None);
    }

    #[test]
    fn test_bool_coercion_is_truthiness() {
        let cases = [
            (RawValue::Null, false),
            (RawValue::Bool(true), true),
            (RawValue::Int(0), false),
            (RawValue::Int(-2), true),
            (RawValue::Float(0.0), false),
            (RawValue::Float(0.5), true),
            (RawValue::from(""), false),
            (RawValue::from("false"), true),
        ];
        for (raw, expected) in cases {
            assert_eq!(raw.coerce(ValueType::Bool), Some(TagValue::Bool(expected)), "{}", raw);
        }
    }

    #[test]
    fn test_key_round_trip_is_positional() {
        assert_eq!(TagValue::Int(-12).to_key(), "-12");
        assert_eq!(TagValue::from_key("-12", ValueType::Int), Some(TagValue::Int(-12)));
        assert_eq!(TagValue::from_key("-12", ValueType::Str), Some(TagValue::from("-12")));
        assert_eq!(TagValue::from_key("true", ValueType::Bool), Some(TagValue::Bool(true)));
        assert_eq!(TagValue::from_key("True", ValueType::Bool), None);
        assert_eq!(TagValue::from_key("x", ValueType::Int), None);
    }

    #[test]
    fn test_raw_value_json_shape() {
        let values: Vec<RawValue> = serde_json::from_str(r#"[null, true, 3, 2.5, "x"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                RawValue::Null,
                RawValue::Bool(true),
                RawValue::Int(3),
                RawValue::Float(2.5),
                RawValue::from("x"),
            ]
        );
        assert_eq!(serde_json::to_string(&TagValue::Int(7)).unwrap(), "7");
        assert_eq!(serde_json::to_string(&TagValue::from("A")).unwrap(), "\"A\"");
    }
}
