//! FILENAME: core/pivot-engine/src/definition.rs
//! Table Definition - What a cross-tab table IS.
//!
//! These types describe a table without computing it:
//! - which tag runs down the rows and which across the columns
//! - optional explicit value lists overriding the observed range
//! - extra filters applied to every cell
//! - layout switches for header and totals

use serde::{Deserialize, Serialize};
use engine::{FilterValue, Query, RawValue};

// ============================================================================
// AXIS
// ============================================================================

/// One axis of the table.
#[derive(Debug, Clone, PartialEq)]
pub enum AxisSpec {
    /// Iterate the tag's resolved range.
    Tag(String),
    /// Iterate exactly these values, in this order.
    Values { tag: String, values: Vec<RawValue> },
}

impl AxisSpec {
    pub fn tag(name: impl Into<String>) -> Self {
        AxisSpec::Tag(name.into())
    }

    pub fn values<I, V>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<RawValue>,
    {
        AxisSpec::Values {
            tag: name.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn tag_name(&self) -> &str {
        match self {
            AxisSpec::Tag(name) => name,
            AxisSpec::Values { tag, .. } => tag,
        }
    }
}

impl From<&str> for AxisSpec {
    fn from(name: &str) -> Self {
        AxisSpec::Tag(name.to_string())
    }
}

impl From<String> for AxisSpec {
    fn from(name: String) -> Self {
        AxisSpec::Tag(name)
    }
}

// ============================================================================
// LAYOUT OPTIONS
// ============================================================================

/// Controls which margins the table carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableLayout {
    /// Header row of column values, and a label cell at the start of each row.
    #[serde(default = "default_true")]
    pub show_header: bool,

    /// A "total" column at the end of every row.
    #[serde(default = "default_true")]
    pub show_row_totals: bool,

    /// A "total" row at the bottom.
    #[serde(default = "default_true")]
    pub show_column_totals: bool,
}

fn default_true() -> bool {
    true
}

impl Default for TableLayout {
    fn default() -> Self {
        TableLayout {
            show_header: true,
            show_row_totals: true,
            show_column_totals: true,
        }
    }
}

// ============================================================================
// TABLE DEFINITION
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct TableDefinition {
    pub rows: AxisSpec,
    pub columns: AxisSpec,
    /// Applied to every cell and total. Row/column tags override these.
    pub filters: Query,
    pub layout: TableLayout,
}

impl TableDefinition {
    pub fn new(rows: impl Into<AxisSpec>, columns: impl Into<AxisSpec>) -> Self {
        TableDefinition {
            rows: rows.into(),
            columns: columns.into(),
            filters: Query::new(),
            layout: TableLayout::default(),
        }
    }

    pub fn with_filter(mut self, tag: impl Into<String>, filter: impl Into<FilterValue>) -> Self {
        self.filters.set(tag, filter);
        self
    }

    pub fn with_filters(mut self, filters: Query) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_layout(mut self, layout: TableLayout) -> Self {
        self.layout = layout;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_defaults_when_fields_missing() {
        let layout: TableLayout = serde_json::from_str(r#"{"show_row_totals": false}"#).unwrap();
        assert_eq!(
            layout,
            TableLayout {
                show_header: true,
                show_row_totals: false,
                show_column_totals: true,
            }
        );
    }

    #[test]
    fn test_axis_tag_name() {
        assert_eq!(AxisSpec::from("age").tag_name(), "age");
        assert_eq!(AxisSpec::values("school", ["School_A"]).tag_name(), "school");
    }
}
