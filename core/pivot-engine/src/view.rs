//! FILENAME: core/pivot-engine/src/view.rs
//! Table View - Renderable output.
//!
//! A computed table is a list of rows of `TableCell`s. It serializes to
//! nested JSON arrays (`null` corner, native labels, `"total"` markers,
//! integer counts) and renders as aligned plain text.

use std::fmt;
use serde::{Serialize, Serializer};
use engine::RawValue;

/// Label used for total rows and columns.
pub const TOTAL_LABEL: &str = "total";

// ============================================================================
// CELL
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum TableCell {
    /// Top-left corner of a table with a header.
    Blank,
    /// A row or column value.
    Label(RawValue),
    /// Header of the totals column or row.
    Total,
    /// An aggregate count.
    Count(u64),
}

impl TableCell {
    pub fn count(&self) -> Option<u64> {
        match self {
            TableCell::Count(n) => Some(*n),
            _ => None,
        }
    }

    fn display_text(&self) -> String {
        match self {
            TableCell::Blank => String::new(),
            TableCell::Label(RawValue::Text(s)) => s.clone(),
            TableCell::Label(value) => value.to_string(),
            TableCell::Total => TOTAL_LABEL.to_string(),
            TableCell::Count(n) => n.to_string(),
        }
    }
}

impl Serialize for TableCell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TableCell::Blank => serializer.serialize_none(),
            TableCell::Label(value) => value.serialize(serializer),
            TableCell::Total => serializer.serialize_str(TOTAL_LABEL),
            TableCell::Count(n) => serializer.serialize_u64(*n),
        }
    }
}

impl From<u64> for TableCell {
    fn from(value: u64) -> Self {
        TableCell::Count(value)
    }
}

// ============================================================================
// TABLE
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PivotTable {
    rows: Vec<Vec<TableCell>>,
}

impl PivotTable {
    pub fn new(rows: Vec<Vec<TableCell>>) -> Self {
        PivotTable { rows }
    }

    pub fn rows(&self) -> &[Vec<TableCell>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn col_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&TableCell> {
        self.rows.get(row)?.get(col)
    }

    pub fn into_rows(self) -> Vec<Vec<TableCell>> {
        self.rows
    }
}

impl fmt::Display for PivotTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| row.iter().map(TableCell::display_text).collect())
            .collect();

        let mut widths = vec![0usize; self.col_count()];
        for row in &text {
            for (i, cell) in row.iter().enumerate() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }

        for (row, cells) in self.rows.iter().zip(&text) {
            let line = cells
                .iter()
                .zip(row)
                .enumerate()
                .map(|(i, (s, cell))| match cell {
                    TableCell::Count(_) => format!("{:>w$}", s, w = widths[i]),
                    _ => format!("{:<w$}", s, w = widths[i]),
                })
                .collect::<Vec<_>>()
                .join("  ");
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}
