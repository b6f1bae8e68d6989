//! FILENAME: core/pivot-engine/src/engine.rs
//! Table Engine - Turns a TableDefinition and a TagMatrix into a PivotTable.
//!
//! Algorithm:
//! 1. Resolve both axes to value lists (observed range or explicit override)
//! 2. For each (row, column) intersection, query the matrix
//! 3. Query every row total, column total and the grand total directly
//!
//! Totals are never summed from displayed cells, so they stay correct when
//! an axis shows only part of a tag's values.

use engine::{FilterValue, MatrixError, Query, RawValue, TagMatrix};
use crate::definition::{AxisSpec, TableDefinition};
use crate::view::{PivotTable, TableCell};

// ============================================================================
// TABLE CALCULATOR
// ============================================================================

/// Computes one table against one matrix.
pub struct TableCalculator<'a> {
    definition: &'a TableDefinition,
    matrix: &'a TagMatrix,
}

impl<'a> TableCalculator<'a> {
    pub fn new(definition: &'a TableDefinition, matrix: &'a TagMatrix) -> Self {
        TableCalculator { definition, matrix }
    }

    /// Executes the full calculation and returns the rendered table.
    pub fn calculate(&self) -> Result<PivotTable, MatrixError> {
        let row_tag = self.definition.rows.tag_name();
        let col_tag = self.definition.columns.tag_name();
        let row_values = self.axis_values(&self.definition.rows)?;
        let col_values = self.axis_values(&self.definition.columns)?;
        let layout = self.definition.layout;

        log::debug!(
            "generating table {} ({} rows) x {} ({} columns)",
            row_tag,
            row_values.len(),
            col_tag,
            col_values.len()
        );

        let mut rows = Vec::with_capacity(row_values.len() + 2);

        if layout.show_header {
            let mut header = Vec::with_capacity(col_values.len() + 2);
            header.push(TableCell::Blank);
            header.extend(col_values.iter().cloned().map(TableCell::Label));
            if layout.show_row_totals {
                header.push(TableCell::Total);
            }
            rows.push(header);
        }

        for row_value in &row_values {
            let mut row = Vec::with_capacity(col_values.len() + 2);
            if layout.show_header {
                row.push(TableCell::Label(row_value.clone()));
            }
            for col_value in &col_values {
                row.push(TableCell::Count(self.cell_count(row_tag, row_value, col_tag, col_value)?));
            }
            if layout.show_row_totals {
                let query = self
                    .base_query()
                    .with(row_tag, FilterValue::Exact(row_value.clone()));
                row.push(TableCell::Count(self.matrix.count(&query)?));
            }
            rows.push(row);
        }

        if layout.show_column_totals {
            let mut total_row = Vec::with_capacity(col_values.len() + 2);
            if layout.show_header {
                total_row.push(TableCell::Total);
            }
            for col_value in &col_values {
                let query = self
                    .base_query()
                    .with(col_tag, FilterValue::Exact(col_value.clone()));
                total_row.push(TableCell::Count(self.matrix.count(&query)?));
            }
            if layout.show_row_totals {
                total_row.push(TableCell::Count(self.matrix.count(&self.base_query())?));
            }
            rows.push(total_row);
        }

        Ok(PivotTable::new(rows))
    }

    /// Count at one (row, column) intersection. When both axes name the
    /// same tag the two values must agree, so off-diagonal cells are 0.
    fn cell_count(&self, row_tag: &str, row_value: &RawValue, col_tag: &str, col_value: &RawValue) -> Result<u64, MatrixError> {
        if row_tag == col_tag {
            let def = self
                .matrix
                .schema()
                .get(row_tag)
                .ok_or_else(|| MatrixError::Lookup(row_tag.to_string()))?;
            if row_value.coerce(def.value_type) != col_value.coerce(def.value_type) {
                return Ok(0);
            }
        }

        let query = self
            .base_query()
            .with(row_tag, FilterValue::Exact(row_value.clone()))
            .with(col_tag, FilterValue::Exact(col_value.clone()));
        self.matrix.count(&query)
    }

    fn base_query(&self) -> Query {
        self.definition.filters.clone()
    }

    /// Values an axis iterates: the tag's resolved range, or the explicit
    /// list in the order given.
    fn axis_values(&self, axis: &AxisSpec) -> Result<Vec<RawValue>, MatrixError> {
        match axis {
            AxisSpec::Tag(tag) => Ok(self
                .matrix
                .range(tag)?
                .into_iter()
                .map(RawValue::from)
                .collect()),
            AxisSpec::Values { tag, values } => {
                if self.matrix.schema().get(tag).is_none() {
                    return Err(MatrixError::Lookup(tag.clone()));
                }
                Ok(values.clone())
            }
        }
    }
}

// ============================================================================
// PUBLIC API
// ============================================================================

/// Main entry point: builds the table described by `definition`.
pub fn generate_table(definition: &TableDefinition, matrix: &TagMatrix) -> Result<PivotTable, MatrixError> {
    TableCalculator::new(definition, matrix).calculate()
}
