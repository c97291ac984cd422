//! Row key handling
//!
//! The identifier column acts as the table index: one row per identifier, written
//! as the first output column.

use std::sync::Arc;

use arrow::array::{Array, ArrayRef};
use arrow::datatypes::{Field, Schema};
use arrow::record_batch::RecordBatch;
use rustc_hash::FxHashSet;

use crate::error::util::{column_index, string_column};
use crate::error::{Error, Result};

/// Check that every row has a non-null identifier and no identifier repeats
///
/// # Returns
/// The number of distinct identifiers
pub fn ensure_unique_key(batches: &[RecordBatch], column: &str) -> Result<usize> {
    let total: usize = batches.iter().map(RecordBatch::num_rows).sum();
    let mut seen: FxHashSet<String> = FxHashSet::default();
    seen.reserve(total);

    let mut row_offset = 0;
    for batch in batches {
        let keys = string_column(batch, column)?;
        for i in 0..keys.len() {
            if keys.is_null(i) {
                return Err(Error::Validation(format!(
                    "Missing value in key column '{column}' at row {}",
                    row_offset + i
                )));
            }
            let key = keys.value(i);
            if !seen.insert(key.to_string()) {
                return Err(Error::DuplicateKey {
                    column: column.to_string(),
                    key: key.to_string(),
                });
            }
        }
        row_offset += keys.len();
    }

    Ok(seen.len())
}

/// Reorder a batch so the named column comes first
pub fn move_column_to_front(batch: &RecordBatch, column: &str) -> Result<RecordBatch> {
    let idx = column_index(batch, column)?;
    if idx == 0 {
        return Ok(batch.clone());
    }

    let schema = batch.schema();
    let order = std::iter::once(idx).chain((0..batch.num_columns()).filter(|&i| i != idx));

    let mut fields: Vec<Field> = Vec::with_capacity(batch.num_columns());
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(batch.num_columns());
    for i in order {
        fields.push(schema.field(i).clone());
        columns.push(batch.column(i).clone());
    }

    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?)
}
