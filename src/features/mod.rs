//! Derived feature columns
//!
//! Each feature is a [`BatchTransform`]: it takes a record batch and returns a
//! new batch with its columns replaced or appended, plus counters describing
//! what happened to the rows.

pub mod age;
pub mod breed;

use std::collections::HashSet;
use std::ops::AddAssign;
use std::sync::Arc;

use arrow::array::ArrayRef;
use arrow::datatypes::{Field, Schema};
use arrow::record_batch::RecordBatch;

use crate::error::Result;
use crate::error::util::column_index;

pub use age::{AgeParse, AgeTransform, distinct_descriptions, parse_age};
pub use breed::{BreedTransform, is_mixed_breed};

/// Row counters reported by a transform
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformStats {
    /// Rows removed from the batch
    pub rows_dropped: usize,
    /// Rows whose source value could not be parsed
    pub invalid_values: usize,
    /// Rows matching the transform's flag condition
    pub flagged: usize,
}

impl AddAssign for TransformStats {
    fn add_assign(&mut self, other: Self) {
        self.rows_dropped += other.rows_dropped;
        self.invalid_values += other.invalid_values;
        self.flagged += other.flagged;
    }
}

/// Trait for column transformations applied batch by batch
pub trait BatchTransform: std::fmt::Debug + Send + Sync {
    /// Short name used in log lines
    fn name(&self) -> &'static str;

    /// Transform a record batch
    ///
    /// # Errors
    /// Returns an error if a required column is missing or has the wrong type
    fn apply(&self, batch: &RecordBatch) -> Result<(RecordBatch, TransformStats)>;

    /// Returns the set of column names read by this transform
    fn required_columns(&self) -> HashSet<String>;
}

/// Build a batch with one column replaced by a new array of the same name
pub(crate) fn replace_column(
    batch: &RecordBatch,
    column: &str,
    array: ArrayRef,
) -> Result<RecordBatch> {
    let idx = column_index(batch, column)?;
    let schema = batch.schema();

    let fields: Vec<Field> = schema
        .fields()
        .iter()
        .enumerate()
        .map(|(i, f)| {
            if i == idx {
                Field::new(f.name(), array.data_type().clone(), true)
            } else {
                f.as_ref().clone()
            }
        })
        .collect();

    let mut columns = batch.columns().to_vec();
    columns[idx] = array;

    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?)
}

/// Build a batch without `drop`, with `array` appended under `name`
pub(crate) fn drop_and_append(
    batch: &RecordBatch,
    drop: Option<&str>,
    name: &str,
    array: ArrayRef,
) -> Result<RecordBatch> {
    let drop_idx = drop.map(|c| column_index(batch, c)).transpose()?;
    let schema = batch.schema();

    let mut fields = Vec::with_capacity(batch.num_columns() + 1);
    let mut columns = Vec::with_capacity(batch.num_columns() + 1);
    for (i, field) in schema.fields().iter().enumerate() {
        if Some(i) == drop_idx || field.name() == name {
            continue;
        }
        fields.push(field.as_ref().clone());
        columns.push(batch.column(i).clone());
    }
    fields.push(Field::new(name, array.data_type().clone(), true));
    columns.push(array);

    Ok(RecordBatch::try_new(Arc::new(Schema::new(fields)), columns)?)
}
