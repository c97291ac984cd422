//! CSV ingestion into Arrow record batches.
//!
//! Every column is read as nullable `Utf8`; empty cells become nulls. Values are
//! kept verbatim so untouched columns are written back exactly as they came in.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use arrow::csv::ReaderBuilder;
use arrow::csv::reader::Format;
use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;

use crate::config::FeatureConfig;
use crate::error::util::safe_open_file;
use crate::error::{Error, Result};
use crate::utils::logging::{log_operation_complete, log_operation_start};

/// Read the header of a CSV file and build an all-`Utf8` schema from it
pub fn csv_schema(path: &Path) -> Result<SchemaRef> {
    let mut file = safe_open_file(path)?;
    let (inferred, _) = Format::default()
        .with_header(true)
        .infer_schema(&mut file, Some(0))?;

    if inferred.fields().is_empty() {
        return Err(Error::Validation(format!(
            "CSV file has no header row: {}",
            path.display()
        )));
    }

    let fields: Vec<Field> = inferred
        .fields()
        .iter()
        .map(|f| Field::new(f.name(), DataType::Utf8, true))
        .collect();

    Ok(Arc::new(Schema::new(fields)))
}

/// Read a CSV file into record batches
///
/// # Arguments
/// * `path` - Path to the CSV file
/// * `config` - Pipeline configuration (batch size)
///
/// # Returns
/// The record batches in file order
pub fn read_csv(path: &Path, config: &FeatureConfig) -> Result<Vec<RecordBatch>> {
    let start = Instant::now();
    log_operation_start("Reading", path);

    let schema = csv_schema(path)?;
    let file = safe_open_file(path)?;

    let reader = ReaderBuilder::new(schema)
        .with_header(true)
        .with_batch_size(config.effective_batch_size())
        .build(file)?;

    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
    let rows = batches.iter().map(RecordBatch::num_rows).sum();

    log_operation_complete("read", path, rows, Some(start.elapsed()));
    Ok(batches)
}
