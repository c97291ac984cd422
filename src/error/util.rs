//! Utility functions for error handling
//!
//! Helpers that attach file paths and column names to the errors they raise.

use std::fs;
use std::io;
use std::path::Path;

use arrow::array::StringArray;
use arrow::record_batch::RecordBatch;

use crate::error::{Error, Result};

/// Open a file for reading, reporting the path on failure
///
/// # Arguments
/// * `path` - The path to the file to open
///
/// # Returns
/// * `Result<fs::File>` - The opened file or an error naming the path
pub fn safe_open_file(path: &Path) -> Result<fs::File> {
    if path.is_dir() {
        return Err(Error::io(
            path,
            io::Error::new(io::ErrorKind::InvalidInput, "expected a file, found a directory"),
        ));
    }

    fs::File::open(path).map_err(|e| Error::io(path, e))
}

/// Create (or truncate) a file for writing, creating missing parent directories
pub fn safe_create_file(path: &Path) -> Result<fs::File> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
    }

    fs::File::create(path).map_err(|e| Error::io(path, e))
}

/// Find the index of a column by name
pub fn column_index(batch: &RecordBatch, column: &str) -> Result<usize> {
    batch
        .schema()
        .index_of(column)
        .map_err(|_| Error::column_not_found(column))
}

/// Get a string column from a batch, failing on a missing column or a non-Utf8 type
pub fn string_column<'a>(batch: &'a RecordBatch, column: &str) -> Result<&'a StringArray> {
    let idx = column_index(batch, column)?;
    batch
        .column(idx)
        .as_any()
        .downcast_ref::<StringArray>()
        .ok_or_else(|| Error::ColumnType {
            column: column.to_string(),
            expected: "Utf8".to_string(),
        })
}
