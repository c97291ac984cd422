//! Export of transformed record batches.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Instant;

use arrow::csv::WriterBuilder;
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use serde::{Deserialize, Serialize};

use crate::error::util::safe_create_file;
use crate::error::Result;
use crate::utils::logging::{log_operation_complete, log_operation_start};

/// File format of the exported table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Parquet,
}

impl OutputFormat {
    /// Infer the format from a file extension, falling back to CSV
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("parquet") || ext.eq_ignore_ascii_case("pq") => {
                Self::Parquet
            }
            _ => Self::Csv,
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "parquet" | "pq" => Ok(Self::Parquet),
            other => Err(format!("unknown output format '{other}' (expected csv or parquet)")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv => write!(f, "csv"),
            Self::Parquet => write!(f, "parquet"),
        }
    }
}

/// Write record batches to a file
///
/// # Arguments
/// * `batches` - The batches to write, in order
/// * `schema` - Schema of the output, used when there are no batches
/// * `path` - Destination file; missing parent directories are created
/// * `format` - Output file format
///
/// # Returns
/// The number of rows written
pub fn write_batches(
    batches: &[RecordBatch],
    schema: &SchemaRef,
    path: &Path,
    format: OutputFormat,
) -> Result<usize> {
    let start = Instant::now();
    log_operation_start(&format!("Writing {format} to"), path);

    let file = safe_create_file(path)?;
    let rows = batches.iter().map(RecordBatch::num_rows).sum();

    match format {
        OutputFormat::Csv => {
            let mut writer = WriterBuilder::new().with_header(true).build(file);
            if batches.is_empty() {
                writer.write(&RecordBatch::new_empty(schema.clone()))?;
            }
            for batch in batches {
                writer.write(batch)?;
            }
        }
        OutputFormat::Parquet => {
            let props = WriterProperties::builder()
                .set_compression(Compression::SNAPPY)
                .build();
            let mut writer = ArrowWriter::try_new(file, schema.clone(), Some(props))?;
            for batch in batches {
                writer.write(batch)?;
            }
            writer.close()?;
        }
    }

    log_operation_complete("wrote", path, rows, Some(start.elapsed()));
    Ok(rows)
}
