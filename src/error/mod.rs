//! Error handling for the feature pipeline.

use std::io;
use std::path::{Path, PathBuf};

use arrow::error::ArrowError;
use parquet::errors::ParquetError;

pub mod util;

/// Errors raised while loading, transforming or writing shelter data
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Error opening, reading or writing a file
    #[error("IO error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Error reading CSV data or building record batches
    #[error("Arrow error: {0}")]
    Arrow(#[from] ArrowError),

    /// Error writing Parquet output
    #[error("Parquet error: {0}")]
    Parquet(#[from] ParquetError),

    /// A column the pipeline depends on is absent
    #[error("Column '{column}' not found")]
    ColumnNotFound { column: String },

    /// A column has an unexpected Arrow type
    #[error("Column '{column}' is not a {expected} array")]
    ColumnType { column: String, expected: String },

    /// The identifier column repeats a value
    #[error("Duplicate key '{key}' in column '{column}'")]
    DuplicateKey { column: String, key: String },

    /// Data failed a validation rule
    #[error("Validation error: {0}")]
    Validation(String),

    /// No project root is known for the host operating system
    #[error("Unsupported operating system '{0}': pass --root or --input/--output")]
    UnsupportedPlatform(String),

    /// Configuration could not be loaded or is inconsistent
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Wrap an IO error together with the path it concerns
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Shorthand for a missing column
    pub fn column_not_found(column: impl Into<String>) -> Self {
        Self::ColumnNotFound {
            column: column.into(),
        }
    }
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;
