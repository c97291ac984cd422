//! Feature engineering for shelter animal outcome data.
//!
//! Loads an outcomes CSV, replaces the free-text age description with a numeric
//! age in months, flags pure vs mixed breeds and writes the result back out.

pub mod config;
pub mod error;
pub mod features;
pub mod index;
pub mod pipeline;
pub mod reader;
pub mod utils;
pub mod writer;

// Re-export the most common types for easier use
pub use config::{ColumnNames, FeatureConfig};
pub use error::{Error, Result};
pub use features::{AgeParse, AgeTransform, BatchTransform, BreedTransform, TransformStats};
pub use features::{is_mixed_breed, parse_age};
pub use pipeline::{FeaturePipeline, PipelineSummary, ProcessedBatches};
pub use reader::{csv_schema, read_csv};
pub use writer::{OutputFormat, write_batches};

// Arrow types
pub use arrow::record_batch::RecordBatch;
