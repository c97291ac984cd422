//! End-to-end feature pipeline: read, validate, derive, write.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
use arrow::record_batch::RecordBatch;
use indicatif::ProgressBar;
use rayon::prelude::*;

use crate::config::FeatureConfig;
use crate::error::{Error, Result};
use crate::features::{
    AgeTransform, BatchTransform, BreedTransform, TransformStats, distinct_descriptions,
};
use crate::index::{ensure_unique_key, move_column_to_front};
use crate::reader::read_csv;
use crate::utils::logging::{
    create_hidden_spinner, create_spinner, finish_and_clear, log_stage, log_warning,
};
use crate::writer::write_batches;

/// Outcome of a pipeline run
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSummary {
    pub rows_read: usize,
    pub rows_written: usize,
    pub rows_dropped: usize,
    pub invalid_ages: usize,
    pub mixed_breeds: usize,
    pub output_path: PathBuf,
    pub elapsed: Duration,
}

/// Transformed batches together with per-transform counters
#[derive(Debug)]
pub struct ProcessedBatches {
    pub batches: Vec<RecordBatch>,
    pub schema: SchemaRef,
    pub age: TransformStats,
    pub breed: TransformStats,
}

/// Runs the shelter feature transforms over a CSV file
#[derive(Debug)]
pub struct FeaturePipeline {
    config: FeatureConfig,
    age: AgeTransform,
    breed: BreedTransform,
    show_progress: bool,
}

impl FeaturePipeline {
    #[must_use]
    pub fn new(config: FeatureConfig) -> Self {
        let columns = &config.columns;
        let age = AgeTransform::new(&columns.age, &columns.age_months, config.keep_missing_age);
        let breed = BreedTransform::new(&columns.breed, &columns.pure);
        Self {
            config,
            age,
            breed,
            show_progress: false,
        }
    }

    /// Show a terminal spinner while running
    #[must_use]
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Read the input, derive the features and write the output
    pub fn run(&self) -> Result<PipelineSummary> {
        let spinner = if self.show_progress {
            create_spinner(Some("Reading input"))
        } else {
            create_hidden_spinner()
        };

        self.run_with(spinner)
    }

    // The spinner is cleared on every exit path, including errors.
    fn run_with(&self, spinner: ProgressBar) -> Result<PipelineSummary> {
        let result = self.run_with_spinner(&spinner);
        finish_and_clear(&spinner);
        result
    }

    fn run_with_spinner(&self, spinner: &ProgressBar) -> Result<PipelineSummary> {
        let start = Instant::now();
        let input = self.config.input_path()?;
        let output = self.config.output_path()?;

        let batches = read_csv(&input, &self.config)?;
        let rows_read = batches.iter().map(RecordBatch::num_rows).sum();

        spinner.set_message("Deriving features");
        let processed = self.process_batches(batches)?;

        spinner.set_message("Writing output");
        let rows_written = write_batches(
            &processed.batches,
            &processed.schema,
            &output,
            self.config.output_format(),
        )?;

        Ok(PipelineSummary {
            rows_read,
            rows_written,
            rows_dropped: processed.age.rows_dropped,
            invalid_ages: processed.age.invalid_values,
            mixed_breeds: processed.breed.flagged,
            output_path: output,
            elapsed: start.elapsed(),
        })
    }

    /// Validate the key column and apply the transforms to in-memory batches
    pub fn process_batches(&self, batches: Vec<RecordBatch>) -> Result<ProcessedBatches> {
        let Some(first) = batches.first() else {
            return Err(Error::Validation("Input contains no data".to_string()));
        };
        let schema = self.output_schema(&first.schema())?;

        let index = &self.config.columns.index;
        let keys = ensure_unique_key(&batches, index)?;
        log::debug!("{keys} distinct '{index}' values");

        if log::log_enabled!(log::Level::Debug) {
            let age_column = &self.config.columns.age;
            let distinct = distinct_descriptions(&batches, age_column)?;
            log::debug!("Distinct '{age_column}' values: {distinct:?}");
        }

        let rows_in: usize = batches.iter().map(RecordBatch::num_rows).sum();
        let transforms: [&dyn BatchTransform; 2] = [&self.age, &self.breed];

        let results: Vec<Result<(RecordBatch, [TransformStats; 2])>> = batches
            .par_iter()
            .map(|batch| {
                let mut batch = move_column_to_front(batch, index)?;
                let mut stats = [TransformStats::default(); 2];
                for (transform, slot) in transforms.iter().zip(stats.iter_mut()) {
                    let (next, s) = transform.apply(&batch)?;
                    batch = next;
                    *slot = s;
                }
                Ok((batch, stats))
            })
            .collect();

        let mut out = Vec::with_capacity(results.len());
        let mut age = TransformStats::default();
        let mut breed = TransformStats::default();
        for result in results {
            let (batch, [a, b]) = result?;
            age += a;
            breed += b;
            if batch.num_rows() > 0 {
                out.push(batch);
            }
        }

        let rows_out = out.iter().map(RecordBatch::num_rows).sum();
        log_stage(self.age.name(), rows_in, rows_out);
        if age.rows_dropped > 0 {
            log_warning(
                &format!(
                    "Dropped {} rows without an age description in '{}'",
                    age.rows_dropped, self.config.columns.age
                ),
                None,
            );
        }
        if age.invalid_values > 0 {
            log_warning(
                &format!("{} age descriptions could not be parsed", age.invalid_values),
                None,
            );
        }
        log::info!("{}: {} mixed breeds", self.breed.name(), breed.flagged);

        Ok(ProcessedBatches {
            batches: out,
            schema,
            age,
            breed,
        })
    }

    /// Schema of the output for a given input schema
    pub fn output_schema(&self, input: &Schema) -> Result<SchemaRef> {
        let columns = &self.config.columns;
        let required = std::iter::once(columns.index.clone())
            .chain(self.age.required_columns())
            .chain(self.breed.required_columns());
        for column in required {
            if input.index_of(&column).is_err() {
                return Err(Error::column_not_found(column));
            }
        }

        let mut fields: Vec<Field> = Vec::with_capacity(input.fields().len() + 1);
        fields.push(Field::new(&columns.index, DataType::Utf8, true));
        for field in input.fields() {
            let name = field.name();
            if name == &columns.index
                || name == &columns.age
                || name == &columns.age_months
                || name == &columns.pure
            {
                continue;
            }
            fields.push(field.as_ref().clone());
        }
        fields.push(Field::new(&columns.age_months, DataType::Float64, true));
        fields.push(Field::new(&columns.pure, DataType::Utf8, true));

        Ok(Arc::new(Schema::new(fields)))
    }
}
