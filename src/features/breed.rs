//! Purebred vs mixed-breed flag

use std::collections::HashSet;
use std::sync::Arc;

use arrow::array::{Array, StringArray, StringBuilder};
use arrow::record_batch::RecordBatch;

use crate::error::Result;
use crate::error::util::string_column;
use crate::features::{BatchTransform, TransformStats, drop_and_append, replace_column};

/// Flag value for pure breeds
pub const PURE: &str = "Yes";
/// Flag value for mixed breeds
pub const MIXED: &str = "No";

/// A breed is mixed when it mentions "mix" or lists several breeds separated by '/'
#[must_use]
pub fn is_mixed_breed(breed: &str) -> bool {
    let breed = breed.to_lowercase();
    breed.contains("mix") || breed.contains('/')
}

/// Lower-cases the breed column and appends a Yes/No purity flag
#[derive(Debug, Clone)]
pub struct BreedTransform {
    source: String,
    output: String,
}

impl BreedTransform {
    #[must_use]
    pub fn new(source: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            output: output.into(),
        }
    }
}

impl BatchTransform for BreedTransform {
    fn name(&self) -> &'static str {
        "breed"
    }

    fn apply(&self, batch: &RecordBatch) -> Result<(RecordBatch, TransformStats)> {
        let breeds = string_column(batch, &self.source)?;

        let lowered: StringArray = breeds.iter().map(|b| b.map(str::to_lowercase)).collect();

        let mut stats = TransformStats::default();
        let mut pure = StringBuilder::with_capacity(breeds.len(), breeds.len() * 3);
        for breed in lowered.iter() {
            match breed {
                Some(b) if is_mixed_breed(b) => {
                    pure.append_value(MIXED);
                    stats.flagged += 1;
                }
                Some(_) => pure.append_value(PURE),
                None => pure.append_null(),
            }
        }

        let batch = replace_column(batch, &self.source, Arc::new(lowered))?;
        let batch = drop_and_append(&batch, None, &self.output, Arc::new(pure.finish()))?;
        Ok((batch, stats))
    }

    fn required_columns(&self) -> HashSet<String> {
        HashSet::from([self.source.clone()])
    }
}
