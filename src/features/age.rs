//! Age in months from free-text age descriptions
//!
//! Descriptions look like `"2 years"`, `"1 month"` or `"3 weeks"`. The quantity is
//! converted to months with 30 days and 4 weeks to the month.

use std::collections::HashSet;
use std::sync::Arc;

use arrow::array::{Array, BooleanArray, Float64Builder};
use arrow::compute::filter_record_batch;
use arrow::record_batch::RecordBatch;
use itertools::Itertools;

use crate::error::Result;
use crate::error::util::string_column;
use crate::features::{BatchTransform, TransformStats, drop_and_append};

/// Time unit of an age description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeUnit {
    Days,
    Weeks,
    Months,
    Years,
}

impl AgeUnit {
    /// Parse a unit label, accepting singular and plural forms
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "day" | "days" => Some(Self::Days),
            "week" | "weeks" => Some(Self::Weeks),
            "month" | "months" => Some(Self::Months),
            "year" | "years" => Some(Self::Years),
            _ => None,
        }
    }

    /// Convert a quantity of this unit to months
    #[must_use]
    pub fn to_months(self, quantity: f64) -> f64 {
        match self {
            Self::Days => quantity / 30.0,
            Self::Weeks => quantity / 4.0,
            Self::Months => quantity,
            Self::Years => quantity * 12.0,
        }
    }
}

/// Result of parsing one age description
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AgeParse {
    /// A valid description, converted to months
    Months(f64),
    /// No description, or no quantity/unit separator
    Missing,
    /// A recognised unit with a quantity that is not a finite number
    Invalid,
}

/// Parse a `"<number> <unit>"` description into months
///
/// An unrecognised unit contributes to none of the day/week/month/year terms, so
/// it yields zero months whatever the quantity. A non-numeric quantity with a
/// recognised unit is [`AgeParse::Invalid`].
#[must_use]
pub fn parse_age(text: Option<&str>) -> AgeParse {
    parse_age_checked(text).0
}

// Second element is true when the unit was not recognised.
fn parse_age_checked(text: Option<&str>) -> (AgeParse, bool) {
    let Some(text) = text.map(str::trim).filter(|t| !t.is_empty()) else {
        return (AgeParse::Missing, false);
    };
    let Some((quantity, unit)) = text.split_once(' ') else {
        return (AgeParse::Missing, false);
    };

    let Some(unit) = AgeUnit::from_label(unit.trim()) else {
        return (AgeParse::Months(0.0), true);
    };

    match quantity.parse::<f64>() {
        Ok(q) if q.is_finite() => (AgeParse::Months(unit.to_months(q)), false),
        _ => (AgeParse::Invalid, false),
    }
}

/// Distinct raw age descriptions across all batches, in first-seen order
pub fn distinct_descriptions(
    batches: &[RecordBatch],
    column: &str,
) -> Result<Vec<Option<String>>> {
    let columns = batches
        .iter()
        .map(|batch| string_column(batch, column))
        .collect::<Result<Vec<_>>>()?;

    Ok(columns
        .iter()
        .flat_map(|descriptions| descriptions.iter())
        .unique()
        .map(|d| d.map(str::to_string))
        .collect())
}

/// Replaces the age description column with a numeric age-in-months column
#[derive(Debug, Clone)]
pub struct AgeTransform {
    source: String,
    output: String,
    keep_missing: bool,
}

impl AgeTransform {
    #[must_use]
    pub fn new(source: impl Into<String>, output: impl Into<String>, keep_missing: bool) -> Self {
        Self {
            source: source.into(),
            output: output.into(),
            keep_missing,
        }
    }
}

impl BatchTransform for AgeTransform {
    fn name(&self) -> &'static str {
        "age"
    }

    fn apply(&self, batch: &RecordBatch) -> Result<(RecordBatch, TransformStats)> {
        let descriptions = string_column(batch, &self.source)?;

        let mut months = Float64Builder::with_capacity(descriptions.len());
        let mut keep = Vec::with_capacity(descriptions.len());
        let mut stats = TransformStats::default();

        for text in descriptions.iter() {
            let (parsed, unknown_unit) = parse_age_checked(text);
            if unknown_unit {
                stats.invalid_values += 1;
            }
            match parsed {
                AgeParse::Months(m) => {
                    months.append_value(m);
                    keep.push(true);
                }
                AgeParse::Invalid => {
                    months.append_null();
                    keep.push(true);
                    stats.invalid_values += 1;
                }
                AgeParse::Missing => {
                    months.append_null();
                    keep.push(self.keep_missing);
                    if !self.keep_missing {
                        stats.rows_dropped += 1;
                    }
                }
            }
        }

        let transformed = drop_and_append(
            batch,
            Some(&self.source),
            &self.output,
            Arc::new(months.finish()),
        )?;

        if stats.rows_dropped == 0 {
            return Ok((transformed, stats));
        }

        let mask = BooleanArray::from(keep);
        Ok((filter_record_batch(&transformed, &mask)?, stats))
    }

    fn required_columns(&self) -> HashSet<String> {
        HashSet::from([self.source.clone()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Float64Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};

    fn batch(ids: Vec<&str>, ages: Vec<Option<&str>>) -> RecordBatch {
        let schema = Schema::new(vec![
            Field::new("AnimalID", DataType::Utf8, true),
            Field::new("AgeuponOutcome", DataType::Utf8, true),
            Field::new("Breed", DataType::Utf8, true),
        ]);
        let n = ids.len();
        RecordBatch::try_new(
            Arc::new(schema),
            vec![
                Arc::new(StringArray::from(ids)),
                Arc::new(StringArray::from(ages)),
                Arc::new(StringArray::from(vec!["Pit Bull Mix"; n])),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_parse_units() {
        assert_eq!(parse_age(Some("2 years")), AgeParse::Months(24.0));
        assert_eq!(parse_age(Some("1 year")), AgeParse::Months(12.0));
        assert_eq!(parse_age(Some("5 months")), AgeParse::Months(5.0));
        assert_eq!(parse_age(Some("1 month")), AgeParse::Months(1.0));
        assert_eq!(parse_age(Some("3 weeks")), AgeParse::Months(0.75));
        assert_eq!(parse_age(Some("1 week")), AgeParse::Months(0.25));
        assert_eq!(parse_age(Some("0 years")), AgeParse::Months(0.0));

        match parse_age(Some("6 days")) {
            AgeParse::Months(m) => assert!((m - 0.2).abs() < 1e-12),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_parse_missing_and_invalid() {
        assert_eq!(parse_age(None), AgeParse::Missing);
        assert_eq!(parse_age(Some("   ")), AgeParse::Missing);
        assert_eq!(parse_age(Some("2years")), AgeParse::Missing);
        assert_eq!(parse_age(Some("two years")), AgeParse::Invalid);
        assert_eq!(parse_age(Some("x months")), AgeParse::Invalid);
        assert_eq!(parse_age(Some("nan years")), AgeParse::Invalid);
    }

    #[test]
    fn test_unknown_unit_is_zero_months() {
        assert_eq!(parse_age(Some("2 decades")), AgeParse::Months(0.0));
        assert_eq!(parse_age(Some("a few years")), AgeParse::Months(0.0));

        let input = batch(vec!["A1", "A2"], vec![Some("3 fortnights"), Some("2 years")]);
        let transform = AgeTransform::new("AgeuponOutcome", "age_months", false);
        let (out, stats) = transform.apply(&input).unwrap();

        assert_eq!(stats.invalid_values, 1);
        assert_eq!(stats.rows_dropped, 0);
        let ages = out
            .column(2)
            .as_any()
            .downcast_ref::<Float64Array>()
            .unwrap();
        assert!(!ages.is_null(0));
        assert_eq!(ages.value(0), 0.0);
        assert_eq!(ages.value(1), 24.0);
    }

    #[test]
    fn test_distinct_descriptions_span_batches() {
        let batches = vec![
            batch(vec!["A1", "A2"], vec![Some("1 year"), None]),
            batch(vec!["A3", "A4"], vec![Some("2 weeks"), Some("1 year")]),
        ];
        let distinct = distinct_descriptions(&batches, "AgeuponOutcome").unwrap();
        assert_eq!(
            distinct,
            vec![Some("1 year".to_string()), None, Some("2 weeks".to_string())]
        );
        assert!(distinct_descriptions(&batches, "Age").is_err());
    }

    #[test]
    fn test_apply_replaces_age_column() {
        let input = batch(vec!["A1", "A2"], vec![Some("1 year"), Some("2 weeks")]);
        let transform = AgeTransform::new("AgeuponOutcome", "age_months", false);
        let (out, stats) = transform.apply(&input).unwrap();

        assert_eq!(stats, TransformStats::default());
        let schema = out.schema();
        let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
        assert_eq!(names, vec!["AnimalID", "Breed", "age_months"]);

        let ages = out
            .column(2)
            .as_any()
            .downcast_ref::<Float64Array>()
            .unwrap();
        assert_eq!(ages.value(0), 12.0);
        assert_eq!(ages.value(1), 0.5);
    }

    #[test]
    fn test_apply_drops_missing_and_nulls_invalid() {
        let input = batch(
            vec!["A1", "A2", "A3"],
            vec![None, Some("x months"), Some("4 days")],
        );
        let transform = AgeTransform::new("AgeuponOutcome", "age_months", false);
        let (out, stats) = transform.apply(&input).unwrap();

        assert_eq!(stats.rows_dropped, 1);
        assert_eq!(stats.invalid_values, 1);
        assert_eq!(out.num_rows(), 2);

        let ids = out
            .column(0)
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap();
        assert_eq!(ids.value(0), "A2");
        assert_eq!(ids.value(1), "A3");

        let ages = out
            .column(2)
            .as_any()
            .downcast_ref::<Float64Array>()
            .unwrap();
        assert!(ages.is_null(0));
        assert!((ages.value(1) - 4.0 / 30.0).abs() < 1e-12);
    }

    #[test]
    fn test_apply_keeps_missing_when_configured() {
        let input = batch(vec!["A1", "A2"], vec![None, Some("3 years")]);
        let transform = AgeTransform::new("AgeuponOutcome", "age_months", true);
        let (out, stats) = transform.apply(&input).unwrap();

        assert_eq!(stats.rows_dropped, 0);
        assert_eq!(out.num_rows(), 2);
        let ages = out
            .column(2)
            .as_any()
            .downcast_ref::<Float64Array>()
            .unwrap();
        assert!(ages.is_null(0));
        assert_eq!(ages.value(1), 36.0);
    }

    #[test]
    fn test_missing_column() {
        let input = batch(vec!["A1"], vec![Some("1 year")]);
        let transform = AgeTransform::new("Age", "age_months", false);
        assert!(transform.apply(&input).is_err());
    }
}
