//! Data Cleaner Module
//! Column renames, column drops and positional row-range excision.
//!
//! Each operation borrows its input and returns a new [`Dataset`], so the
//! loader's output stays intact for anything still holding it.

use super::Dataset;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Column '{0}' not found")]
    MissingColumn(String),
    #[error("Column '{0}' already exists")]
    DuplicateColumn(String),
    #[error("Column '{0}' is not numeric")]
    NotNumeric(String),
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

#[derive(Error, Debug)]
pub enum RangeError {
    #[error("Row range start {0} is negative")]
    NegativeStart(i64),
    #[error("Row range start {start} is past end {end}")]
    Inverted { start: i64, end: i64 },
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Failure of one step in a cleaning sequence.
#[derive(Error, Debug)]
pub enum CleanError {
    #[error("Cleaning step {step} failed: {source}")]
    Schema {
        step: usize,
        #[source]
        source: SchemaError,
    },
    #[error("Cleaning step {step} failed: {source}")]
    Range {
        step: usize,
        #[source]
        source: RangeError,
    },
}

impl CleanError {
    /// Zero-based index of the failing step.
    pub fn step(&self) -> usize {
        match self {
            CleanError::Schema { step, .. } | CleanError::Range { step, .. } => *step,
        }
    }
}

/// One cleaning operation, as written in a pipeline config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum CleaningStep {
    Rename { from: String, to: String },
    DropColumns { columns: Vec<String> },
    DropRows { start: i64, end: i64 },
}

impl CleaningStep {
    /// The cleaning sequence for the diabetes observation export:
    /// rename blood pressure, drop two unused columns, cut the duplicated block.
    pub fn reference_steps() -> Vec<CleaningStep> {
        vec![
            CleaningStep::Rename {
                from: "BloodPressure".to_string(),
                to: "BP".to_string(),
            },
            CleaningStep::DropColumns {
                columns: vec!["DiabetesPedigreeFunction".to_string(), "Id".to_string()],
            },
            CleaningStep::DropRows {
                start: 26,
                end: 2768,
            },
        ]
    }
}

/// Handles dataset cleaning operations.
pub struct Cleaner;

impl Cleaner {
    /// Rename `old` to `new`. Later steps must use `new`.
    pub fn rename_column(dataset: &Dataset, old: &str, new: &str) -> Result<Dataset, SchemaError> {
        if !dataset.has_column(old) {
            return Err(SchemaError::MissingColumn(old.to_string()));
        }
        if old != new && dataset.has_column(new) {
            return Err(SchemaError::DuplicateColumn(new.to_string()));
        }

        let mut df = dataset.frame().clone();
        df.rename(old, new.into())?;
        log::debug!("renamed column '{}' -> '{}'", old, new);
        Ok(dataset.derive(df))
    }

    /// Remove every named column. Nothing is dropped if any name is absent.
    pub fn drop_columns<S: AsRef<str>>(dataset: &Dataset, names: &[S]) -> Result<Dataset, SchemaError> {
        for name in names {
            let name: &str = name.as_ref();
            if !dataset.has_column(name) {
                return Err(SchemaError::MissingColumn(name.to_string()));
            }
        }

        let mut df = dataset.frame().clone();
        for name in names {
            let name: &str = name.as_ref();
            if df.get_column_index(name).is_some() {
                df = df.drop(name)?;
            }
        }

        log::debug!("dropped {} column(s), {} remain", names.len(), df.width());
        Ok(dataset.derive(df))
    }

    /// Remove records at positions `[start, end)`.
    ///
    /// `start >= height` leaves the dataset unchanged and `end` is clamped
    /// to the height.
    pub fn drop_row_range(dataset: &Dataset, start: i64, end: i64) -> Result<Dataset, RangeError> {
        if start < 0 {
            return Err(RangeError::NegativeStart(start));
        }
        if start > end {
            return Err(RangeError::Inverted { start, end });
        }

        let height = dataset.height();
        let start = start as usize;
        if start >= height {
            log::debug!(
                "row range starts at {} but dataset has {} rows; nothing dropped",
                start,
                height
            );
            return Ok(dataset.clone());
        }
        let end = (end as usize).min(height);

        let df = dataset.frame();
        let head = df.slice(0, start);
        let tail = df.slice(end as i64, height - end);
        let kept = head.vstack(&tail)?;

        log::debug!("dropped rows [{}, {}), {} remain", start, end, kept.height());
        Ok(dataset.derive(kept))
    }

    /// Apply `steps` in order, stopping at the first failure.
    pub fn apply_steps(dataset: &Dataset, steps: &[CleaningStep]) -> Result<Dataset, CleanError> {
        let mut current = dataset.clone();

        for (step, op) in steps.iter().enumerate() {
            current = match op {
                CleaningStep::Rename { from, to } => Self::rename_column(&current, from, to)
                    .map_err(|source| CleanError::Schema { step, source })?,
                CleaningStep::DropColumns { columns } => Self::drop_columns(&current, columns)
                    .map_err(|source| CleanError::Schema { step, source })?,
                CleaningStep::DropRows { start, end } => {
                    Self::drop_row_range(&current, *start, *end)
                        .map_err(|source| CleanError::Range { step, source })?
                }
            };
        }

        log::info!(
            "Cleaned '{}': {} -> {} rows, {} -> {} columns",
            dataset.label(),
            dataset.height(),
            current.height(),
            dataset.frame().width(),
            current.frame().width()
        );
        Ok(current)
    }
}
