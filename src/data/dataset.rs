//! Dataset Module
//! Ordered observation records backed by a Polars DataFrame.

use polars::prelude::*;
use serde::Serialize;

/// An ordered, immutable table of observation records.
///
/// Every cleaning step produces a new `Dataset`; the frame inside is never
/// mutated once wrapped. The `label` names the source and is what chart
/// specifications refer to.
#[derive(Debug, Clone)]
pub struct Dataset {
    label: String,
    df: DataFrame,
}

/// Shape and per-column overview of a dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub label: String,
    pub rows: usize,
    pub columns: Vec<ColumnSummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub dtype: String,
    pub null_count: usize,
}

/// Whether a Polars dtype holds numbers.
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float32
            | DataType::Float64
            | DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
    )
}

impl Dataset {
    pub fn new(label: impl Into<String>, df: DataFrame) -> Self {
        Self {
            label: label.into(),
            df,
        }
    }

    /// Wrap a transformed frame under the same label.
    pub(crate) fn derive(&self, df: DataFrame) -> Self {
        Self {
            label: self.label.clone(),
            df,
        }
    }

    /// Same records under a new label.
    pub fn with_label(self, label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            df: self.df,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn frame(&self) -> &DataFrame {
        &self.df
    }

    /// Number of records.
    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    /// Column names in record order.
    pub fn column_names(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.df.get_column_index(name).is_some()
    }

    pub fn is_numeric_column(&self, name: &str) -> bool {
        self.df
            .column(name)
            .map(|col| is_numeric_dtype(col.dtype()))
            .unwrap_or(false)
    }

    /// Row-aligned values of a numeric column, `None` for nulls and NaN.
    ///
    /// Returns `None` when the column is absent or not numeric.
    pub fn column_values(&self, name: &str) -> Option<Vec<Option<f64>>> {
        let column = self.df.column(name).ok()?;
        if !is_numeric_dtype(column.dtype()) {
            return None;
        }

        let as_f64 = column.cast(&DataType::Float64).ok()?;
        let ca = as_f64.f64().ok()?;
        Some(
            ca.into_iter()
                .map(|v| v.filter(|x| !x.is_nan()))
                .collect(),
        )
    }

    /// Present values of a numeric column, skipping nulls and NaN.
    pub fn numeric_values(&self, name: &str) -> Option<Vec<f64>> {
        self.column_values(name)
            .map(|values| values.into_iter().flatten().collect())
    }

    /// Shape, dtypes and null counts.
    pub fn summary(&self) -> DatasetSummary {
        let columns = self
            .df
            .get_columns()
            .iter()
            .map(|col| ColumnSummary {
                name: col.name().to_string(),
                dtype: col.dtype().to_string(),
                null_count: col.null_count(),
            })
            .collect();

        DatasetSummary {
            label: self.label.clone(),
            rows: self.df.height(),
            columns,
        }
    }
}

impl DatasetSummary {
    /// Total nulls across all columns.
    pub fn total_nulls(&self) -> usize {
        self.columns.iter().map(|c| c.null_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        let df = df!(
            "Glucose" => [Some(148.0), None, Some(f64::NAN), Some(89.0)],
            "Age" => [50i64, 31, 32, 21],
            "Label" => ["a", "b", "c", "d"],
        )
        .unwrap();
        Dataset::new("sample", df)
    }

    #[test]
    fn numeric_values_skip_nulls_and_nan() {
        let ds = sample();
        assert_eq!(ds.numeric_values("Glucose").unwrap(), vec![148.0, 89.0]);
        assert_eq!(
            ds.column_values("Glucose").unwrap(),
            vec![Some(148.0), None, None, Some(89.0)]
        );
        assert_eq!(
            ds.numeric_values("Age").unwrap(),
            vec![50.0, 31.0, 32.0, 21.0]
        );
    }

    #[test]
    fn categorical_and_missing_columns_have_no_numeric_values() {
        let ds = sample();
        assert!(ds.numeric_values("Label").is_none());
        assert!(ds.numeric_values("Insulin").is_none());
        assert!(!ds.is_numeric_column("Label"));
        assert!(ds.is_numeric_column("Age"));
    }

    #[test]
    fn relabelling_keeps_records() {
        let ds = sample().with_label("sample:cleaned");
        assert_eq!(ds.label(), "sample:cleaned");
        assert_eq!(ds.height(), 4);
    }

    #[test]
    fn summary_counts_nulls() {
        let summary = sample().summary();
        assert_eq!(summary.rows, 4);
        assert_eq!(summary.columns.len(), 3);
        assert_eq!(summary.columns[0].name, "Glucose");
        assert_eq!(summary.columns[0].null_count, 1);
        assert_eq!(summary.total_nulls(), 1);
    }
}
