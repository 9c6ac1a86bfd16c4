//! Statistics Calculator Module
//! Per-column descriptive statistics and outcome-group t-tests.

use crate::data::{Dataset, SchemaError};
use serde::ser::{Serialize, Serializer};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Significance threshold for t-test
pub const SIGNIFICANCE_THRESHOLD: f64 = 0.05;

/// Outcome label of the negative group.
pub const NEGATIVE_OUTCOME: f64 = 0.0;
/// Outcome label of the positive group.
pub const POSITIVE_OUTCOME: f64 = 1.0;

/// Descriptive statistics for one numeric column.
///
/// `None` marks a statistic with no value, which happens exactly when the
/// column holds no non-null values.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ColumnStats {
    pub count: usize,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub mode: Option<f64>,
    pub range: Option<f64>,
}

/// Result for one requested column.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StatsEntry {
    Computed(ColumnStats),
    Unavailable { reason: String },
}

impl StatsEntry {
    pub fn computed(&self) -> Option<&ColumnStats> {
        match self {
            StatsEntry::Computed(stats) => Some(stats),
            StatsEntry::Unavailable { .. } => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, StatsEntry::Computed(_))
    }
}

/// Column statistics in the order the columns were requested.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsTable {
    entries: Vec<(String, StatsEntry)>,
}

impl StatsTable {
    pub fn get(&self, column: &str) -> Option<&StatsEntry> {
        self.entries
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, entry)| entry)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StatsEntry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn columns(&self) -> Vec<&str> {
        self.entries.iter().map(|(name, _)| name.as_str()).collect()
    }

    fn insert(&mut self, column: &str, entry: StatsEntry) {
        match self.entries.iter_mut().find(|(name, _)| name == column) {
            Some(slot) => slot.1 = entry,
            None => self.entries.push((column.to_string(), entry)),
        }
    }
}

impl Serialize for StatsTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(name, entry)| (name, entry)))
    }
}

/// Count and mean of one outcome group.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct GroupSummary {
    pub count: usize,
    pub mean: Option<f64>,
}

/// A numeric column compared between the two outcome groups.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct OutcomeComparison {
    pub column: String,
    pub negative: GroupSummary,
    pub positive: GroupSummary,
    pub p_value: Option<f64>,
    pub is_significant: bool,
}

/// Handles statistical calculations over cleaned datasets.
pub struct StatsEngine;

impl StatsEngine {
    /// Compute statistics for each requested column.
    ///
    /// A column that is absent or not numeric is recorded as unavailable and
    /// the remaining columns are still computed.
    pub fn compute_stats<S: AsRef<str>>(dataset: &Dataset, numeric_columns: &[S]) -> StatsTable {
        let mut table = StatsTable::default();

        for column in numeric_columns {
            let column: &str = column.as_ref();
            let entry = if !dataset.has_column(column) {
                log::warn!("Column '{}' is missing; statistics unavailable", column);
                StatsEntry::Unavailable {
                    reason: format!("column '{}' not found", column),
                }
            } else {
                match dataset.numeric_values(column) {
                    Some(values) => StatsEntry::Computed(Self::compute_descriptive_stats(&values)),
                    None => {
                        log::warn!("Column '{}' is not numeric; statistics unavailable", column);
                        StatsEntry::Unavailable {
                            reason: format!("column '{}' is not numeric", column),
                        }
                    }
                }
            };
            table.insert(column, entry);
        }

        log::info!(
            "Computed statistics for {}/{} columns",
            table.iter().filter(|(_, e)| e.is_available()).count(),
            table.len()
        );
        table
    }

    /// Compute descriptive statistics for an array of values.
    pub fn compute_descriptive_stats(values: &[f64]) -> ColumnStats {
        let n = values.len();
        if n == 0 {
            return ColumnStats {
                count: 0,
                mean: None,
                median: None,
                mode: None,
                range: None,
            };
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let mean = values.iter().sum::<f64>() / n as f64;
        let median = if n % 2 == 0 {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        } else {
            sorted[n / 2]
        };
        let range = sorted[n - 1] - sorted[0];

        ColumnStats {
            count: n,
            mean: Some(mean),
            median: Some(median),
            mode: Self::mode_of_sorted(&sorted),
            range: Some(range),
        }
    }

    /// Most frequent value of an ascending slice; ties go to the smallest value.
    fn mode_of_sorted(sorted: &[f64]) -> Option<f64> {
        let mut best: Option<(f64, usize)> = None;
        let mut i = 0;

        while i < sorted.len() {
            let value = sorted[i];
            let mut j = i + 1;
            while j < sorted.len() && sorted[j] == value {
                j += 1;
            }
            let run = j - i;
            // strictly greater keeps the earlier, smaller value on ties
            if best.map_or(true, |(_, count)| run > count) {
                best = Some((value, run));
            }
            i = j;
        }

        best.map(|(value, _)| value)
    }

    /// Perform Welch's t-test (independent samples, unequal variance).
    ///
    /// Returns the two-tailed p-value and whether it clears
    /// [`SIGNIFICANCE_THRESHOLD`]. Groups with fewer than two values have no
    /// p-value.
    pub fn perform_ttest(group_values: &[f64], control_values: &[f64]) -> (Option<f64>, bool) {
        let n1 = group_values.len() as f64;
        let n2 = control_values.len() as f64;

        if n1 < 2.0 || n2 < 2.0 {
            return (None, false);
        }

        let mean1 = group_values.iter().sum::<f64>() / n1;
        let mean2 = control_values.iter().sum::<f64>() / n2;

        let var1 = group_values
            .iter()
            .map(|x| (x - mean1).powi(2))
            .sum::<f64>()
            / (n1 - 1.0);
        let var2 = control_values
            .iter()
            .map(|x| (x - mean2).powi(2))
            .sum::<f64>()
            / (n2 - 1.0);

        let se = (var1 / n1 + var2 / n2).sqrt();
        if se == 0.0 {
            // Both groups constant
            return if mean1 == mean2 {
                (Some(1.0), false)
            } else {
                (None, false)
            };
        }

        let t = (mean1 - mean2) / se;

        // Welch-Satterthwaite degrees of freedom
        let df_num = (var1 / n1 + var2 / n2).powi(2);
        let df_denom = (var1 / n1).powi(2) / (n1 - 1.0) + (var2 / n2).powi(2) / (n2 - 1.0);
        let df = df_num / df_denom;

        match StudentsT::new(0.0, 1.0, df) {
            Ok(dist) => {
                let p_value = 2.0 * (1.0 - dist.cdf(t.abs()));
                (Some(p_value), p_value <= SIGNIFICANCE_THRESHOLD)
            }
            Err(_) => (None, false),
        }
    }

    /// Compare each numeric column between the negative and positive outcome
    /// groups. Rows with any other outcome label are ignored.
    pub fn compare_outcomes<S: AsRef<str>>(
        dataset: &Dataset,
        numeric_columns: &[S],
        outcome_field: &str,
    ) -> Result<Vec<OutcomeComparison>, SchemaError> {
        if !dataset.has_column(outcome_field) {
            return Err(SchemaError::MissingColumn(outcome_field.to_string()));
        }
        let outcomes = dataset
            .column_values(outcome_field)
            .ok_or_else(|| SchemaError::NotNumeric(outcome_field.to_string()))?;

        let mut comparisons = Vec::new();
        for column in numeric_columns {
            let column: &str = column.as_ref();
            if column == outcome_field {
                continue;
            }
            let Some(values) = dataset.column_values(column) else {
                log::warn!("Skipping outcome comparison for '{}'", column);
                continue;
            };

            let (negative, positive) = Self::split_by_outcome(&values, &outcomes);
            let (p_value, is_significant) = Self::perform_ttest(&positive, &negative);
            log::debug!(
                "'{}': {} negative / {} positive values, p = {:?}",
                column,
                negative.len(),
                positive.len(),
                p_value
            );

            comparisons.push(OutcomeComparison {
                column: column.to_string(),
                negative: Self::group_summary(&negative),
                positive: Self::group_summary(&positive),
                p_value,
                is_significant,
            });
        }

        Ok(comparisons)
    }

    fn split_by_outcome(values: &[Option<f64>], outcomes: &[Option<f64>]) -> (Vec<f64>, Vec<f64>) {
        let mut negative = Vec::new();
        let mut positive = Vec::new();

        for (value, outcome) in values.iter().zip(outcomes) {
            let (Some(v), Some(o)) = (value, outcome) else {
                continue;
            };
            if *o == NEGATIVE_OUTCOME {
                negative.push(*v);
            } else if *o == POSITIVE_OUTCOME {
                positive.push(*v);
            }
        }

        (negative, positive)
    }

    fn group_summary(values: &[f64]) -> GroupSummary {
        let stats = Self::compute_descriptive_stats(values);
        GroupSummary {
            count: stats.count,
            mean: stats.mean,
        }
    }
}
