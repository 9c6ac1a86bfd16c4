//! Stats module - Descriptive statistics and outcome comparisons

mod calculator;

pub use calculator::{
    ColumnStats, GroupSummary, OutcomeComparison, StatsEngine, StatsEntry, StatsTable,
    NEGATIVE_OUTCOME, POSITIVE_OUTCOME, SIGNIFICANCE_THRESHOLD,
};
