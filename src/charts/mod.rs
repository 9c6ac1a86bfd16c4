//! Charts module - Declarative chart specifications

mod builder;
mod spec;

pub use builder::{ChartBuilder, HISTOGRAM_BINS, OUTCOME_FIELD};
pub use spec::{BarMode, ChartKind, ChartSpec, Palette, SET1, SET2, SET3};
