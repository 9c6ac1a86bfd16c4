//! Data module - CSV loading, cleaning and export

mod cleaner;
mod dataset;
mod exporter;
mod loader;

pub use cleaner::{CleanError, Cleaner, CleaningStep, RangeError, SchemaError};
pub use dataset::{is_numeric_dtype, ColumnSummary, Dataset, DatasetSummary};
pub use exporter::{Exporter, WriteError};
pub use loader::{DataLoader, LoadError, DEFAULT_INFER_SCHEMA_LENGTH};
