//! CSV Data Loader Module
//! Handles CSV loading with a row-shape check and Polars parsing.

use super::Dataset;
use polars::prelude::*;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Rows used by Polars for schema inference.
pub const DEFAULT_INFER_SCHEMA_LENGTH: usize = 10_000;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Cannot read {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Input has no header row")]
    MissingHeader,
    #[error("Line {line}: expected {expected} fields, found {found}")]
    Ragged {
        line: u64,
        expected: usize,
        found: usize,
    },
    #[error("Malformed CSV: {0}")]
    Malformed(#[from] csv::Error),
    #[error("Failed to parse CSV: {0}")]
    Parse(#[from] PolarsError),
}

/// Loads tabular CSV sources into a [`Dataset`].
pub struct DataLoader {
    infer_schema_length: Option<usize>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            infer_schema_length: Some(DEFAULT_INFER_SCHEMA_LENGTH),
        }
    }

    /// Load a CSV file. The dataset is labelled with the file stem.
    pub fn load(&self, path: &Path) -> Result<Dataset, LoadError> {
        let bytes = std::fs::read(path).map_err(|source| LoadError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;

        let label = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "dataset".to_string());

        log::debug!("read {} bytes from {}", bytes.len(), path.display());
        self.parse_bytes(label, bytes)
    }

    /// Read CSV from any byte source, e.g. stdin or a network body.
    pub fn load_from_reader<R: Read>(&self, label: &str, mut reader: R) -> Result<Dataset, LoadError> {
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(|source| LoadError::Unreadable {
                path: PathBuf::from(label),
                source,
            })?;
        self.parse_bytes(label.to_string(), bytes)
    }

    /// Parse CSV text already held in memory.
    pub fn parse_str(&self, label: &str, text: &str) -> Result<Dataset, LoadError> {
        self.parse_bytes(label.to_string(), text.as_bytes().to_vec())
    }

    fn parse_bytes(&self, label: String, bytes: Vec<u8>) -> Result<Dataset, LoadError> {
        Self::check_shape(&bytes)?;

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(self.infer_schema_length)
            .into_reader_with_file_handle(Cursor::new(bytes))
            .finish()?;

        log::info!(
            "Loaded '{}': {} rows, {} columns",
            label,
            df.height(),
            df.width()
        );
        Ok(Dataset::new(label, df))
    }

    /// Reject inputs whose rows disagree with the header width.
    fn check_shape(bytes: &[u8]) -> Result<(), LoadError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(bytes);

        let expected = reader.headers()?.len();
        if expected == 0 {
            return Err(LoadError::MissingHeader);
        }

        for record in reader.records() {
            let record = record?;
            if record.len() != expected {
                return Err(LoadError::Ragged {
                    line: record.position().map(|p| p.line()).unwrap_or(0),
                    expected,
                    found: record.len(),
                });
            }
        }

        Ok(())
    }
}
