//! Pipeline Configuration Module
//! JSON-backed settings; defaults reproduce the diabetes observation run.

use crate::data::CleaningStep;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_INPUT: &str = "dirtydata.csv";
pub const DEFAULT_OUTPUT: &str = "cleandata.csv";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read config {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config {path}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Everything one pipeline run needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub input: PathBuf,
    /// Cleaned CSV destination; `None` skips the export.
    pub output: Option<PathBuf>,
    /// JSON report destination; `None` skips the report.
    pub report: Option<PathBuf>,
    pub steps: Vec<CleaningStep>,
    pub numeric_columns: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output: Some(PathBuf::from(DEFAULT_OUTPUT)),
            report: None,
            steps: CleaningStep::reference_steps(),
            numeric_columns: default_numeric_columns(),
        }
    }
}

/// Numeric columns of the cleaned export, `Outcome` excluded.
pub fn default_numeric_columns() -> Vec<String> {
    ["Pregnancies", "Glucose", "BP", "SkinThickness", "Insulin", "BMI", "Age"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl PipelineConfig {
    /// Load a config file. Missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Invalid {
            path: path.to_path_buf(),
            source,
        })
    }
}
