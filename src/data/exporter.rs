//! Exporter Module
//! Writes cleaned datasets as CSV and pipeline reports as JSON.

use super::Dataset;
use polars::prelude::*;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("Cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("Failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persists pipeline outputs.
pub struct Exporter;

impl Exporter {
    /// Write every column and row of `dataset`, with a header row.
    pub fn save(dataset: &Dataset, destination: &Path) -> Result<(), WriteError> {
        let mut df = dataset.frame().clone();
        Self::write_atomically(destination, |writer| {
            CsvWriter::new(writer).include_header(true).finish(&mut df)?;
            Ok(())
        })?;

        log::info!(
            "Saved {} rows x {} columns to {}",
            df.height(),
            df.width(),
            destination.display()
        );
        Ok(())
    }

    /// Write any serializable report as pretty JSON.
    pub fn save_report<T: Serialize>(report: &T, destination: &Path) -> Result<(), WriteError> {
        Self::write_atomically(destination, |writer| {
            serde_json::to_writer_pretty(writer, report)?;
            Ok(())
        })?;

        log::info!("Saved report to {}", destination.display());
        Ok(())
    }

    /// Write into a sibling staging file, then rename it over `destination`.
    ///
    /// On failure the staging file is removed and `destination` is untouched.
    fn write_atomically<F>(destination: &Path, write: F) -> Result<(), WriteError>
    where
        F: FnOnce(&mut BufWriter<File>) -> Result<(), WriteError>,
    {
        let staging = Self::staging_path(destination);
        let file = File::create(&staging).map_err(|source| WriteError::Io {
            path: staging.clone(),
            source,
        })?;

        let mut writer = BufWriter::new(file);
        let written = match write(&mut writer) {
            Ok(()) => writer.flush().map_err(|source| WriteError::Io {
                path: staging.clone(),
                source,
            }),
            Err(e) => Err(e),
        };
        drop(writer);

        let renamed = written.and_then(|()| {
            std::fs::rename(&staging, destination).map_err(|source| WriteError::Io {
                path: destination.to_path_buf(),
                source,
            })
        });
        if renamed.is_err() {
            let _ = std::fs::remove_file(&staging);
        }
        renamed
    }

    fn staging_path(destination: &Path) -> PathBuf {
        let name = destination
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "export".to_string());
        destination.with_file_name(format!(".{}.partial", name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataLoader;

    #[test]
    fn saved_csv_round_trips_header_and_rows() {
        let ds = DataLoader::new()
            .parse_str("t", "Glucose,BP,Outcome\n148,72,1\n85,66,0\n183,64,1\n")
            .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cleandata.csv");

        Exporter::save(&ds, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().next(), Some("Glucose,BP,Outcome"));
        assert_eq!(text.lines().count(), 4);

        let reloaded = DataLoader::new().load(&path).unwrap();
        assert_eq!(reloaded.column_names(), ds.column_names());
        assert_eq!(reloaded.height(), 3);
    }

    #[test]
    fn unwritable_destination_is_a_write_error() {
        let ds = DataLoader::new().parse_str("t", "a\n1\n").unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.csv");

        let err = Exporter::save(&ds, &path).unwrap_err();
        assert!(matches!(err, WriteError::Io { .. }));
    }

    struct FailsMidway;

    impl Serialize for FailsMidway {
        fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            use serde::ser::{Error, SerializeMap};
            let mut map = serializer.serialize_map(Some(2))?;
            map.serialize_entry("rows", &58)?;
            Err(S::Error::custom("stats unavailable"))
        }
    }

    #[test]
    fn failed_write_leaves_previous_file_intact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        std::fs::write(&path, "previous").unwrap();

        let err = Exporter::save_report(&FailsMidway, &path).unwrap_err();
        assert!(matches!(err, WriteError::Json(_)));

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "previous");
        let leftovers: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(leftovers.len(), 1);
    }

    #[test]
    fn report_is_pretty_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");

        Exporter::save_report(&serde_json::json!({"rows": 58}), &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["rows"], 58);
    }
}
