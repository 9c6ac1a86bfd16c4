//! Pipeline Module
//! One-shot load → clean → {stats, charts, export} run and its published results.

use crate::charts::{ChartBuilder, ChartSpec, OUTCOME_FIELD};
use crate::config::PipelineConfig;
use crate::data::{
    CleanError, Cleaner, DataLoader, Dataset, DatasetSummary, Exporter, LoadError, WriteError,
};
use crate::stats::{OutcomeComparison, StatsEngine, StatsTable};
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// View the presentation layer serves at `/`.
pub const ROOT_VIEW: &str = "graphs";

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Clean(#[from] CleanError),
}

/// What happened to one file the pipeline was asked to write.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ExportOutcome {
    Written { path: PathBuf },
    Failed { path: PathBuf, error: String },
    Skipped,
}

impl ExportOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, ExportOutcome::Written { .. })
    }
}

/// Everything computed by one run. Accessors never recompute.
#[derive(Debug, Clone)]
pub struct PipelineResult {
    raw_summary: DatasetSummary,
    cleaned: Dataset,
    stats: StatsTable,
    comparisons: Vec<OutcomeComparison>,
    charts: Vec<ChartSpec>,
    chart_error: Option<String>,
    export: ExportOutcome,
    report_export: ExportOutcome,
}

/// Serializable view of a [`PipelineResult`] for the presentation layer.
#[derive(Debug, Serialize)]
pub struct PipelineReport<'a> {
    pub dataset: &'a str,
    pub rows: usize,
    pub columns: Vec<String>,
    pub root_view: &'static str,
    pub stats: &'a StatsTable,
    pub comparisons: &'a [OutcomeComparison],
    pub charts: &'a [ChartSpec],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart_error: Option<&'a str>,
}

impl PipelineResult {
    pub fn cleaned_dataset(&self) -> &Dataset {
        &self.cleaned
    }

    pub fn stats(&self) -> &StatsTable {
        &self.stats
    }

    pub fn chart_specs(&self) -> &[ChartSpec] {
        &self.charts
    }

    /// Why no chart specs were built, if they could not be.
    pub fn chart_error(&self) -> Option<&str> {
        self.chart_error.as_deref()
    }

    pub fn comparisons(&self) -> &[OutcomeComparison] {
        &self.comparisons
    }

    /// Overview of the input as loaded, before cleaning.
    pub fn raw_summary(&self) -> &DatasetSummary {
        &self.raw_summary
    }

    pub fn export_outcome(&self) -> &ExportOutcome {
        &self.export
    }

    pub fn report_outcome(&self) -> &ExportOutcome {
        &self.report_export
    }

    pub fn report(&self) -> PipelineReport<'_> {
        PipelineReport {
            dataset: self.cleaned.label(),
            rows: self.cleaned.height(),
            columns: self.cleaned.column_names(),
            root_view: ROOT_VIEW,
            stats: &self.stats,
            comparisons: &self.comparisons,
            charts: &self.charts,
            chart_error: self.chart_error.as_deref(),
        }
    }
}

/// Load the configured input and run every stage once.
pub fn initialize(config: &PipelineConfig) -> Result<PipelineResult, PipelineError> {
    let raw = DataLoader::new().load(&config.input)?;
    run(&raw, config)
}

/// Run every stage on an already loaded dataset.
///
/// Only loading and cleaning failures are returned. Chart and export failures
/// are recorded in the result, so the cleaned data and statistics stay
/// available either way.
pub fn run(raw: &Dataset, config: &PipelineConfig) -> Result<PipelineResult, PipelineError> {
    let raw_summary = raw.summary();
    log::info!(
        "Input '{}': {} rows, {} columns, {} nulls",
        raw_summary.label,
        raw_summary.rows,
        raw_summary.columns.len(),
        raw_summary.total_nulls()
    );
    for column in &raw_summary.columns {
        log::debug!(
            "  {} ({}): {} nulls",
            column.name,
            column.dtype,
            column.null_count
        );
    }

    let cleaned =
        Cleaner::apply_steps(raw, &config.steps)?.with_label(cleaned_label(raw, config));

    let stats = StatsEngine::compute_stats(&cleaned, &config.numeric_columns);
    for (column, entry) in stats.iter() {
        log::debug!("  {}: {:?}", column, entry);
    }

    let comparisons =
        match StatsEngine::compare_outcomes(&cleaned, &config.numeric_columns, OUTCOME_FIELD) {
            Ok(comparisons) => comparisons,
            Err(e) => {
                log::warn!("Outcome comparison skipped: {}", e);
                Vec::new()
            }
        };

    let export = match &config.output {
        Some(path) => write_outcome(path, Exporter::save(&cleaned, path)),
        None => ExportOutcome::Skipped,
    };

    let (charts, chart_error) = match ChartBuilder::build_charts(&cleaned) {
        Ok(charts) => (charts, None),
        Err(e) => {
            log::error!("Chart specs not built: {}", e);
            (Vec::new(), Some(e.to_string()))
        }
    };

    let mut result = PipelineResult {
        raw_summary,
        cleaned,
        stats,
        comparisons,
        charts,
        chart_error,
        export,
        report_export: ExportOutcome::Skipped,
    };

    if let Some(path) = &config.report {
        result.report_export = write_outcome(path, Exporter::save_report(&result.report(), path));
    }

    Ok(result)
}

/// The cleaned dataset is named after its export, or after its source.
fn cleaned_label(raw: &Dataset, config: &PipelineConfig) -> String {
    config
        .output
        .as_deref()
        .and_then(Path::file_stem)
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| format!("{}:cleaned", raw.label()))
}

fn write_outcome(path: &Path, written: Result<(), WriteError>) -> ExportOutcome {
    match written {
        Ok(()) => ExportOutcome::Written {
            path: path.to_path_buf(),
        },
        Err(e) => {
            log::error!("{}", e);
            ExportOutcome::Failed {
                path: path.to_path_buf(),
                error: e.to_string(),
            }
        }
    }
}
