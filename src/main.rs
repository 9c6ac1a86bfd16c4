//! Healthboard - run the observation pipeline once and report.

use anyhow::{Context, Result};
use clap::Parser;
use healthboard::pipeline::ExportOutcome;
use healthboard::stats::StatsEntry;
use healthboard::PipelineConfig;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "healthboard")]
#[command(about = "Clean a health observation CSV, compute statistics and chart specs")]
#[command(version)]
struct Cli {
    /// Pipeline config file (JSON)
    #[arg(long, env = "HEALTHBOARD_CONFIG")]
    config: Option<PathBuf>,

    /// Raw input CSV (overrides the config)
    #[arg(long)]
    input: Option<PathBuf>,

    /// Cleaned CSV destination (overrides the config)
    #[arg(long)]
    output: Option<PathBuf>,

    /// JSON report destination (overrides the config)
    #[arg(long)]
    report: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut logger =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.verbose {
        logger.filter_level(log::LevelFilter::Debug);
    }
    logger.init();

    let mut config = match &cli.config {
        Some(path) => PipelineConfig::from_file(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(input) = cli.input {
        config.input = input;
    }
    if let Some(output) = cli.output {
        config.output = Some(output);
    }
    if let Some(report) = cli.report {
        config.report = Some(report);
    }

    let result = healthboard::initialize(&config)
        .with_context(|| format!("pipeline failed for {}", config.input.display()))?;

    match result.export_outcome() {
        ExportOutcome::Written { path } => {
            log::info!("Data has been cleaned! See here: {}", path.display())
        }
        ExportOutcome::Failed { path, error } => {
            log::error!("Cleaned data not saved to {}: {}", path.display(), error)
        }
        ExportOutcome::Skipped => {}
    }

    for (column, entry) in result.stats().iter() {
        match entry {
            StatsEntry::Computed(s) => log::info!(
                "{:<14} mean={} median={} mode={} range={}",
                column,
                fmt_stat(s.mean),
                fmt_stat(s.median),
                fmt_stat(s.mode),
                fmt_stat(s.range)
            ),
            StatsEntry::Unavailable { reason } => log::warn!("{:<14} {}", column, reason),
        }
    }

    for comparison in result.comparisons() {
        if comparison.is_significant {
            log::info!(
                "{} differs by outcome (p = {})",
                comparison.column,
                fmt_stat(comparison.p_value)
            );
        }
    }

    for chart in result.chart_specs() {
        log::info!("Chart: {}", chart.title);
    }
    if let Some(error) = result.chart_error() {
        log::error!("Chart specs unavailable: {}", error);
    }

    if let ExportOutcome::Failed { .. } = result.export_outcome() {
        anyhow::bail!("cleaned data could not be exported");
    }
    if result.chart_error().is_some() {
        anyhow::bail!("chart specs could not be built");
    }
    Ok(())
}

fn fmt_stat(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{:.3}", v))
}
