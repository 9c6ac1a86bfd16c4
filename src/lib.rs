//! Healthboard - health observation cleaning, statistics & chart specs
//!
//! Loads a diabetes observation CSV, cleans it, computes per-column
//! statistics and derives the outcome chart set a web front end embeds.

pub mod charts;
pub mod config;
pub mod data;
pub mod pipeline;
pub mod stats;

pub use config::PipelineConfig;
pub use pipeline::{initialize, PipelineError, PipelineResult};
