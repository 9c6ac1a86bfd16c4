//! Chart Builder Module
//! Derives the fixed outcome chart set from a cleaned dataset.

use super::spec::{BarMode, ChartKind, ChartSpec, Palette};
use crate::data::{Dataset, SchemaError};
use std::collections::BTreeMap;

/// Binary label every chart is grouped and colored by.
pub const OUTCOME_FIELD: &str = "Outcome";

/// Bin count of the blood pressure histogram.
pub const HISTOGRAM_BINS: u32 = 20;

struct ChartTemplate {
    kind: ChartKind,
    x: &'static str,
    y: Option<&'static str>,
    title: &'static str,
    labels: &'static [(&'static str, &'static str)],
    palette: Palette,
}

const TEMPLATES: [ChartTemplate; 5] = [
    ChartTemplate {
        kind: ChartKind::Box,
        x: OUTCOME_FIELD,
        y: Some("Glucose"),
        title: "Glucose Level Distribution by Outcome",
        labels: &[("Glucose", "Glucose Levels"), (OUTCOME_FIELD, "Type of Case")],
        palette: Palette::Set1,
    },
    ChartTemplate {
        kind: ChartKind::Scatter,
        x: "Age",
        y: Some("BMI"),
        title: "Age vs BMI by Outcome",
        labels: &[("Age", "Age"), ("BMI", "BMI")],
        palette: Palette::Set1,
    },
    ChartTemplate {
        kind: ChartKind::Histogram,
        x: "BP",
        y: None,
        title: "Blood Pressure Distribution by Outcome",
        labels: &[("BP", "Blood Pressure")],
        palette: Palette::Set2,
    },
    ChartTemplate {
        kind: ChartKind::Scatter,
        x: "SkinThickness",
        y: Some("Insulin"),
        title: "Skin Thickness vs Insulin by Outcome",
        labels: &[("SkinThickness", "SkinThickness"), ("Insulin", "Insulin Levels")],
        palette: Palette::Set3,
    },
    ChartTemplate {
        kind: ChartKind::Strip,
        x: OUTCOME_FIELD,
        y: Some("Pregnancies"),
        title: "Pregnancies by Outcome",
        labels: &[
            ("Pregnancies", "Number of Pregnancies"),
            (OUTCOME_FIELD, "Type of Case"),
        ],
        palette: Palette::Set1,
    },
];

/// Creates chart specifications for the presentation layer.
pub struct ChartBuilder;

impl ChartBuilder {
    /// Build the five outcome charts, in display order.
    ///
    /// Fails if the dataset lacks any field a chart reads.
    pub fn build_charts(dataset: &Dataset) -> Result<Vec<ChartSpec>, SchemaError> {
        let charts: Vec<ChartSpec> = TEMPLATES
            .iter()
            .map(|template| Self::from_template(dataset, template))
            .collect();

        for chart in &charts {
            if let Some(missing) = chart.fields().into_iter().find(|f| !dataset.has_column(f)) {
                return Err(SchemaError::MissingColumn(missing.to_string()));
            }
        }

        log::info!("Built {} chart specs for '{}'", charts.len(), dataset.label());
        Ok(charts)
    }

    fn from_template(dataset: &Dataset, template: &ChartTemplate) -> ChartSpec {
        let axis_labels: BTreeMap<String, String> = template
            .labels
            .iter()
            .map(|(field, label)| (field.to_string(), label.to_string()))
            .collect();

        let (bins, bar_mode) = match template.kind {
            ChartKind::Histogram => (Some(HISTOGRAM_BINS), Some(BarMode::Overlay)),
            _ => (None, None),
        };

        ChartSpec {
            dataset: dataset.label().to_string(),
            chart_type: template.kind,
            x_field: template.x.to_string(),
            y_field: template.y.map(str::to_string),
            group_field: OUTCOME_FIELD.to_string(),
            title: template.title.to_string(),
            axis_labels,
            color_palette: template.palette,
            bins,
            bar_mode,
        }
    }
}
