//! Chart Specification Module
//! Declarative chart descriptions; nothing here renders.

use serde::Serialize;
use std::collections::BTreeMap;

/// Qualitative "Set1" colors.
pub const SET1: [&str; 9] = [
    "#e41a1c", // Red
    "#377eb8", // Blue
    "#4daf4a", // Green
    "#984ea3", // Purple
    "#ff7f00", // Orange
    "#ffff33", // Yellow
    "#a65628", // Brown
    "#f781bf", // Pink
    "#999999", // Grey
];

/// Qualitative "Set2" colors.
pub const SET2: [&str; 8] = [
    "#66c2a5", "#fc8d62", "#8da0cb", "#e78ac3", "#a6d854", "#ffd92f", "#e5c494", "#b3b3b3",
];

/// Qualitative "Set3" colors.
pub const SET3: [&str; 12] = [
    "#8dd3c7", "#ffffb3", "#bebada", "#fb8072", "#80b1d3", "#fdb462", "#b3de69", "#fccde5",
    "#d9d9d9", "#bc80bd", "#ccebc5", "#ffed6f",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    /// Distribution of a numeric field per category.
    Box,
    Scatter,
    /// Frequency distribution with a fixed bin count.
    Histogram,
    /// Individual points per category.
    Strip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BarMode {
    Overlay,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Palette {
    Set1,
    Set2,
    Set3,
}

impl Palette {
    pub fn colors(self) -> &'static [&'static str] {
        match self {
            Palette::Set1 => &SET1,
            Palette::Set2 => &SET2,
            Palette::Set3 => &SET3,
        }
    }

    /// Color for the `index`-th group, cycling through the palette.
    pub fn color_for(self, index: usize) -> &'static str {
        let colors = self.colors();
        colors[index % colors.len()]
    }
}

/// One chart, described by the fields it plots and how it is styled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    /// Label of the dataset the chart is drawn from.
    pub dataset: String,
    pub chart_type: ChartKind,
    pub x_field: String,
    pub y_field: Option<String>,
    pub group_field: String,
    pub title: String,
    pub axis_labels: BTreeMap<String, String>,
    pub color_palette: Palette,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bins: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bar_mode: Option<BarMode>,
}

impl ChartSpec {
    /// Every dataset field the chart reads.
    pub fn fields(&self) -> Vec<&str> {
        let mut fields = vec![self.x_field.as_str()];
        if let Some(y) = &self.y_field {
            fields.push(y);
        }
        if !fields.contains(&self.group_field.as_str()) {
            fields.push(&self.group_field);
        }
        fields
    }

    /// Axis label for `field`, falling back to the field name.
    pub fn label_for<'a>(&'a self, field: &'a str) -> &'a str {
        self.axis_labels
            .get(field)
            .map(String::as_str)
            .unwrap_or(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scatter() -> ChartSpec {
        ChartSpec {
            dataset: "cleandata".to_string(),
            chart_type: ChartKind::Scatter,
            x_field: "Age".to_string(),
            y_field: Some("BMI".to_string()),
            group_field: "Outcome".to_string(),
            title: "Age vs BMI by Outcome".to_string(),
            axis_labels: BTreeMap::from([("BMI".to_string(), "Body Mass Index".to_string())]),
            color_palette: Palette::Set1,
            bins: None,
            bar_mode: None,
        }
    }

    #[test]
    fn fields_list_each_column_once() {
        let mut spec = scatter();
        assert_eq!(spec.fields(), vec!["Age", "BMI", "Outcome"]);

        spec.x_field = "Outcome".to_string();
        assert_eq!(spec.fields(), vec!["Outcome", "BMI"]);
    }

    #[test]
    fn labels_fall_back_to_field_name() {
        let spec = scatter();
        assert_eq!(spec.label_for("BMI"), "Body Mass Index");
        assert_eq!(spec.label_for("Age"), "Age");
    }

    #[test]
    fn palettes_cycle() {
        assert_eq!(Palette::Set1.color_for(0), "#e41a1c");
        assert_eq!(Palette::Set2.color_for(8), "#66c2a5");
        assert_eq!(Palette::Set3.colors().len(), 12);
    }

    #[test]
    fn optional_options_are_omitted_from_json() {
        let json = serde_json::to_value(scatter()).unwrap();
        assert_eq!(json["chart_type"], "scatter");
        assert_eq!(json["color_palette"], "Set1");
        assert!(json.get("bins").is_none());
    }
}
