//! Chart specifications handed to the rendering surface

use serde::{Deserialize, Serialize};
use crate::semester::Semester;
use crate::transform::{ChartData, fractions};

include!(concat!(env!("OUT_DIR"), "/schema_version.rs"));

/// Schema version stamped into every exported chart
pub fn schema_version() -> i64 {
    CHART_SCHEMA_VERSION
}

/// Visual family of a chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Line,
    Pie,
}

/// Axis title and the row field it plots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    pub label: String,
    pub data_key: String,
}

/// Constant overlay line, e.g. the average
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceLine {
    pub value: f64,
    pub label: String,
}

/// Which points get a text label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelPolicy {
    /// No point labels
    None,
    /// Every point shows its raw value
    Value,
    /// Every slice shows `"name: 12.3%"`
    Percent,
    /// Only highlighted points show their value; zero-valued highlights can be suppressed
    Highlighted { skip_zero: bool },
}

/// Fully transformed chart, ready for a charting surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub schema_version: i64,
    pub panel: String,
    pub title: String,
    pub semester: Semester,
    pub kind: ChartKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_axis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_axis: Option<Axis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_domain: Option<(f64, f64)>,
    pub data: ChartData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_line: Option<ReferenceLine>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub highlights: Vec<usize>,
    pub labels: LabelPolicy,
}

impl ChartSpec {
    /// Label for the point at `index`, as the surface should draw it
    pub fn label_for(&self, index: usize) -> Option<String> {
        self.point_labels().into_iter().nth(index).flatten()
    }

    /// Labels for every point, `None` where nothing is drawn
    pub fn point_labels(&self) -> Vec<Option<String>> {
        let values = self.data.values();
        match self.labels {
            LabelPolicy::None => vec![None; values.len()],
            LabelPolicy::Value => values.iter().map(|v| Some(format_value(*v))).collect(),
            LabelPolicy::Percent => {
                let fractions = percent_fractions(&self.data);
                self.data
                    .labels()
                    .into_iter()
                    .enumerate()
                    .map(|(index, name)| {
                        let fraction = fractions.get(index).copied().unwrap_or(0.0);
                        Some(format!("{}: {:.1}%", name, fraction * 100.0))
                    })
                    .collect()
            }
            LabelPolicy::Highlighted { skip_zero } => values
                .iter()
                .enumerate()
                .map(|(index, value)| {
                    if !self.highlights.contains(&index) || (skip_zero && *value == 0.0) {
                        None
                    } else {
                        Some(format_value(*value))
                    }
                })
                .collect(),
        }
    }
}

/// Y-axis domain padded 20% above the largest value
pub fn padded_domain(values: &[f64]) -> (f64, f64) {
    let max = values.iter().copied().fold(0.0_f64, f64::max);
    (0.0, (max * 1.2).ceil())
}

fn percent_fractions(data: &ChartData) -> Vec<f64> {
    match data {
        ChartData::Shares(shares) => fractions(shares),
        other => {
            let values = other.values();
            let total: f64 = values.iter().sum();
            values
                .iter()
                .map(|v| if total == 0.0 { 0.0 } else { v / total })
                .collect()
        }
    }
}

/// Integers print without a fractional part, everything else with two decimals
pub fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}
