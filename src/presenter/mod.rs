//! Presenter stage
//!
//! Packages transformed data into a `ChartSpec`: chart kind, axes, overlay
//! line, highlighted points and label policy. Drawing is left to whatever
//! charting surface consumes the spec; the exporters in `export` cover the
//! command line.

pub mod chart;
pub mod export;

pub use chart::{ChartSpec, ChartKind, Axis, ReferenceLine, LabelPolicy, padded_domain, format_value, schema_version};
pub use export::{OutputFormat, ExportError, render_panels};

use serde::{Deserialize, Serialize};
use crate::dataset::MetricDataset;
use crate::display::CompactFormat;
use crate::display::format::single_line;
use crate::transform::{ChartData, find_extrema};

/// Per-panel display state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", content = "chart", rename_all = "snake_case")]
pub enum PanelState {
    /// A fetch for the current selection is outstanding
    Loading,
    /// Loading failed or the transform produced nothing to draw
    NoData,
    Ready(Box<ChartSpec>),
}

impl PanelState {
    pub fn is_ready(&self) -> bool {
        matches!(self, PanelState::Ready(_))
    }

    pub fn chart(&self) -> Option<&ChartSpec> {
        match self {
            PanelState::Ready(chart) => Some(chart.as_ref()),
            _ => None,
        }
    }
}

/// Snapshot of one panel as the dashboard shows it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanelView {
    pub panel: String,
    pub title: String,
    pub state: PanelState,
}

impl CompactFormat for PanelView {
    fn to_compact_format(&self) -> String {
        let detail = match &self.state {
            PanelState::Loading => "loading".to_string(),
            PanelState::NoData => "no data".to_string(),
            PanelState::Ready(chart) => {
                let mut detail = format!("{} {} points", chart.data.len(), kind_name(chart.kind));
                if let Some(line) = &chart.reference_line {
                    detail.push_str(&format!(" | {}", single_line(&line.label)));
                }
                detail
            }
        };
        format!("{} ({}): {}", self.panel, single_line(&self.title), detail)
    }
}

fn kind_name(kind: ChartKind) -> &'static str {
    match kind {
        ChartKind::Bar => "bar",
        ChartKind::Line => "line",
        ChartKind::Pie => "pie",
    }
}

/// Which points of a line chart are emphasised
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Highlight {
    None,
    Max,
    MaxAndMin,
}

/// Overlay drawn from the dataset's precomputed average
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AverageOverlay {
    /// Text before the formatted average, e.g. `"Average Commit Count"`
    pub caption: &'static str,
    pub decimals: usize,
}

/// Static presentation settings for one panel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Presentation {
    pub title: &'static str,
    pub kind: ChartKind,
    /// `(label, data key)` for each axis; pie charts have none
    pub x_axis: Option<(&'static str, &'static str)>,
    pub y_axis: Option<(&'static str, &'static str)>,
    pub average: Option<AverageOverlay>,
    pub highlight: Highlight,
    pub labels: LabelPolicy,
    /// Pad the y-axis 20% above the largest value
    pub pad_y_axis: bool,
}

/// Build the display state for a panel from its transformed data.
///
/// Empty data always yields `NoData`, never an empty chart.
pub fn present(
    panel: &str,
    presentation: &Presentation,
    dataset: &MetricDataset,
    data: ChartData,
) -> PanelState {
    if data.is_empty() {
        return PanelState::NoData;
    }

    let values = data.values();
    let extrema = find_extrema(&values);
    let highlights = match presentation.highlight {
        Highlight::None => Vec::new(),
        Highlight::Max => extrema.indices(false),
        Highlight::MaxAndMin => extrema.indices(true),
    };

    let reference_line = presentation.average.and_then(|overlay| {
        dataset.average.map(|average| ReferenceLine {
            value: average,
            label: format!("{}: {:.*}", overlay.caption, overlay.decimals, average),
        })
    });

    let axis = |axis: Option<(&str, &str)>| {
        axis.map(|(label, data_key)| Axis {
            label: label.to_string(),
            data_key: data_key.to_string(),
        })
    };

    PanelState::Ready(Box::new(ChartSpec {
        schema_version: schema_version(),
        panel: panel.to_string(),
        title: presentation.title.to_string(),
        semester: dataset.semester,
        kind: presentation.kind,
        x_axis: axis(presentation.x_axis),
        y_axis: axis(presentation.y_axis),
        y_domain: presentation.pad_y_axis.then(|| padded_domain(&values)),
        data,
        reference_line,
        highlights,
        labels: presentation.labels,
    }))
}
