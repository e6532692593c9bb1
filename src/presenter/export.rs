//! Export of panel snapshots
//!
//! JSON and YAML carry the full chart specification for an external renderer.
//! CSV flattens every point to one row. `table` and `summary` are for humans.

use prettytable::{format, Cell, Row as TableRow, Table};
use thiserror::Error;
use crate::display::{ColourManager, CompactFormat};
use super::{PanelState, PanelView};
use super::chart::format_value;

/// Errors raised while serialising panels
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Yaml,
    Csv,
    Table,
    Summary,
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Table
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            "csv" => Ok(OutputFormat::Csv),
            "table" => Ok(OutputFormat::Table),
            "summary" => Ok(OutputFormat::Summary),
            _ => Err(format!(
                "Invalid output format: {}. Valid options: json, yaml, csv, table, summary",
                s
            )),
        }
    }
}

/// Render panels in the requested format
pub fn render_panels(
    panels: &[PanelView],
    output: OutputFormat,
    colours: &ColourManager,
) -> Result<String, ExportError> {
    match output {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(panels)? + "\n"),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(panels)?),
        OutputFormat::Csv => Ok(export_csv(panels)),
        OutputFormat::Table => Ok(export_table(panels, colours)),
        OutputFormat::Summary => Ok(panels
            .iter()
            .map(|panel| panel.to_compact_format() + "\n")
            .collect()),
    }
}

fn export_csv(panels: &[PanelView]) -> String {
    let mut csv = String::from("panel,semester,index,label,value,point_label\n");

    for view in panels {
        let Some(chart) = view.state.chart() else {
            continue;
        };
        let labels = chart.data.labels();
        let values = chart.data.values();
        let point_labels = chart.point_labels();
        for (index, ((label, value), point_label)) in labels.iter().zip(values.iter()).zip(point_labels).enumerate() {
            let point_label = point_label.unwrap_or_default();
            csv.push_str(&format!(
                "{},{},{},{},{},{}\n",
                escape_csv(&view.panel),
                escape_csv(chart.semester.display_name()),
                index,
                escape_csv(label),
                value,
                escape_csv(&point_label),
            ));
        }
    }

    csv
}

fn escape_csv(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn export_table(panels: &[PanelView], colours: &ColourManager) -> String {
    let mut output = String::new();

    for view in panels {
        output.push_str(&format!("{}\n", colours.title(&view.title)));
        match &view.state {
            PanelState::Loading => {
                output.push_str(&format!("  {}\n\n", colours.muted("Loading...")));
            }
            PanelState::NoData => {
                output.push_str(&format!("  {}\n\n", colours.muted("No data available")));
            }
            PanelState::Ready(chart) => {
                let labels = chart.data.labels();
                let values = chart.data.values();
                let rows: Vec<Vec<String>> = labels
                    .into_iter()
                    .zip(values)
                    .zip(chart.point_labels())
                    .map(|((label, value), point_label)| {
                        vec![label, format_value(value), point_label.unwrap_or_default()]
                    })
                    .collect();

                let x_header = chart.x_axis.as_ref().map(|a| a.label.as_str()).unwrap_or("Name");
                let y_header = chart.y_axis.as_ref().map(|a| a.label.as_str()).unwrap_or("Value");
                output.push_str(&format_compact_table(&[x_header, y_header, "Label"], &rows));

                if let Some(line) = &chart.reference_line {
                    output.push_str(&format!("  {}\n", colours.overlay(&line.label)));
                }
                output.push('\n');
            }
        }
    }

    output
}

/// Format a compact table with headers and rows using prettytable-rs clean format
pub fn format_compact_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    if rows.is_empty() {
        return String::new();
    }

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_CLEAN);
    table.add_row(TableRow::new(headers.iter().map(|h| Cell::new(h)).collect()));
    for row in rows {
        table.add_row(TableRow::new(row.iter().map(|c| Cell::new(c)).collect()));
    }

    let mut result = String::new();
    for line in table.to_string().lines() {
        result.push_str("  ");
        result.push_str(line);
        result.push('\n');
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presenter::{ChartKind, ChartSpec, LabelPolicy, ReferenceLine, schema_version};
    use crate::semester::Semester;
    use crate::transform::{ChartData, Row};

    fn ready_panel() -> PanelView {
        PanelView {
            panel: "commit_count_per_repo".to_string(),
            title: "Commit Count per Repo".to_string(),
            state: PanelState::Ready(Box::new(ChartSpec {
                schema_version: schema_version(),
                panel: "commit_count_per_repo".to_string(),
                title: "Commit Count per Repo".to_string(),
                semester: Semester::Spring2023,
                kind: ChartKind::Bar,
                x_axis: None,
                y_axis: None,
                y_domain: None,
                data: ChartData::Bars(vec![Row::new("team, one", 12.0), Row::new("team2", 4.0)]),
                reference_line: Some(ReferenceLine { value: 8.0, label: "Average Commit Count: 8.00".to_string() }),
                highlights: Vec::new(),
                labels: LabelPolicy::Value,
            })),
        }
    }

    fn empty_panel() -> PanelView {
        PanelView {
            panel: "language_distribution".to_string(),
            title: "Programming Language Distribution".to_string(),
            state: PanelState::NoData,
        }
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("YML".parse::<OutputFormat>().unwrap(), OutputFormat::Yaml);
        assert_eq!("csv".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
        assert_eq!("Table".parse::<OutputFormat>().unwrap(), OutputFormat::Table);
        assert_eq!("summary".parse::<OutputFormat>().unwrap(), OutputFormat::Summary);
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_csv_export_escapes_and_skips_empty_panels() {
        let csv = render_panels(&[ready_panel(), empty_panel()], OutputFormat::Csv, &ColourManager::plain()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "panel,semester,index,label,value,point_label");
        assert_eq!(lines[1], "commit_count_per_repo,23 Spring,0,\"team, one\",12,12");
        assert_eq!(lines[2], "commit_count_per_repo,23 Spring,1,team2,4,4");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_table_export() {
        let table = render_panels(&[ready_panel(), empty_panel()], OutputFormat::Table, &ColourManager::plain()).unwrap();
        assert!(table.contains("Commit Count per Repo"));
        assert!(table.contains("team2"));
        assert!(table.contains("Average Commit Count: 8.00"));
        assert!(table.contains("No data available"));
    }

    #[test]
    fn test_json_export_round_trips() {
        let panels = vec![ready_panel(), empty_panel()];
        let json = render_panels(&panels, OutputFormat::Json, &ColourManager::plain()).unwrap();
        let parsed: Vec<PanelView> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, panels);
    }

    #[test]
    fn test_yaml_export() {
        let yaml = render_panels(&[empty_panel()], OutputFormat::Yaml, &ColourManager::plain()).unwrap();
        assert!(yaml.contains("language_distribution"));
        assert!(yaml.contains("no_data"));
    }

    #[test]
    fn test_summary_export() {
        let summary = render_panels(&[ready_panel(), empty_panel()], OutputFormat::Summary, &ColourManager::plain()).unwrap();
        let lines: Vec<&str> = summary.lines().collect();
        assert_eq!(
            lines[0],
            "commit_count_per_repo (Commit Count per Repo): 2 bar points | Average Commit Count: 8.00"
        );
        assert_eq!(lines[1], "language_distribution (Programming Language Distribution): no data");
    }

    #[test]
    fn test_format_compact_table_empty() {
        assert!(format_compact_table(&["a"], &[]).is_empty());
    }
}
