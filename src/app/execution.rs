//! Application execution

use anyhow::{Context, Result};
use std::io::Write;
use log::{debug, info};
use crate::{cli, config, display};
use crate::metrics::MetricRegistry;
use crate::pipeline::Dashboard;
use crate::presenter::{render_panels, OutputFormat};
use crate::semester::Semester;
use super::initialization::{create_colour_manager, create_loader, resolve_output_format, resolve_semester};

/// Registry listing for `--list-metrics`
pub fn format_metric_list(registry: &MetricRegistry, colours: &display::ColourManager) -> String {
    let rows: Vec<Vec<String>> = registry
        .panels()
        .iter()
        .map(|panel| {
            vec![
                panel.id.to_string(),
                panel.presentation.title.to_string(),
                panel.source.key.to_string(),
            ]
        })
        .collect();

    format!(
        "{}\n{}",
        colours.header("Available metrics:"),
        crate::presenter::export::format_compact_table(&["Metric", "Title", "Source"], &rows)
    )
}

/// Semester listing for `--list-semesters`
pub fn format_semester_list(colours: &display::ColourManager) -> String {
    let mut output = format!("{}\n", colours.header("Available semesters:"));
    for semester in Semester::all() {
        let range = semester.date_range();
        output.push_str(&format!(
            "  {}  ({} to {})\n",
            colours.value(semester.display_name()),
            range.start,
            range.end
        ));
    }
    output
}

/// Load the selected semester and render the selected panels
pub async fn run_dashboard(args: &cli::Args, config: &config::ConfigManager) -> Result<String> {
    let registry = MetricRegistry::builtin();
    let colours = create_colour_manager(args, config)?;

    if args.is_listing() {
        let mut output = String::new();
        if args.list_metrics {
            output.push_str(&format_metric_list(&registry, &colours));
        }
        if args.list_semesters {
            output.push_str(&format_semester_list(&colours));
        }
        return Ok(output);
    }

    let panels = registry.select(args.metrics.as_slice())?;
    let semester = resolve_semester(args, config)?;
    let format = resolve_output_format(args, config)?;
    let loader = create_loader(args, config)?;
    debug!("Rendering {} panels as {:?}", panels.len(), format);

    let dashboard = Dashboard::new(loader, panels);
    let views = dashboard.load_semester(semester).await;

    let ready = views.iter().filter(|v| v.state.is_ready()).count();
    info!("{} of {} panels have data for {}", ready, views.len(), semester);

    let mut output = String::new();
    if format == OutputFormat::Table {
        output.push_str(&format!("{}\n\n", colours.header(&format!("Semester: {}", semester))));
    }
    output.push_str(&render_panels(&views, format, &colours).context("Failed to render panels")?);
    Ok(output)
}

/// Run the dashboard and write its output to stdout
pub async fn run(args: cli::Args, config: config::ConfigManager) -> Result<()> {
    let output = run_dashboard(&args, &config).await?;
    let mut stdout = std::io::stdout().lock();
    stdout.write_all(output.as_bytes()).context("Failed to write output")?;
    stdout.flush().context("Failed to flush output")?;
    Ok(())
}
