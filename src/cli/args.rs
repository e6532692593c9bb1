use clap::{Parser, ArgAction};
use anyhow::Result;
use std::path::PathBuf;
use log::{debug, info};
use crate::loader::SourceLayout;
use crate::presenter::OutputFormat;
use crate::semester::Semester;

/// Course analytics chart-data pipeline
#[derive(Parser, Debug)]
#[command(name = "semstats")]
#[command(about = "Turns per-semester repository activity summaries into chart specifications for the course analytics dashboard")]
#[command(version)]
pub struct Args {
    /// Directory containing chart_data.json or output/<semester>/ files
    #[arg(short = 'd', long = "data-dir", value_name = "PATH")]
    pub data_dir: Option<PathBuf>,

    /// Base URL the dashboard data is served from
    #[arg(short = 'u', long = "base-url", value_name = "URL")]
    pub base_url: Option<String>,

    /// Document layout: consolidated or per-metric
    #[arg(long, value_name = "LAYOUT")]
    pub layout: Option<String>,

    /// Semester to load, e.g. "23 Spring" or 23spring
    #[arg(short = 's', long = "semester", value_name = "SEMESTER")]
    pub semester: Option<String>,

    /// Panels to render (repeatable, comma-separated); defaults to all
    #[arg(short = 'm', long = "metric", value_name = "METRIC", action = ArgAction::Append)]
    pub metrics: Vec<String>,

    /// Output format: json, yaml, csv, table or summary
    #[arg(short = 'f', long = "format", value_name = "FORMAT")]
    pub format: Option<String>,

    /// List the available panels and exit
    #[arg(long)]
    pub list_metrics: bool,

    /// List the selectable semesters and exit
    #[arg(long)]
    pub list_semesters: bool,

    /// Disable coloured output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Force coloured output even when stdout is not a terminal
    #[arg(long = "color", conflicts_with = "no_color")]
    pub color: bool,

    /// Verbose output (debug level logging)
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet output (error level logging only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Debug output (trace level logging)
    #[arg(long)]
    pub debug: bool,

    /// Log format: text or json [default: text, or the config file's log-format]
    #[arg(long, value_name = "FORMAT")]
    pub log_format: Option<String>,

    /// Log file path for file output
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Log level for file output (independent of console level)
    #[arg(long, value_name = "LEVEL")]
    pub log_file_level: Option<String>,

    /// Configuration file path
    #[arg(long, value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Configuration section name
    #[arg(long, value_name = "SECTION")]
    pub config_name: Option<String>,
}

impl Args {
    /// Split comma-separated `--metric` values into individual entries
    pub fn apply_enhanced_parsing(mut self) -> Self {
        self.metrics = split_list(self.metrics);
        self
    }

    /// `true` when the run only lists registry contents
    pub fn is_listing(&self) -> bool {
        self.list_metrics || self.list_semesters
    }
}

fn split_list(values: Vec<String>) -> Vec<String> {
    values
        .iter()
        .flat_map(|value| value.split(','))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse command line arguments
pub fn parse_args() -> Args {
    debug!("Parsing command line arguments");
    let args = Args::parse().apply_enhanced_parsing();
    debug!("Parsed CLI arguments with enhanced parsing: {:?}", args);
    args
}

/// Validate CLI argument combinations
pub fn validate_args(args: &Args) -> Result<()> {
    debug!("Validating CLI argument combinations");

    let log_flags_count = [args.verbose, args.quiet, args.debug]
        .iter()
        .filter(|&&flag| flag)
        .count();

    if log_flags_count > 1 {
        return Err(anyhow::anyhow!(
            "Conflicting log level flags: only one of --verbose, --quiet, or --debug may be specified"
        ));
    }

    if let Some(ref log_format) = args.log_format {
        match log_format.to_lowercase().as_str() {
            "text" | "json" => {},
            _ => return Err(anyhow::anyhow!(
                "Invalid log format '{}'. Valid options: text, json", log_format
            )),
        }
    }

    if let Some(ref level) = args.log_file_level {
        match level.to_lowercase().as_str() {
            "error" | "warn" | "info" | "debug" | "trace" => {},
            _ => return Err(anyhow::anyhow!(
                "Invalid log file level '{}'. Valid levels: error, warn, info, debug, trace", level
            )),
        }
    }

    if args.log_file_level.is_some() && args.log_file.is_none() {
        return Err(anyhow::anyhow!(
            "--log-file-level requires --log-file to be specified"
        ));
    }

    if args.data_dir.is_some() && args.base_url.is_some() {
        return Err(anyhow::anyhow!(
            "Conflicting sources: only one of --data-dir or --base-url may be specified"
        ));
    }

    if let Some(ref url) = args.base_url {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(anyhow::anyhow!(
                "Invalid base URL '{}'. Expected an http:// or https:// URL", url
            ));
        }
    }

    if let Some(ref layout) = args.layout {
        layout.parse::<SourceLayout>().map_err(|e| anyhow::anyhow!(e))?;
    }

    if let Some(ref format) = args.format {
        format.parse::<OutputFormat>().map_err(|e| anyhow::anyhow!(e))?;
    }

    if let Some(ref semester) = args.semester {
        semester.parse::<Semester>()?;
    }

    info!("CLI arguments validated successfully");
    Ok(())
}
