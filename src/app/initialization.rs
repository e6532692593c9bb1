//! Application initialization and configuration

use anyhow::{Context, Result};
use std::str::FromStr;
use std::sync::Arc;
use log::{debug, error, info};
use crate::{cli, config, display, logging};
use crate::loader::{DataLoader, DocumentSource, FileSource, HttpSource, SourceLayout};
use crate::presenter::OutputFormat;
use crate::semester::Semester;

pub fn load_configuration(args: &cli::Args) -> Result<config::ConfigManager> {
    let mut manager = if let Some(config_file) = &args.config_file {
        debug!("Loading configuration from explicit file: {}", config_file.display());
        config::ConfigManager::load_from_file(config_file.clone())?
    } else {
        config::ConfigManager::load()?
    };

    if let Some(section_name) = &args.config_name {
        debug!("Selecting configuration section: {}", section_name);
        manager.select_section(section_name.clone());
    }

    Ok(manager)
}

pub fn configure_logging(args: &cli::Args, config: &config::ConfigManager) -> Result<logging::LogConfig> {
    use log::LevelFilter;

    let console_level = if args.debug {
        LevelFilter::Trace
    } else if args.verbose {
        LevelFilter::Debug
    } else if args.quiet {
        LevelFilter::Error
    } else {
        match config.get_log_level("base", "console-level") {
            Ok(Some(level)) => {
                debug!("Using console log level from config: {:?}", level);
                level
            }
            Ok(None) => LevelFilter::Info,
            Err(e) => {
                debug!("Invalid console-level in config, using default: {}", e);
                LevelFilter::Info
            }
        }
    };

    debug!("Console log level set to: {:?}", console_level);

    let format = if let Some(log_format) = &args.log_format {
        logging::LogFormat::from_str(log_format)
            .map_err(|e| anyhow::anyhow!(e))?
    } else {
        match config.get_value("base", "log-format") {
            Some(format_str) => {
                debug!("Using log format from config: {}", format_str);
                logging::LogFormat::from_str(format_str)
                    .unwrap_or(logging::LogFormat::Text)
            }
            None => logging::LogFormat::Text,
        }
    };

    debug!("Log format set to: {:?}", format);

    let log_file_path = args.log_file.clone()
        .or_else(|| config.get_path("base", "log-file"));

    let file_log_level = match &args.log_file_level {
        Some(level_str) => Some(logging::parse_log_level(level_str)?),
        None => {
            match config.get_log_level("base", "file-log-level") {
                Ok(Some(level)) => {
                    debug!("Using file log level from config: {:?}", level);
                    Some(level)
                }
                Ok(None) => None,
                Err(e) => {
                    debug!("Invalid file-log-level in config, using None: {}", e);
                    None
                }
            }
        }
    };

    let (destination, file_level) = match (log_file_path.as_ref(), file_log_level) {
        (Some(file_path), Some(level)) => {
            debug!("File logging enabled: {} (level: {:?})", file_path.display(), level);
            (logging::LogDestination::Both(file_path.clone()), Some(level))
        }
        (Some(file_path), None) => {
            debug!("File logging enabled: {} (level: {:?} - same as console)", file_path.display(), console_level);
            (logging::LogDestination::Both(file_path.clone()), Some(console_level))
        }
        (None, None) => {
            debug!("Console-only logging enabled");
            (logging::LogDestination::Console, None)
        }
        (None, Some(_)) => {
            error!("Log file level specified without log file - this should have been caught during validation");
            return Err(anyhow::anyhow!("Log file level specified without log file"));
        }
    };

    Ok(logging::LogConfig {
        console_level,
        file_level,
        format,
        destination,
    })
}

/// Create a ColourManager from CLI arguments and configuration file.
///
/// Precedence: `--no-color` > `--color` > config file > terminal detection
pub fn create_colour_manager(args: &cli::Args, config: &config::ConfigManager) -> Result<display::ColourManager> {
    if args.no_color {
        return Ok(display::ColourManager::plain());
    }

    let mut colour_config = config.get_display_config()?.colour;
    if args.color {
        colour_config.enabled = true;
        colour_config.color_forced = true;
    }
    Ok(display::ColourManager::with_config(&colour_config))
}

/// Output format from `--format`, then the config file, then `table`
pub fn resolve_output_format(args: &cli::Args, config: &config::ConfigManager) -> Result<OutputFormat> {
    if let Some(format) = &args.format {
        return format.parse::<OutputFormat>().map_err(|e| anyhow::anyhow!(e));
    }
    Ok(config.get_display_config()?.format.unwrap_or_default())
}

/// Semester from `--semester`, then the config file, then the first listed term
pub fn resolve_semester(args: &cli::Args, config: &config::ConfigManager) -> Result<Semester> {
    if let Some(semester) = &args.semester {
        return Ok(semester.parse::<Semester>()?);
    }
    Ok(config.get_source_config()?.default_semester.unwrap_or_default())
}

/// Build the data loader from CLI flags with config-file fallback.
///
/// With no source configured anywhere the current directory is used.
pub fn create_loader(args: &cli::Args, config: &config::ConfigManager) -> Result<DataLoader> {
    let source_config = config.get_source_config()
        .context("Failed to read [source] configuration")?;

    let layout = match &args.layout {
        Some(layout) => layout.parse::<SourceLayout>().map_err(|e| anyhow::anyhow!(e))?,
        None => source_config.layout.unwrap_or_default(),
    };

    let source: Arc<dyn DocumentSource> = match (&args.data_dir, &args.base_url) {
        (Some(dir), _) => Arc::new(FileSource::new(dir)),
        (None, Some(url)) => Arc::new(HttpSource::new(url.as_str())?),
        (None, None) => match (source_config.data_dir, source_config.base_url) {
            (Some(dir), _) => Arc::new(FileSource::new(dir)),
            (None, Some(url)) => Arc::new(HttpSource::new(url)?),
            (None, None) => {
                debug!("No data source configured, using the current directory");
                Arc::new(FileSource::new("."))
            }
        },
    };

    let loader = DataLoader::new(source, layout);
    info!("Reading dashboard data from {}", loader.describe());
    Ok(loader)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::collections::HashMap;

    fn args(argv: &[&str]) -> cli::Args {
        let mut full = vec!["semstats"];
        full.extend_from_slice(argv);
        cli::Args::try_parse_from(full).unwrap().apply_enhanced_parsing()
    }

    fn config(section: &str, values: &[(&str, &str)]) -> config::ConfigManager {
        let mut configuration = config::Configuration::new();
        let entries: HashMap<String, String> = values
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        configuration.insert(section.to_string(), entries);
        config::ConfigManager::from_config(configuration)
    }

    #[test]
    fn test_configure_logging_from_flags() {
        let log_config = configure_logging(&args(&["-v", "--log-format", "json"]), &config("base", &[])).unwrap();
        assert_eq!(log_config.console_level, log::LevelFilter::Debug);
        assert_eq!(log_config.format, logging::LogFormat::Json);
        assert_eq!(log_config.destination, logging::LogDestination::Console);
    }

    #[test]
    fn test_configure_logging_from_config() {
        let manager = config("base", &[("console-level", "warn"), ("log-format", "json"), ("log-file", "/tmp/semstats.log")]);
        let log_config = configure_logging(&args(&[]), &manager).unwrap();
        assert_eq!(log_config.console_level, log::LevelFilter::Warn);
        assert_eq!(log_config.format, logging::LogFormat::Json);
        assert_eq!(log_config.file_level, Some(log::LevelFilter::Warn));
    }

    #[test]
    fn test_cli_log_format_overrides_config() {
        let manager = config("base", &[("log-format", "json")]);
        let log_config = configure_logging(&args(&["--log-format", "text"]), &manager).unwrap();
        assert_eq!(log_config.format, logging::LogFormat::Text);

        let log_config = configure_logging(&args(&[]), &manager).unwrap();
        assert_eq!(log_config.format, logging::LogFormat::Json);

        let log_config = configure_logging(&args(&[]), &config("base", &[])).unwrap();
        assert_eq!(log_config.format, logging::LogFormat::Text);
    }

    #[test]
    fn test_output_format_precedence() {
        let manager = config("display", &[("format", "yaml")]);
        assert_eq!(resolve_output_format(&args(&[]), &manager).unwrap(), OutputFormat::Yaml);
        assert_eq!(resolve_output_format(&args(&["-f", "json"]), &manager).unwrap(), OutputFormat::Json);
        assert_eq!(resolve_output_format(&args(&[]), &config("base", &[])).unwrap(), OutputFormat::Table);
    }

    #[test]
    fn test_semester_precedence() {
        let manager = config("source", &[("default-semester", "25 Spring")]);
        assert_eq!(resolve_semester(&args(&[]), &manager).unwrap(), Semester::Spring2025);
        assert_eq!(resolve_semester(&args(&["-s", "24spring"]), &manager).unwrap(), Semester::Spring2024);
        assert_eq!(resolve_semester(&args(&[]), &config("base", &[])).unwrap(), Semester::Spring2023);
    }

    #[test]
    fn test_loader_layout_precedence() {
        let manager = config("source", &[("layout", "per-metric"), ("data-dir", "/srv/static")]);
        assert_eq!(create_loader(&args(&[]), &manager).unwrap().layout(), SourceLayout::PerMetric);
        let loader = create_loader(&args(&["--layout", "consolidated", "-d", "fixtures"]), &manager).unwrap();
        assert_eq!(loader.layout(), SourceLayout::Consolidated);
        assert!(loader.describe().contains("fixtures"));
    }

    #[test]
    fn test_no_color_flag_wins() {
        let manager = config("display", &[("color", "true")]);
        let colours = create_colour_manager(&args(&["--no-color"]), &manager).unwrap();
        assert!(!colours.colours_enabled());
        let colours = create_colour_manager(&args(&["--color"]), &manager).unwrap();
        assert!(colours.colours_enabled());
    }
}
