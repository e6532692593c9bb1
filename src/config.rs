//! Configuration file handling
//!
//! TOML files are flattened into `section -> key -> value` strings. Lookups
//! fall back from the `--config-name` section to the requested section and
//! finally to `[base]`.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::PathBuf;
use anyhow::{Context, Result};
use toml::Value;
use log::{debug, info};
use crate::display::{ColourConfig, ColourTheme};
use crate::loader::SourceLayout;
use crate::presenter::OutputFormat;
use crate::semester::Semester;

/// Configuration storage - section_name -> key -> value
pub type Configuration = HashMap<String, HashMap<String, String>>;

/// Configuration manager
pub struct ConfigManager {
    config: Configuration,
    config_file_path: Option<PathBuf>,
    selected_section: Option<String>,
}

impl ConfigManager {
    /// Create a new ConfigManager from a Configuration (primarily for testing)
    pub fn from_config(config: Configuration) -> Self {
        Self {
            config,
            config_file_path: None,
            selected_section: None,
        }
    }
    /// Load configuration using discovery hierarchy
    pub fn load() -> Result<Self> {
        debug!("Starting configuration discovery");
        
        // Try discovery hierarchy
        let config_paths = discover_config_files()?;
        
        for path in config_paths {
            debug!("Attempting to load config from: {}", path.display());
            if path.exists() {
                info!("Loading configuration from: {}", path.display());
                return Self::load_from_file(path);
            }
        }
        
        info!("No configuration file found, using empty configuration");
        Ok(Self {
            config: Configuration::new(),
            config_file_path: None,
            selected_section: None,
        })
    }
    
    /// Load configuration from explicit file path
    pub fn load_from_file(path: PathBuf) -> Result<Self> {
        debug!("Loading configuration from file: {}", path.display());
        
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        
        let config = parse_toml_config(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        
        info!("Successfully loaded configuration from: {}", path.display());
        Ok(Self {
            config,
            config_file_path: Some(path),
            selected_section: None,
        })
    }
    
    /// Get value from configuration with section fallback
    pub fn get_value(&self, section: &str, key: &str) -> Option<&String> {
        // Priority: selected_section -> specified section -> base
        if let Some(selected) = &self.selected_section {
            if let Some(value) = self.config.get(selected).and_then(|s| s.get(key)) {
                return Some(value);
            }
        }
        
        if let Some(value) = self.config.get(section).and_then(|s| s.get(key)) {
            return Some(value);
        }
        
        self.config.get("base").and_then(|s| s.get(key))
    }
    
    /// Path of the file the configuration was loaded from, if any
    pub fn config_file_path(&self) -> Option<&std::path::Path> {
        self.config_file_path.as_deref()
    }

    /// Select configuration section for --config-name
    pub fn select_section(&mut self, section: String) {
        debug!("Selecting configuration section: {}", section);
        self.selected_section = Some(section);
    }
    
    /// Get boolean value with type conversion
    pub fn get_bool(&self, section: &str, key: &str) -> Result<Option<bool>> {
        match self.get_value(section, key) {
            Some(value) => match value.to_lowercase().as_str() {
                "true" => Ok(Some(true)),
                "false" => Ok(Some(false)),
                _ => Err(anyhow::anyhow!("Invalid boolean value for {}.{}: {}", section, key, value)),
            },
            None => Ok(None),
        }
    }
    
    /// Get log level value with type conversion
    pub fn get_log_level(&self, section: &str, key: &str) -> Result<Option<log::LevelFilter>> {
        match self.get_value(section, key) {
            Some(value) => Ok(Some(crate::logging::parse_log_level(value)?)),
            None => Ok(None),
        }
    }
    
    /// Get path value with type conversion
    pub fn get_path(&self, section: &str, key: &str) -> Option<PathBuf> {
        self.get_value(section, key).map(PathBuf::from)
    }
    
    /// Get data source settings from the `[source]` section
    pub fn get_source_config(&self) -> Result<SourceConfig> {
        let mut config = SourceConfig {
            data_dir: self.get_path("source", "data-dir"),
            base_url: self.get_value("source", "base-url").cloned(),
            ..SourceConfig::default()
        };

        if let Some(layout) = self.get_value("source", "layout") {
            let layout = layout.parse::<SourceLayout>()
                .map_err(|e| anyhow::anyhow!(e))
                .with_context(|| format!("Invalid layout value in config: {}", layout))?;
            config.layout = Some(layout);
        }

        if let Some(semester) = self.get_value("source", "default-semester") {
            let semester = semester.parse::<Semester>()
                .with_context(|| format!("Invalid default-semester value in config: {}", semester))?;
            config.default_semester = Some(semester);
        }

        if config.data_dir.is_some() && config.base_url.is_some() {
            anyhow::bail!("Config sets both source.data-dir and source.base-url; choose one");
        }

        Ok(config)
    }

    /// Get output settings from the `[display]` section
    pub fn get_display_config(&self) -> Result<DisplayConfig> {
        let mut config = DisplayConfig::default();

        if let Some(format) = self.get_value("display", "format") {
            let format = format.parse::<OutputFormat>()
                .map_err(|e| anyhow::anyhow!(e))
                .with_context(|| format!("Invalid format value in config: {}", format))?;
            config.format = Some(format);
        }

        if let Some(enabled) = self.get_bool("display", "color")? {
            config.colour.enabled = enabled;
        }

        if let Some(theme) = self.get_value("display", "theme") {
            config.colour.theme = theme.parse::<ColourTheme>()
                .map_err(|e| anyhow::anyhow!(e))?;
        }

        Ok(config)
    }
}

/// Data source settings read from the config file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceConfig {
    pub data_dir: Option<PathBuf>,
    pub base_url: Option<String>,
    pub layout: Option<SourceLayout>,
    pub default_semester: Option<Semester>,
}

/// Output settings read from the config file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayConfig {
    pub format: Option<OutputFormat>,
    pub colour: ColourConfig,
}

/// Discover configuration files in order of precedence
fn discover_config_files() -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    
    // 1. Environment variable $SEMSTATS_CONFIG
    if let Ok(env_path) = env::var("SEMSTATS_CONFIG") {
        paths.push(PathBuf::from(env_path));
    }
    
    // 2. XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("semstats").join("config.toml"));
    }
    
    // 3. Home directory
    if let Some(home_dir) = dirs::home_dir() {
        paths.push(home_dir.join(".semstats.toml"));
    }
    
    // 4. Project local
    paths.push(PathBuf::from("./.semstats.toml"));
    
    debug!("Config discovery paths: {:?}", paths);
    Ok(paths)
}

/// Parse TOML content to string-based configuration
fn parse_toml_config(content: &str) -> Result<Configuration> {
    let toml_value: Value = content.parse()
        .context("Failed to parse TOML content")?;
    
    let mut config = Configuration::new();
    
    if let Value::Table(table) = toml_value {
        flatten_toml_table(&table, String::new(), &mut config);
    }
    
    debug!("Parsed configuration: {:?}", config);
    Ok(config)
}

/// Recursively flatten TOML tables into section.subsection format
fn flatten_toml_table(table: &toml::Table, prefix: String, config: &mut Configuration) {
    for (key, value) in table {
        let section_name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        
        match value {
            Value::Table(subtable) => {
                // This is a nested table - check if it contains only key-value pairs
                if subtable.values().all(|v| !matches!(v, Value::Table(_))) {
                    // This is a leaf table (configuration section)
                    let mut section_map = HashMap::new();
                    for (subkey, subvalue) in subtable {
                        section_map.insert(subkey.clone(), toml_value_to_string(subvalue));
                    }
                    config.insert(section_name, section_map);
                } else {
                    // This table contains other tables - continue flattening
                    flatten_toml_table(subtable, section_name, config);
                }
            }
            _ => {
                // This is a direct key-value pair (e.g., in [base] section)
                let mut section_map = HashMap::new();
                section_map.insert("value".to_string(), toml_value_to_string(value));
                config.insert(section_name, section_map);
            }
        }
    }
}

/// Convert TOML Value to string representation
fn toml_value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Integer(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Boolean(b) => b.to_string(),
        Value::Array(_) | Value::Table(_) => {
            // For complex types, use TOML representation
            value.to_string()
        }
        _ => String::new(),
    }
}
