//! Console colour management
//!
//! Colour is used only by the table and summary exporters. Honours `NO_COLOR`
//! and falls back to plain text when stdout is not a terminal.

use colored::{Color, ColoredString, Colorize};
use serde::{Deserialize, Serialize};

/// Background the palette is tuned for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColourTheme {
    Light,
    Dark,
}

impl std::str::FromStr for ColourTheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "light" => Ok(ColourTheme::Light),
            "dark" => Ok(ColourTheme::Dark),
            _ => Err(format!("Invalid colour theme: {}. Valid options: light, dark", s)),
        }
    }
}

/// Colours for each role in dashboard output
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColourPalette {
    /// Panel titles
    pub title: Color,
    /// Column headers and the semester banner
    pub header: Color,
    /// Numeric values
    pub value: Color,
    /// Reference lines and highlighted points
    pub overlay: Color,
    /// "No data" panels
    pub muted: Color,
}

impl ColourPalette {
    pub fn for_theme(theme: ColourTheme) -> Self {
        match theme {
            ColourTheme::Light => Self {
                title: Color::Magenta,
                header: Color::Blue,
                value: Color::Green,
                overlay: Color::Red,
                muted: Color::Black,
            },
            ColourTheme::Dark => Self {
                title: Color::BrightCyan,
                header: Color::BrightBlue,
                value: Color::BrightGreen,
                overlay: Color::BrightRed,
                muted: Color::BrightBlack,
            },
        }
    }
}

/// Colour settings resolved from config file and CLI flags
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ColourConfig {
    pub enabled: bool,
    pub theme: ColourTheme,
    /// Whether to respect the NO_COLOR environment variable
    pub respect_no_color: bool,
    /// Force colours even when stdout is not a TTY
    #[serde(skip, default)]
    pub color_forced: bool,
}

impl Default for ColourConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            theme: ColourTheme::Dark,
            respect_no_color: true,
            color_forced: false,
        }
    }
}

impl ColourConfig {
    pub fn disabled() -> Self {
        Self { enabled: false, ..Self::default() }
    }

    /// Check if colours should be used given configuration and environment
    pub fn should_use_colours(&self) -> bool {
        if !self.enabled {
            return false;
        }
        if self.color_forced {
            return true;
        }
        if self.respect_no_color && std::env::var_os("NO_COLOR").is_some() {
            return false;
        }

        use std::io::IsTerminal;
        std::io::stdout().is_terminal()
    }
}

/// Applies the palette when colours are enabled, plain text otherwise
#[derive(Debug, Clone)]
pub struct ColourManager {
    enabled: bool,
    palette: ColourPalette,
}

impl ColourManager {
    pub fn with_config(config: &ColourConfig) -> Self {
        Self {
            enabled: config.should_use_colours(),
            palette: ColourPalette::for_theme(config.theme),
        }
    }

    /// Manager that never emits escape codes
    pub fn plain() -> Self {
        Self::with_config(&ColourConfig::disabled())
    }

    pub fn colours_enabled(&self) -> bool {
        self.enabled
    }

    pub fn title(&self, text: &str) -> ColoredString {
        if self.enabled {
            text.color(self.palette.title).bold()
        } else {
            text.normal()
        }
    }

    pub fn header(&self, text: &str) -> ColoredString {
        self.paint(text, self.palette.header)
    }

    pub fn value(&self, text: &str) -> ColoredString {
        self.paint(text, self.palette.value)
    }

    pub fn overlay(&self, text: &str) -> ColoredString {
        self.paint(text, self.palette.overlay)
    }

    pub fn muted(&self, text: &str) -> ColoredString {
        self.paint(text, self.palette.muted)
    }

    fn paint(&self, text: &str, colour: Color) -> ColoredString {
        if self.enabled {
            text.color(colour)
        } else {
            text.normal()
        }
    }
}

impl Default for ColourManager {
    fn default() -> Self {
        Self::with_config(&ColourConfig::default())
    }
}
