//! Display module for console colour and compact formatting

pub mod colours;
pub mod format;

pub use colours::{ColourConfig, ColourManager, ColourPalette, ColourTheme};
pub use format::CompactFormat;
