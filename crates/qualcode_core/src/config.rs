//! Store configuration.
//!
//! # Responsibility
//! - Hold the tunables of one coding session: color palette, saturation
//!   heuristic window/threshold and id source.
//! - Load from JSON and validate before a store is built.
//!
//! # Invariants
//! - A validated config has a non-empty palette of hex colors and a
//!   saturation window greater than zero.

use crate::ids::IdSource;
use crate::validate::is_hex_color;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Default number of trailing audit entries inspected by the saturation heuristic.
pub const DEFAULT_SATURATION_WINDOW: usize = 50;
/// Default maximum number of recent `create` events still read as saturation.
pub const DEFAULT_SATURATION_THRESHOLD: usize = 2;

const DEFAULT_PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

/// Errors from configuration loading and validation.
#[derive(Debug)]
pub enum ConfigError {
    /// Input is not valid config JSON.
    Parse(serde_json::Error),
    /// Palette has no colors.
    EmptyPalette,
    /// Palette entry is not a `#rgb`/`#rrggbb` color.
    InvalidPaletteColor(String),
    /// Saturation window must inspect at least one entry.
    ZeroSaturationWindow,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid store config: {err}"),
            Self::EmptyPalette => write!(f, "palette must contain at least one color"),
            Self::InvalidPaletteColor(value) => write!(f, "invalid palette color: `{value}`"),
            Self::ZeroSaturationWindow => write!(f, "saturation window must be greater than 0"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Tunables for one `CodingStore`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct StoreConfig {
    /// Colors handed out to new codes and actors, cycled by registry size.
    pub palette: Vec<String>,
    pub saturation_window: usize,
    pub saturation_threshold: usize,
    pub id_source: IdSource,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            palette: DEFAULT_PALETTE.iter().map(|color| color.to_string()).collect(),
            saturation_window: DEFAULT_SATURATION_WINDOW,
            saturation_threshold: DEFAULT_SATURATION_THRESHOLD,
            id_source: IdSource::default(),
        }
    }
}

impl StoreConfig {
    /// Parses and validates a JSON config. Missing fields take defaults.
    pub fn from_json_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.palette.is_empty() {
            return Err(ConfigError::EmptyPalette);
        }
        if let Some(bad) = self.palette.iter().find(|color| !is_hex_color(color)) {
            return Err(ConfigError::InvalidPaletteColor(bad.clone()));
        }
        if self.saturation_window == 0 {
            return Err(ConfigError::ZeroSaturationWindow);
        }
        Ok(())
    }

    /// Returns the palette color for the `index`-th entity, wrapping around.
    pub fn palette_color(&self, index: usize) -> String {
        self.palette[index % self.palette.len()].clone()
    }
}
