//! Figure options, optionally read from a JSON file.
//!
//! Every field has a default, so an options file only needs the keys it
//! changes:
//!
//! ```json
//! { "method": "spearman", "palette": "rdbu", "scatter_width": 500 }
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::color::ColorPalette;
use crate::stats::correlation::CorrelationMethod;

/// Environment variable naming an options file for the viewer.
pub const CONFIG_ENV: &str = "LACERTA_CONFIG";

/// Scatter height is derived from its width.
pub const SCATTER_ASPECT: f32 = 1.43;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureOptions {
    pub method: CorrelationMethod,
    pub palette: ColorPalette,
    /// Interpolate between palette colours instead of binning.
    pub smooth_colors: bool,
    /// Target heatmap size in pixels.
    pub hm_width: f32,
    pub hm_height: f32,
    /// Target scatter width in pixels; height is `scatter_width * 1.43`.
    pub scatter_width: f32,
    /// Fraction of each heatmap square that is filled.
    pub cell_gap: f64,
    pub marker_radius: f32,
    pub marker_alpha: f32,
    /// Column whose values identify rows in scatter tooltips.  `None` picks
    /// the first non-numeric column.
    pub id_column: Option<String>,
}

impl Default for FigureOptions {
    fn default() -> Self {
        Self {
            method: CorrelationMethod::Pearson,
            palette: ColorPalette::PiYG,
            smooth_colors: false,
            hm_width: 800.0,
            hm_height: 800.0,
            scatter_width: 400.0,
            cell_gap: 0.95,
            marker_radius: 4.0,
            marker_alpha: 0.6,
            id_column: None,
        }
    }
}

impl FigureOptions {
    pub fn scatter_height(&self) -> f32 {
        self.scatter_width * SCATTER_ASPECT
    }

    /// Parse options from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("parsing figure options")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading options file {}", path.display()))?;
        Self::from_json(&text)
    }

    /// Options from the file named by `LACERTA_CONFIG`, or defaults when the
    /// variable is unset.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => {
                let options = Self::load(Path::new(&path))?;
                log::info!("Loaded figure options from {}", Path::new(&path).display());
                Ok(options)
            }
            None => Ok(Self::default()),
        }
    }
}
