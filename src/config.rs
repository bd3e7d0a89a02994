use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::data::HistogramRange;
use crate::error::{DashboardError, Result};

// ---------------------------------------------------------------------------
// Dashboard configuration (optional JSON file)
// ---------------------------------------------------------------------------

/// Everything the shell can be configured with. Every field has a default,
/// so an empty `{}` file is valid.
///
/// ```json
/// {
///   "dataset_path": "housing.csv",
///   "histogram": { "bins": 30, "lower": 200000, "upper": 500001 },
///   "map": { "zoom": 10, "marker_radius": 2.0, "fill_rgba": [255, 0, 0, 60] }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct DashboardConfig {
    /// Used when no path is given on the command line.
    pub dataset_path: Option<PathBuf>,
    pub histogram: HistogramRange,
    pub map: MapStyle,
}

/// How the map layer is drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct MapStyle {
    /// Web-map zoom level of the initial view around the data centre.
    pub zoom: f64,
    /// Marker radius in screen points.
    pub marker_radius: f32,
    pub fill_rgba: [u8; 4],
}

impl Default for MapStyle {
    fn default() -> Self {
        MapStyle {
            zoom: 10.0,
            marker_radius: 2.0,
            fill_rgba: [255, 0, 0, 60],
        }
    }
}

impl MapStyle {
    /// Longitude span shown at `zoom`: the whole world at 0, halved per level.
    pub fn span_degrees(&self) -> f64 {
        360.0 / 2f64.powf(self.zoom)
    }
}

impl DashboardConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let config_err = |message: String| DashboardError::Config {
            path: path.to_path_buf(),
            message,
        };

        let text = std::fs::read_to_string(path).map_err(|e| config_err(e.to_string()))?;
        let config: DashboardConfig =
            serde_json::from_str(&text).map_err(|e| config_err(e.to_string()))?;
        config.validate().map_err(config_err)?;

        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    fn validate(&self) -> std::result::Result<(), String> {
        let h = &self.histogram;
        if h.bins == 0 {
            return Err("histogram.bins must be at least 1".into());
        }
        if !(h.lower < h.upper) {
            return Err(format!(
                "histogram.lower ({}) must be below histogram.upper ({})",
                h.lower, h.upper
            ));
        }
        if !self.map.zoom.is_finite() || self.map.marker_radius <= 0.0 {
            return Err("map.zoom must be finite and map.marker_radius positive".into());
        }
        Ok(())
    }
}
