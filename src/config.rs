//! Unified configuration for the map engine.
//!
//! All tunables the core consumes — initial view, clustering thresholds,
//! grid resolution, kernel radius, contour levels — live here as explicit
//! parameters rather than hard-coded constants, loadable from a single
//! YAML file.

use crate::cluster::ClusterConfig;
use crate::contour::ContourConfig;
use crate::core::GeoPoint;
use crate::density::DensityConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest accepted density grid dimension, in cells.
pub const MAX_GRID_CELLS: usize = 1024;

/// Largest accepted kernel radius, in cells.
pub const MAX_KERNEL_RADIUS: usize = 32;

/// Initial view placement.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Geographic point the view opens centered on.
    pub center: GeoPoint,
    /// Initial zoom level.
    pub zoom: f64,
}

impl Default for ViewConfig {
    /// Córdoba province overview.
    fn default() -> Self {
        Self {
            center: GeoPoint::new(-31.5, -64.5),
            zoom: 7.0,
        }
    }
}

/// Interaction parameters for the render layer.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Extra pixels of reach around a marker when hit-testing.
    pub pick_slop: f64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { pick_slop: 4.0 }
    }
}

/// Full engine configuration.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct MapConfig {
    /// Initial view placement.
    pub view: ViewConfig,
    /// Clustering parameters.
    pub cluster: ClusterConfig,
    /// Density grid parameters.
    pub density: DensityConfig,
    /// Contour ladder parameters.
    pub contour: ContourConfig,
    /// Render-layer interaction parameters.
    pub render: RenderConfig,
}

impl MapConfig {
    /// Load configuration from a YAML file.
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_yaml(&contents)
    }

    /// Load configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a YAML file.
    pub fn to_yaml_file(&self, path: &Path) -> Result<(), ConfigError> {
        let yaml = self.to_yaml()?;
        std::fs::write(path, yaml).map_err(|e| ConfigError::Io(e.to_string()))
    }

    /// Serialize to a YAML string.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yaml::to_string(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Check parameter ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.view.center.is_finite() || !self.view.zoom.is_finite() {
            return Err(ConfigError::Invalid("view center/zoom must be finite".to_string()));
        }
        if !(self.cluster.base_radius > 0.0) || !(self.cluster.min_radius > 0.0) {
            return Err(ConfigError::Invalid(
                "cluster radii must be positive".to_string(),
            ));
        }
        if !self.cluster.zoom_threshold.is_finite() {
            return Err(ConfigError::Invalid("zoom threshold must be finite".to_string()));
        }
        if self.density.width < 2 || self.density.height < 2 {
            return Err(ConfigError::Invalid(
                "density grid needs at least 2x2 cells".to_string(),
            ));
        }
        // The kernel pass is O(cells x entities) in the worst case; these
        // caps keep one recompute from blowing past a frame.
        if self.density.width > MAX_GRID_CELLS || self.density.height > MAX_GRID_CELLS {
            return Err(ConfigError::Invalid(format!(
                "density grid capped at {}x{} cells",
                MAX_GRID_CELLS, MAX_GRID_CELLS
            )));
        }
        if self.density.kernel_radius > MAX_KERNEL_RADIUS {
            return Err(ConfigError::Invalid(format!(
                "kernel radius capped at {} cells",
                MAX_KERNEL_RADIUS
            )));
        }
        if !(self.contour.low_fraction > 0.0)
            || !(self.contour.high_fraction <= 1.0)
            || self.contour.low_fraction > self.contour.high_fraction
        {
            return Err(ConfigError::Invalid(
                "contour fractions must satisfy 0 < low <= high <= 1".to_string(),
            ));
        }
        if !(self.render.pick_slop >= 0.0) {
            return Err(ConfigError::Invalid("pick slop must be non-negative".to_string()));
        }
        Ok(())
    }
}

/// Configuration error type.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// File I/O error.
    Io(String),
    /// YAML parsing error.
    Parse(String),
    /// Parameters outside valid ranges.
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "IO error: {}", msg),
            ConfigError::Parse(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}
