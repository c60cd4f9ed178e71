//! Sketch configuration.
//!
//! Canvas sizes, colors and the grid cell size live in `sketches.toml`, which is
//! bundled into the binary at build time. Missing keys fall back to defaults.

use log::LevelFilter;
use serde::Deserialize;

use crate::error::SketchResult;

const BUNDLED: &str = include_str!("../sketches.toml");

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SketchConfig {
    /// `log` level filter: off, error, warn, info, debug or trace.
    pub log_level: String,
    pub dot: DotConfig,
    pub grid: GridConfig,
    pub shapes: ShapesConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DotConfig {
    pub width: u32,
    pub height: u32,
    pub clear_color: [f32; 4],
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Width and height of the square canvas, in pixels.
    pub size: u32,
    pub dot_size: u32,
    pub paint_color: String,
    pub clear_color: [f32; 4],
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ShapesConfig {
    pub width: u32,
    pub height: u32,
    pub clear_color: [f32; 4],
    /// Horizontal distance the animated figure moves per frame, in clip units.
    pub step: f32,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            dot: DotConfig::default(),
            grid: GridConfig::default(),
            shapes: ShapesConfig::default(),
        }
    }
}

impl Default for DotConfig {
    fn default() -> Self {
        Self {
            width: 300,
            height: 300,
            clear_color: [0.0, 0.0, 0.5, 1.0],
            color: "#ff0000".to_string(),
        }
    }
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            size: 512,
            dot_size: 32,
            paint_color: "#ff0000".to_string(),
            clear_color: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

impl Default for ShapesConfig {
    fn default() -> Self {
        Self {
            width: 300,
            height: 300,
            clear_color: [1.0, 1.0, 1.0, 1.0],
            step: 0.01,
        }
    }
}

impl SketchConfig {
    pub fn from_toml_str(content: &str) -> SketchResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// The configuration compiled into the binary.
    pub fn bundled() -> SketchResult<Self> {
        Self::from_toml_str(BUNDLED)
    }

    /// Unknown levels resolve to `Info`.
    pub fn level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
