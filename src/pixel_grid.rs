//! Click-to-grid-cell mapping for the grid sketch.
//!
//! The canvas is split into square cells of `dot_size` pixels. A click is
//! mapped to the cell under it and painted with the current color, replacing
//! whatever that cell held before.

use crate::error::{SketchError, SketchResult};

#[derive(Debug, Clone, PartialEq)]
pub struct Pixel {
    pub x: u32,
    pub y: u32,
    pub color: [f32; 3],
}

#[derive(Debug, Clone)]
pub struct PixelGrid {
    canvas_size: u32,
    dot_size: u32,
    pixels: Vec<Pixel>,
}

impl PixelGrid {
    /// `dot_size` is clamped to at least one pixel.
    pub fn new(canvas_size: u32, dot_size: u32) -> Self {
        Self {
            canvas_size,
            dot_size: dot_size.max(1),
            pixels: Vec::new(),
        }
    }

    pub fn canvas_size(&self) -> u32 {
        self.canvas_size
    }

    pub fn dot_size(&self) -> u32 {
        self.dot_size
    }

    pub fn cells_per_side(&self) -> u32 {
        self.canvas_size / self.dot_size
    }

    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    pub fn clear(&mut self) {
        self.pixels.clear();
    }

    /// Maps an offset inside the canvas element (CSS pixels) to a cell.
    ///
    /// Returns `None` when the point falls outside the grid.
    pub fn cell_at(&self, offset_x: f64, offset_y: f64, device_pixel_ratio: f64) -> Option<(u32, u32)> {
        let dot = f64::from(self.dot_size);
        let x = (offset_x / dot * device_pixel_ratio).floor();
        let y = (offset_y / dot * device_pixel_ratio).floor();
        let cells = f64::from(self.cells_per_side());
        if !x.is_finite() || !y.is_finite() || x < 0.0 || y < 0.0 || x >= cells || y >= cells {
            return None;
        }
        Some((x as u32, y as u32))
    }

    /// Paints cell (`x`, `y`) with `color`, or erases it when `color` is `None`.
    ///
    /// A cell holds at most one pixel; the newest one is kept last.
    pub fn record(&mut self, x: u32, y: u32, color: Option<&str>) -> SketchResult<()> {
        let rgb = color.map(hex_to_rgb).transpose()?;
        self.pixels.retain(|p| p.x != x || p.y != y);
        if let Some(color) = rgb {
            self.pixels.push(Pixel { x, y, color });
        }
        Ok(())
    }

    /// Clip-space position of the center of canvas pixel (`px`, `py`).
    pub fn normalize(&self, px: f32, py: f32) -> [f32; 2] {
        let size = self.canvas_size as f32;
        let mid = size / 2.0;
        [(px - mid) / mid + 1.0 / size, (mid - py) / mid - 1.0 / size]
    }

    /// Clip-space position of the center of cell (`x`, `y`).
    pub fn cell_center(&self, x: u32, y: u32) -> [f32; 2] {
        let dot = self.dot_size as f32;
        let half = dot / 2.0 - 0.5;
        self.normalize(x as f32 * dot + half, y as f32 * dot + half)
    }
}

/// Parses `#rrggbb` into normalized RGB.
pub fn hex_to_rgb(hex: &str) -> SketchResult<[f32; 3]> {
    let digits = hex
        .strip_prefix('#')
        .filter(|d| d.len() == 6 && d.chars().all(|c| c.is_ascii_hexdigit()))
        .ok_or_else(|| SketchError::InvalidColor(hex.to_string()))?;

    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16)
            .map(|v| f32::from(v) / 255.0)
            .map_err(|_| SketchError::InvalidColor(hex.to_string()))
    };
    Ok([channel(0..2)?, channel(2..4)?, channel(4..6)?])
}

/// Parses `#rrggbb` into opaque RGBA.
pub fn hex_to_rgba(hex: &str) -> SketchResult<[f32; 4]> {
    let [r, g, b] = hex_to_rgb(hex)?;
    Ok([r, g, b, 1.0])
}

#[cfg(test)]
#[path = "pixel_grid_tests.rs"]
mod tests;
