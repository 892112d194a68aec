//! Pixel to physical length mapping for lens status text.

use serde::{Deserialize, Serialize};

/// Physical size of one source pixel, in microns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UnitMapping {
    pub micron_per_pixel_x: f64,
    pub micron_per_pixel_y: f64,
}

impl UnitMapping {
    /// Create a mapping. Non-positive or non-finite sizes are rejected.
    pub fn new(micron_per_pixel_x: f64, micron_per_pixel_y: f64) -> Option<Self> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if valid(micron_per_pixel_x) && valid(micron_per_pixel_y) {
            Some(Self {
                micron_per_pixel_x,
                micron_per_pixel_y,
            })
        } else {
            None
        }
    }

    pub fn x_to_microns(&self, pixels: u32) -> f64 {
        pixels as f64 * self.micron_per_pixel_x
    }

    pub fn y_to_microns(&self, pixels: u32) -> f64 {
        pixels as f64 * self.micron_per_pixel_y
    }

    /// Format an extent like `12.50 x 8.00 µm`.
    pub fn format_extent(&self, width: u32, height: u32) -> String {
        format!(
            "{:.2} x {:.2} µm",
            self.x_to_microns(width),
            self.y_to_microns(height)
        )
    }
}

impl Default for UnitMapping {
    fn default() -> Self {
        Self {
            micron_per_pixel_x: 1.0,
            micron_per_pixel_y: 1.0,
        }
    }
}

/// Format an extent in pixels like `50 x 40 px`.
pub fn format_pixels(width: u32, height: u32) -> String {
    format!("{} x {} px", width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_invalid_sizes() {
        assert!(UnitMapping::new(0.0, 1.0).is_none());
        assert!(UnitMapping::new(1.0, -0.5).is_none());
        assert!(UnitMapping::new(f64::INFINITY, 1.0).is_none());
        assert!(UnitMapping::new(0.25, 0.5).is_some());
    }

    #[test]
    fn test_format_extent() {
        let units = UnitMapping::new(0.25, 0.5).unwrap();
        assert_eq!(units.format_extent(50, 16), "12.50 x 8.00 µm");
    }

    #[test]
    fn test_format_pixels() {
        assert_eq!(format_pixels(50, 40), "50 x 40 px");
    }
}
