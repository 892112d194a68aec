//! Lens geometry and screen/source coordinate conversion.
//!
//! The hosting viewer shows the source image magnified by its own
//! `image_zoom_factor`. The overlay box lives in those on-screen pixels, while
//! the crop is taken in source pixels. Going screen to source divides by the
//! image zoom, going source to screen multiplies; both truncate.

use crate::constants::{DEFAULT_LENS_SIZE, DEFAULT_ZOOM_FACTOR};

/// Convert an on-screen coordinate to a source-image coordinate.
pub fn screen_to_source(value: i32, image_zoom_factor: f32) -> u32 {
    (value.max(0) as f32 / image_zoom_factor) as u32
}

/// Convert a source-image coordinate to an on-screen coordinate.
pub fn source_to_screen(value: u32, image_zoom_factor: f32) -> i32 {
    (value as f32 * image_zoom_factor) as i32
}

/// An axis-aligned box in on-screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScreenRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl ScreenRect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Check if a point lies inside the box.
    pub fn contains(&self, px: i32, py: i32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    /// The box after applying a position and size delta.
    pub fn offset(&self, dx: i32, dy: i32, dw: i32, dh: i32) -> Self {
        Self::new(
            self.x + dx,
            self.y + dy,
            self.width + dw,
            self.height + dh,
        )
    }

    /// Convert to source-image geometry, keeping the zoom factors given.
    pub fn to_source(&self, image_zoom_factor: f32, zoom_factor: f32) -> LensGeometry {
        LensGeometry {
            x: screen_to_source(self.x, image_zoom_factor),
            y: screen_to_source(self.y, image_zoom_factor),
            width: screen_to_source(self.width, image_zoom_factor),
            height: screen_to_source(self.height, image_zoom_factor),
            zoom_factor,
            image_zoom_factor,
        }
    }
}

/// Lens position, extent and magnification in source-image pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LensGeometry {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Magnification applied when producing the preview image.
    pub zoom_factor: f32,
    /// Magnification the viewer already applies to the source image.
    pub image_zoom_factor: f32,
}

impl LensGeometry {
    /// Exclusive right edge in source pixels.
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge in source pixels.
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Check that the lens lies inside an image of the given size.
    pub fn fits_within(&self, image_width: u32, image_height: u32) -> bool {
        self.right() <= image_width && self.bottom() <= image_height
    }

    /// The on-screen box for this geometry.
    pub fn to_screen(&self) -> ScreenRect {
        ScreenRect::new(
            source_to_screen(self.x, self.image_zoom_factor),
            source_to_screen(self.y, self.image_zoom_factor),
            source_to_screen(self.width, self.image_zoom_factor),
            source_to_screen(self.height, self.image_zoom_factor),
        )
    }

    /// Size of the magnified crop, before clipping against the image.
    pub fn zoomed_size(&self) -> (u32, u32) {
        (
            (self.width as f32 * self.zoom_factor) as u32,
            (self.height as f32 * self.zoom_factor) as u32,
        )
    }
}

impl Default for LensGeometry {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            width: DEFAULT_LENS_SIZE as u32,
            height: DEFAULT_LENS_SIZE as u32,
            zoom_factor: DEFAULT_ZOOM_FACTOR,
            image_zoom_factor: 1.0,
        }
    }
}
