//! Lens state: geometry plus the magnified crop of the source image.
//!
//! Setters here are plain assignments. Bounds are enforced by the
//! [`LensController`](crate::LensController) before anything reaches the
//! model.

use std::sync::Arc;

use image::{ImageBuffer, Rgba, RgbaImage};

use crate::buffer::ZoomBuffer;
use crate::constants::BYTES_PER_PIXEL;
use crate::geometry::LensGeometry;

/// A magnified crop borrowing the model's reusable buffer.
pub type ZoomedImage<'a> = ImageBuffer<Rgba<u8>, &'a [u8]>;

#[derive(Debug, Clone, Default)]
pub struct LensModel {
    image: Option<Arc<RgbaImage>>,
    geometry: LensGeometry,
    buffer: ZoomBuffer,
}

impl LensModel {
    /// Create a model with default geometry and no source image.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a model starting from the given geometry.
    pub fn with_geometry(geometry: LensGeometry) -> Self {
        Self {
            geometry,
            ..Self::default()
        }
    }

    // ========================================================================
    // Source image
    // ========================================================================

    /// Replace the source image. The owner is expected to call
    /// [`reset_data_buffer`](Self::reset_data_buffer) afterwards.
    pub fn set_image(&mut self, image: Option<Arc<RgbaImage>>) {
        self.image = image;
    }

    pub fn image(&self) -> Option<&Arc<RgbaImage>> {
        self.image.as_ref()
    }

    /// Source image dimensions, if an image is set.
    pub fn image_size(&self) -> Option<(u32, u32)> {
        self.image.as_ref().map(|img| img.dimensions())
    }

    // ========================================================================
    // Geometry
    // ========================================================================

    pub fn set_lens_location(&mut self, x: u32, y: u32) {
        self.geometry.x = x;
        self.geometry.y = y;
    }

    pub fn set_width(&mut self, width: u32) {
        self.geometry.width = width;
    }

    pub fn set_height(&mut self, height: u32) {
        self.geometry.height = height;
    }

    pub fn set_zoom_factor(&mut self, zoom_factor: f32) {
        self.geometry.zoom_factor = zoom_factor;
    }

    pub fn set_image_zoom_factor(&mut self, image_zoom_factor: f32) {
        self.geometry.image_zoom_factor = image_zoom_factor;
    }

    pub fn x(&self) -> u32 {
        self.geometry.x
    }

    pub fn y(&self) -> u32 {
        self.geometry.y
    }

    pub fn width(&self) -> u32 {
        self.geometry.width
    }

    pub fn height(&self) -> u32 {
        self.geometry.height
    }

    pub fn zoom_factor(&self) -> f32 {
        self.geometry.zoom_factor
    }

    pub fn image_zoom_factor(&self) -> f32 {
        self.geometry.image_zoom_factor
    }

    pub fn geometry(&self) -> LensGeometry {
        self.geometry
    }

    // ========================================================================
    // Magnification
    // ========================================================================

    /// The source region under the lens as `(x, y, width, height)`, clipped
    /// to the image. `None` without an image or when nothing is left.
    pub fn crop_rect(&self) -> Option<(u32, u32, u32, u32)> {
        let (img_w, img_h) = self.image_size()?;
        let g = &self.geometry;
        if g.x >= img_w || g.y >= img_h {
            return None;
        }

        let width = g.width.min(img_w - g.x);
        let height = g.height.min(img_h - g.y);
        if width == 0 || height == 0 {
            return None;
        }

        Some((g.x, g.y, width, height))
    }

    /// Crop the source image to the lens and scale it by the zoom factor.
    ///
    /// Returns `None` if no image is set or the crop collapses to nothing
    /// after truncation. The result borrows the internal buffer, which grows
    /// as needed and is reused across calls.
    pub fn zoomed_image(&mut self) -> Option<ZoomedImage<'_>> {
        let image = Arc::clone(self.image.as_ref()?);
        let (cx, cy, cw, ch) = self.crop_rect()?;
        let zoom = self.geometry.zoom_factor;
        if zoom <= 0.0 {
            return None;
        }

        let out_w = (cw as f32 * zoom) as u32;
        let out_h = (ch as f32 * zoom) as u32;
        if out_w == 0 || out_h == 0 {
            return None;
        }

        let data = self.buffer.ensure(out_w as usize * out_h as usize);
        for oy in 0..out_h {
            let sy = cy + ((oy as f32 / zoom) as u32).min(ch - 1);
            for ox in 0..out_w {
                let sx = cx + ((ox as f32 / zoom) as u32).min(cw - 1);
                let offset = (oy as usize * out_w as usize + ox as usize) * BYTES_PER_PIXEL;
                data[offset..offset + BYTES_PER_PIXEL].copy_from_slice(&image.get_pixel(sx, sy).0);
            }
        }

        let data: &[u8] = data;
        ImageBuffer::from_raw(out_w, out_h, data)
    }

    /// Drop the reusable buffer, e.g. after the source image changed.
    pub fn reset_data_buffer(&mut self) {
        self.buffer.reset();
    }

    pub fn buffer(&self) -> &ZoomBuffer {
        &self.buffer
    }
}
