//! The zoom window: shows the magnified crop next to the viewer.

use image::{Rgba, RgbaImage};
use lensview_core::{ScreenRect, ZoomedImage};

use crate::paint::{blit, fill_rect};

const BACKGROUND: Rgba<u8> = Rgba([32, 32, 32, 255]);

#[derive(Debug, Clone)]
pub struct ZoomPreview {
    image: Option<RgbaImage>,
    title: String,
    visible: bool,
}

impl ZoomPreview {
    pub fn new() -> Self {
        Self {
            image: None,
            title: String::new(),
            visible: false,
        }
    }

    /// Take a copy of the latest zoomed crop. Reuses the previous raster
    /// when the size is unchanged.
    pub fn update(&mut self, zoomed: Option<&ZoomedImage<'_>>, title: String) {
        self.title = title;
        let Some(zoomed) = zoomed else {
            self.image = None;
            return;
        };

        let (w, h) = zoomed.dimensions();
        match self.image.as_mut() {
            Some(existing) if existing.dimensions() == (w, h) => {
                existing.copy_from_slice(zoomed.as_raw());
            }
            _ => {
                self.image = RgbaImage::from_raw(w, h, zoomed.as_raw().to_vec());
            }
        }
    }

    pub fn clear(&mut self) {
        self.image = None;
    }

    pub fn image(&self) -> Option<&RgbaImage> {
        self.image.as_ref()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Size the window would like to be: the zoomed crop, or nothing.
    pub fn preferred_size(&self) -> (u32, u32) {
        self.image
            .as_ref()
            .map(|img| img.dimensions())
            .unwrap_or((0, 0))
    }

    /// Clear the canvas and draw the zoomed crop centred on it.
    pub fn paint(&self, canvas: &mut RgbaImage) {
        let (cw, ch) = canvas.dimensions();
        fill_rect(
            canvas,
            &ScreenRect::new(0, 0, cw as i32, ch as i32),
            BACKGROUND,
        );

        if let Some(image) = &self.image {
            let (iw, ih) = image.dimensions();
            let x = (cw as i32 - iw as i32) / 2;
            let y = (ch as i32 - ih as i32) / 2;
            blit(canvas, image, x, y);
        }
    }

    /// Render into a new raster of the preferred size.
    pub fn render(&self) -> Option<RgbaImage> {
        let (w, h) = self.preferred_size();
        if w == 0 || h == 0 {
            return None;
        }
        let mut canvas = RgbaImage::new(w, h);
        self.paint(&mut canvas);
        Some(canvas)
    }
}

impl Default for ZoomPreview {
    fn default() -> Self {
        Self::new()
    }
}
