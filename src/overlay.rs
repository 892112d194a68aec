//! The lens box drawn over the displayed image.

use image::RgbaImage;
use lensview_core::{ResizeHandle, ScreenRect};

use crate::paint::{fill_rect, stroke_rect, LensColor};

/// Side of the square resize grips, in screen pixels.
pub const HANDLE_SIZE: i32 = 6;

/// Thickness of the lens outline, in screen pixels.
pub const OUTLINE_WIDTH: i32 = 1;

#[derive(Debug, Clone)]
pub struct LensOverlay {
    bounds: ScreenRect,
    color: LensColor,
    visible: bool,
    show_handles: bool,
}

impl LensOverlay {
    pub fn new(bounds: ScreenRect, color: LensColor) -> Self {
        Self {
            bounds,
            color,
            visible: false,
            show_handles: true,
        }
    }

    pub fn bounds(&self) -> ScreenRect {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: ScreenRect) {
        self.bounds = bounds;
    }

    pub fn color(&self) -> LensColor {
        self.color
    }

    pub fn set_color(&mut self, color: LensColor) {
        self.color = color;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub fn set_show_handles(&mut self, show: bool) {
        self.show_handles = show;
    }

    /// Grip squares for every resize handle.
    pub fn handle_rects(&self) -> Vec<(ResizeHandle, ScreenRect)> {
        ResizeHandle::all()
            .iter()
            .map(|handle| (*handle, handle.rect(&self.bounds, HANDLE_SIZE)))
            .collect()
    }

    /// Draw the outline and grips onto the displayed image.
    pub fn paint(&self, canvas: &mut RgbaImage) {
        if !self.visible {
            return;
        }
        let color = self.color.rgba();
        stroke_rect(canvas, &self.bounds, OUTLINE_WIDTH, color);
        if self.show_handles {
            for (_, rect) in self.handle_rects() {
                fill_rect(canvas, &rect, color);
            }
        }
    }
}
