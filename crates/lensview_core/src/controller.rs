//! Pointer handling for the lens overlay.
//!
//! The controller owns the lens box in on-screen pixels and runs a small
//! state machine:
//!
//! - pointer down on the body enters [`DragMode::Move`]
//! - pointer down on the border band enters [`DragMode::Resize`] for the
//!   handle under the pointer
//! - pointer up always returns to [`DragMode::Idle`]
//!
//! Every drag step becomes a [`Delta`] that is either applied whole or
//! dropped; nothing is clamped. Accepted boxes are pushed into the
//! [`LensModel`] in source pixels.

use crate::constants::{BORDER_HIT_WIDTH, MAX_LENS_SIZE, MIN_LENS_SIZE};
use crate::error::{LensError, Result};
use crate::geometry::{source_to_screen, ScreenRect};
use crate::handle::{hit_test, HitRegion, ResizeHandle};
use crate::model::LensModel;

/// Keyboard modifiers held during a pointer event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
}

impl Modifiers {
    /// Only shift held.
    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::default()
        }
    }
}

/// Candidate change to the lens box, in screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Delta {
    pub dx: i32,
    pub dy: i32,
    pub dw: i32,
    pub dh: i32,
}

impl Delta {
    pub fn new(dx: i32, dy: i32, dw: i32, dh: i32) -> Self {
        Self { dx, dy, dw, dh }
    }

    /// Move without resizing.
    pub fn translate(dx: i32, dy: i32) -> Self {
        Self::new(dx, dy, 0, 0)
    }

    /// Resize from `handle` by a pointer movement of `(px, py)`.
    ///
    /// With `square` set, the larger of the width and height changes is
    /// applied to both axes. Handles on the left or top edge shift the
    /// origin so the opposite edge stays put.
    pub fn for_handle(handle: ResizeHandle, px: i32, py: i32, square: bool) -> Self {
        let mut dw = if handle.moves_right() {
            px
        } else if handle.moves_left() {
            -px
        } else {
            0
        };
        let mut dh = if handle.moves_bottom() {
            py
        } else if handle.moves_top() {
            -py
        } else {
            0
        };

        if square {
            let larger = if dw.abs() >= dh.abs() { dw } else { dh };
            dw = larger;
            dh = larger;
        }

        let dx = if handle.moves_left() { -dw } else { 0 };
        let dy = if handle.moves_top() { -dh } else { 0 };
        Self::new(dx, dy, dw, dh)
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

/// Current pointer gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragMode {
    #[default]
    Idle,
    Move,
    Resize(ResizeHandle),
}

#[derive(Debug, Clone)]
pub struct LensController {
    bounds: ScreenRect,
    /// Source image size, if an image is shown.
    image_size: Option<(u32, u32)>,
    image_zoom_factor: f32,
    mode: DragMode,
    /// Pointer position of the last accepted step.
    anchor: (i32, i32),
}

impl LensController {
    /// Create a controller for a lens box with no image yet.
    pub fn new(bounds: ScreenRect) -> Self {
        Self {
            bounds,
            image_size: None,
            image_zoom_factor: 1.0,
            mode: DragMode::Idle,
            anchor: (0, 0),
        }
    }

    /// Set the viewer magnification without touching the bounds.
    pub fn with_image_zoom_factor(mut self, factor: f32) -> Self {
        self.image_zoom_factor = factor;
        self
    }

    /// Create a controller mirroring the model's current state.
    pub fn from_model(model: &LensModel) -> Self {
        let mut controller = Self::new(model.geometry().to_screen());
        controller.image_size = model.image_size();
        controller.image_zoom_factor = model.image_zoom_factor();
        controller
    }

    pub fn bounds(&self) -> ScreenRect {
        self.bounds
    }

    pub fn drag_mode(&self) -> DragMode {
        self.mode
    }

    pub fn image_zoom_factor(&self) -> f32 {
        self.image_zoom_factor
    }

    /// Size of the displayed image in screen pixels; zero without an image.
    pub fn scaled_extent(&self) -> (i32, i32) {
        self.image_size
            .map(|(w, h)| {
                (
                    source_to_screen(w, self.image_zoom_factor),
                    source_to_screen(h, self.image_zoom_factor),
                )
            })
            .unwrap_or((0, 0))
    }

    // ========================================================================
    // Bounds
    // ========================================================================

    /// Check a box against the size limits and the displayed image.
    pub fn fits(&self, rect: &ScreenRect) -> bool {
        let (extent_w, extent_h) = self.scaled_extent();
        rect.x >= 0
            && rect.y >= 0
            && (MIN_LENS_SIZE..=MAX_LENS_SIZE).contains(&rect.width)
            && (MIN_LENS_SIZE..=MAX_LENS_SIZE).contains(&rect.height)
            && rect.right() <= extent_w
            && rect.bottom() <= extent_h
    }

    /// Whether applying the delta keeps the lens valid.
    pub fn check_bounds(&self, dx: i32, dy: i32, dw: i32, dh: i32) -> bool {
        self.fits(&self.bounds.offset(dx, dy, dw, dh))
    }

    /// The closest valid box to `rect`: sizes are clamped, and if the box
    /// still sticks out it is moved to the origin. Without an image only the
    /// size limits apply.
    pub fn constrain(&self, rect: ScreenRect) -> ScreenRect {
        if self.image_size.is_none() {
            return ScreenRect::new(
                rect.x.max(0),
                rect.y.max(0),
                rect.width.clamp(MIN_LENS_SIZE, MAX_LENS_SIZE),
                rect.height.clamp(MIN_LENS_SIZE, MAX_LENS_SIZE),
            );
        }
        if self.fits(&rect) {
            return rect;
        }

        let (extent_w, extent_h) = self.scaled_extent();
        let width = rect.width.clamp(MIN_LENS_SIZE, MAX_LENS_SIZE).min(extent_w);
        let height = rect.height.clamp(MIN_LENS_SIZE, MAX_LENS_SIZE).min(extent_h);
        let mut constrained = ScreenRect::new(rect.x, rect.y, width, height);
        if constrained.x < 0
            || constrained.y < 0
            || constrained.right() > extent_w
            || constrained.bottom() > extent_h
        {
            constrained.x = 0;
            constrained.y = 0;
        }
        constrained
    }

    /// Set the lens box directly. Rejects boxes that do not fit, and any box
    /// while no image is shown.
    pub fn set_lens_bounds(&mut self, rect: ScreenRect, model: &mut LensModel) -> Result<()> {
        if self.image_size.is_none() {
            return Err(LensError::NoImage);
        }
        if !self.fits(&rect) {
            return Err(LensError::OutOfBounds {
                x: rect.x,
                y: rect.y,
                width: rect.width,
                height: rect.height,
            });
        }
        self.bounds = rect;
        self.sync_model(model);
        Ok(())
    }

    /// Track a new source image and pull the lens back inside it. Clearing
    /// the image keeps the lens box as it is.
    pub fn set_image_size(&mut self, size: Option<(u32, u32)>, model: &mut LensModel) {
        self.image_size = size;
        if size.is_none() {
            return;
        }
        let constrained = self.constrain(self.bounds);
        if constrained != self.bounds {
            log::debug!("Lens {:?} moved to {:?} to fit the image", self.bounds, constrained);
            self.bounds = constrained;
        }
        if !self.fits(&self.bounds) {
            log::warn!("Image {:?} is smaller than the minimum lens size", size);
        }
        self.sync_model(model);
    }

    /// Follow a change of the viewer's magnification. The lens keeps its
    /// source region, so its on-screen box scales with the image.
    pub fn set_image_zoom_factor(&mut self, factor: f32, model: &mut LensModel) -> Result<()> {
        if !(factor.is_finite() && factor > 0.0) {
            return Err(LensError::invalid_argument(format!(
                "image zoom factor must be positive, got {}",
                factor
            )));
        }

        let mut geometry = model.geometry();
        geometry.image_zoom_factor = factor;
        self.image_zoom_factor = factor;
        model.set_image_zoom_factor(factor);
        self.bounds = self.constrain(geometry.to_screen());
        self.sync_model(model);
        Ok(())
    }

    fn apply(&mut self, delta: Delta, model: &mut LensModel) -> bool {
        if !self.check_bounds(delta.dx, delta.dy, delta.dw, delta.dh) {
            log::trace!("Rejected lens delta {:?} on {:?}", delta, self.bounds);
            return false;
        }
        self.bounds = self.bounds.offset(delta.dx, delta.dy, delta.dw, delta.dh);
        self.sync_model(model);
        true
    }

    fn sync_model(&self, model: &mut LensModel) {
        let g = self
            .bounds
            .to_source(self.image_zoom_factor, model.zoom_factor());
        model.set_lens_location(g.x, g.y);
        model.set_width(g.width);
        model.set_height(g.height);
    }

    // ========================================================================
    // Pointer events
    // ========================================================================

    /// Start a gesture. Returns the mode entered.
    pub fn lens_mouse_down(&mut self, x: i32, y: i32, _modifiers: Modifiers) -> DragMode {
        self.mode = match hit_test(&self.bounds, x, y, BORDER_HIT_WIDTH) {
            HitRegion::Outside => DragMode::Idle,
            HitRegion::Body => DragMode::Move,
            HitRegion::Border(handle) => DragMode::Resize(handle),
        };
        self.anchor = (x, y);
        log::trace!("Lens pointer down at ({}, {}): {:?}", x, y, self.mode);
        self.mode
    }

    /// Continue a gesture. Returns true if the lens changed.
    pub fn lens_mouse_drag(
        &mut self,
        x: i32,
        y: i32,
        modifiers: Modifiers,
        model: &mut LensModel,
    ) -> bool {
        let px = x - self.anchor.0;
        let py = y - self.anchor.1;

        let delta = match self.mode {
            DragMode::Idle => return false,
            DragMode::Move => Delta::translate(px, py),
            DragMode::Resize(handle) => Delta::for_handle(handle, px, py, modifiers.shift),
        };
        if delta.is_zero() {
            return false;
        }

        let applied = self.apply(delta, model);
        if applied {
            self.anchor = (x, y);
        }
        applied
    }

    /// End the gesture.
    pub fn lens_mouse_up(&mut self, x: i32, y: i32) {
        log::trace!("Lens pointer up at ({}, {})", x, y);
        self.mode = DragMode::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use image::RgbaImage;

    fn setup(width: u32, height: u32, lens: ScreenRect) -> (LensController, LensModel) {
        let mut model = LensModel::new();
        model.set_image(Some(Arc::new(RgbaImage::new(width, height))));
        let mut controller = LensController::from_model(&model);
        controller
            .set_lens_bounds(lens, &mut model)
            .expect("lens fits");
        (controller, model)
    }

    fn accepts(controller: &LensController, r: ScreenRect) -> bool {
        let b = controller.bounds();
        controller.check_bounds(r.x - b.x, r.y - b.y, r.width - b.width, r.height - b.height)
    }

    #[test]
    fn test_check_bounds_matches_inequalities() {
        let (controller, _) = setup(1000, 800, ScreenRect::new(100, 100, 50, 50));
        let xs = [-1, 0, 500, 950, 951];
        let sizes = [MIN_LENS_SIZE - 1, MIN_LENS_SIZE, 50, MAX_LENS_SIZE, MAX_LENS_SIZE + 1];

        for &x in &xs {
            for &y in &xs {
                for &w in &sizes {
                    for &h in &sizes {
                        let r = ScreenRect::new(x, y, w, h);
                        let expected = x >= 0
                            && y >= 0
                            && (MIN_LENS_SIZE..=MAX_LENS_SIZE).contains(&w)
                            && (MIN_LENS_SIZE..=MAX_LENS_SIZE).contains(&h)
                            && x + w <= 1000
                            && y + h <= 800;
                        assert_eq!(accepts(&controller, r), expected, "{:?}", r);
                    }
                }
            }
        }
    }

    #[test]
    fn test_no_image_rejects_everything() {
        let controller = LensController::new(ScreenRect::new(0, 0, 50, 50));
        assert!(!controller.check_bounds(0, 0, 0, 0));
    }

    #[test]
    fn test_shift_resize_uses_larger_delta() {
        let (mut controller, mut model) = setup(1000, 1000, ScreenRect::new(100, 100, 50, 50));
        assert_eq!(
            controller.lens_mouse_down(149, 149, Modifiers::default()),
            DragMode::Resize(ResizeHandle::SouthEast)
        );
        assert!(controller.lens_mouse_drag(179, 159, Modifiers::shift(), &mut model));
        assert_eq!(controller.bounds(), ScreenRect::new(100, 100, 80, 80));
        assert_eq!((model.width(), model.height()), (80, 80));
    }

    #[test]
    fn test_shift_resize_rejected_as_a_whole() {
        let (mut controller, mut model) = setup(1000, 170, ScreenRect::new(100, 100, 50, 50));
        controller.lens_mouse_down(149, 149, Modifiers::default());
        // (30, 30) would reach y = 180 > 170; the unconstrained (30, 10) would fit.
        assert!(!controller.lens_mouse_drag(179, 159, Modifiers::shift(), &mut model));
        assert_eq!(controller.bounds(), ScreenRect::new(100, 100, 50, 50));
        assert_eq!((model.width(), model.height()), (50, 50));
    }

    #[test]
    fn test_move_drag_updates_model() {
        let (mut controller, mut model) = setup(500, 500, ScreenRect::new(100, 100, 50, 50));
        assert_eq!(
            controller.lens_mouse_down(125, 125, Modifiers::default()),
            DragMode::Move
        );
        assert!(controller.lens_mouse_drag(135, 120, Modifiers::default(), &mut model));
        assert!(controller.lens_mouse_drag(140, 120, Modifiers::default(), &mut model));
        assert_eq!(controller.bounds(), ScreenRect::new(115, 95, 50, 50));
        assert_eq!((model.x(), model.y()), (115, 95));
    }

    #[test]
    fn test_move_past_edge_is_ignored() {
        let (mut controller, mut model) = setup(500, 500, ScreenRect::new(10, 10, 50, 50));
        controller.lens_mouse_down(30, 30, Modifiers::default());
        assert!(!controller.lens_mouse_drag(15, 30, Modifiers::default(), &mut model));
        assert_eq!(controller.bounds().x, 10);
        // Anchor stayed at the press point, so coming back applies the net movement.
        assert!(controller.lens_mouse_drag(25, 30, Modifiers::default(), &mut model));
        assert_eq!(controller.bounds().x, 5);
    }

    #[test]
    fn test_west_resize_keeps_right_edge() {
        let (mut controller, mut model) = setup(500, 500, ScreenRect::new(100, 100, 50, 50));
        controller.lens_mouse_down(101, 125, Modifiers::default());
        assert!(controller.lens_mouse_drag(91, 125, Modifiers::default(), &mut model));
        let b = controller.bounds();
        assert_eq!((b.x, b.width, b.right()), (90, 60, 150));
    }

    #[test]
    fn test_northwest_shift_resize_keeps_bottom_right() {
        let (mut controller, mut model) = setup(500, 500, ScreenRect::new(100, 100, 50, 50));
        controller.lens_mouse_down(100, 100, Modifiers::default());
        assert!(controller.lens_mouse_drag(95, 80, Modifiers::shift(), &mut model));
        let b = controller.bounds();
        assert_eq!((b.width, b.height), (70, 70));
        assert_eq!((b.right(), b.bottom()), (150, 150));
    }

    #[test]
    fn test_resize_below_minimum_is_ignored() {
        let (mut controller, mut model) = setup(500, 500, ScreenRect::new(100, 100, 30, 30));
        controller.lens_mouse_down(129, 115, Modifiers::default());
        assert!(!controller.lens_mouse_drag(115, 115, Modifiers::default(), &mut model));
        assert_eq!(controller.bounds().width, 30);
    }

    #[test]
    fn test_mouse_up_always_ends_gesture() {
        let (mut controller, mut model) = setup(500, 500, ScreenRect::new(100, 100, 50, 50));
        controller.lens_mouse_down(125, 125, Modifiers::default());
        controller.lens_mouse_up(400, 400);
        assert_eq!(controller.drag_mode(), DragMode::Idle);
        assert!(!controller.lens_mouse_drag(130, 130, Modifiers::default(), &mut model));
    }

    #[test]
    fn test_press_outside_starts_nothing() {
        let (mut controller, mut model) = setup(500, 500, ScreenRect::new(100, 100, 50, 50));
        assert_eq!(
            controller.lens_mouse_down(10, 10, Modifiers::default()),
            DragMode::Idle
        );
        assert!(!controller.lens_mouse_drag(20, 20, Modifiers::default(), &mut model));
        assert_eq!(controller.bounds(), ScreenRect::new(100, 100, 50, 50));
    }

    #[test]
    fn test_image_zoom_converts_to_source_pixels() {
        let mut model = LensModel::new();
        model.set_image(Some(Arc::new(RgbaImage::new(400, 400))));
        let mut controller = LensController::from_model(&model);
        controller
            .set_image_zoom_factor(2.0, &mut model)
            .expect("valid factor");
        assert_eq!(controller.scaled_extent(), (800, 800));

        controller
            .set_lens_bounds(ScreenRect::new(101, 51, 61, 41), &mut model)
            .expect("fits");
        assert_eq!((model.x(), model.y()), (50, 25));
        assert_eq!((model.width(), model.height()), (30, 20));
    }

    #[test]
    fn test_image_zoom_rejects_non_positive() {
        let mut model = LensModel::new();
        let mut controller = LensController::from_model(&model);
        assert!(controller.set_image_zoom_factor(0.0, &mut model).is_err());
        assert!(controller.set_image_zoom_factor(f32::NAN, &mut model).is_err());
    }

    #[test]
    fn test_smaller_image_pulls_lens_back() {
        let (mut controller, mut model) = setup(1000, 1000, ScreenRect::new(800, 800, 150, 150));
        controller.set_image_size(Some((300, 200)), &mut model);
        let b = controller.bounds();
        assert_eq!(b, ScreenRect::new(0, 0, 150, 150));
        assert!(controller.fits(&b));
    }

    #[test]
    fn test_set_lens_bounds_rejects_out_of_image() {
        let (mut controller, mut model) = setup(200, 200, ScreenRect::new(0, 0, 50, 50));
        let err = controller
            .set_lens_bounds(ScreenRect::new(180, 0, 50, 50), &mut model)
            .unwrap_err();
        assert!(matches!(err, LensError::OutOfBounds { x: 180, .. }));
    }

    #[test]
    fn test_clearing_image_keeps_lens_size() {
        let (mut controller, mut model) = setup(1000, 1000, ScreenRect::new(0, 0, 100, 100));
        controller.set_image_size(None, &mut model);
        assert_eq!(controller.bounds(), ScreenRect::new(0, 0, 100, 100));
        assert_eq!((model.width(), model.height()), (100, 100));

        controller.set_image_size(Some((1000, 1000)), &mut model);
        assert_eq!(controller.bounds(), ScreenRect::new(0, 0, 100, 100));
        assert_eq!((model.width(), model.height()), (100, 100));
    }

    #[test]
    fn test_image_zoom_before_any_image_keeps_source_size() {
        let mut model = LensModel::new();
        let mut controller = LensController::from_model(&model);
        controller
            .set_image_zoom_factor(2.0, &mut model)
            .expect("valid factor");
        assert_eq!(controller.bounds(), ScreenRect::new(0, 0, 200, 200));
        assert_eq!((model.width(), model.height()), (100, 100));

        model.set_image(Some(Arc::new(RgbaImage::new(1000, 1000))));
        controller.set_image_size(model.image_size(), &mut model);
        assert_eq!(controller.bounds(), ScreenRect::new(0, 0, 200, 200));
        assert_eq!((model.width(), model.height()), (100, 100));
    }

    #[test]
    fn test_image_zoom_without_image_respects_size_limits() {
        let mut model = LensModel::new();
        let mut controller = LensController::from_model(&model);
        controller
            .set_image_zoom_factor(8.0, &mut model)
            .expect("valid factor");
        let b = controller.bounds();
        assert_eq!((b.width, b.height), (MAX_LENS_SIZE, MAX_LENS_SIZE));
    }

    #[test]
    fn test_set_lens_bounds_without_image() {
        let mut model = LensModel::new();
        let mut controller = LensController::from_model(&model);
        let err = controller
            .set_lens_bounds(ScreenRect::new(0, 0, 50, 50), &mut model)
            .unwrap_err();
        assert!(matches!(err, LensError::NoImage));
        assert_eq!(controller.bounds(), ScreenRect::new(0, 0, 100, 100));
    }
}
