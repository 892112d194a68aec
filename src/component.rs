//! The lens as seen by the hosting image viewer.
//!
//! [`LensComponent`] owns the model, the controller and both surfaces, and
//! keeps them consistent: every accepted geometry change moves the overlay
//! and refreshes the zoom preview.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::RgbaImage;
use lensview_core::constants::{LENS_PRESET_SIZES, MAX_ZOOM_FACTOR, MIN_ZOOM_FACTOR};
use lensview_core::geometry::source_to_screen;
use lensview_core::{
    DragMode, LensController, LensError, LensModel, Modifiers, ScreenRect, ZoomedImage,
};

use crate::config::LensSettings;
use crate::export::{self, ExportError, ExportFormat, Notifier, SaveDialog};
use crate::overlay::LensOverlay;
use crate::paint::LensColor;
use crate::preview::ZoomPreview;
use crate::units::{format_pixels, UnitMapping};

const SAVE_TITLE: &str = "Save zoomed image";

#[derive(Debug, Clone)]
pub struct LensComponent {
    model: LensModel,
    controller: LensController,
    overlay: LensOverlay,
    preview: ZoomPreview,
    units: Option<UnitMapping>,
    show_microns: bool,
    visible: bool,
}

impl LensComponent {
    /// Build a lens from validated settings. The lens starts hidden at the
    /// origin, with no image.
    pub fn new(settings: &LensSettings) -> Result<Self, LensError> {
        settings.validate()?;

        let bounds = ScreenRect::new(0, 0, settings.width, settings.height);
        let controller =
            LensController::new(bounds).with_image_zoom_factor(settings.image_zoom_factor);
        let model = LensModel::with_geometry(
            bounds.to_source(settings.image_zoom_factor, settings.zoom_factor),
        );

        let mut overlay = LensOverlay::new(bounds, settings.color);
        overlay.set_show_handles(settings.show_handles);

        Ok(Self {
            model,
            controller,
            overlay,
            preview: ZoomPreview::new(),
            units: settings.units,
            show_microns: settings.show_microns,
            visible: false,
        })
    }

    // ========================================================================
    // Image
    // ========================================================================

    /// Show the lens over a new image. The zoom buffer is dropped and the
    /// lens pulled back inside the image if needed.
    pub fn set_image(&mut self, image: Option<Arc<RgbaImage>>) {
        self.model.set_image(image);
        self.model.reset_data_buffer();
        let size = self.model.image_size();
        if size.is_none() {
            self.preview.clear();
        }
        self.controller.set_image_size(size, &mut self.model);
        log::info!("Lens image set: {:?}", size);
        self.sync();
    }

    pub fn image_size(&self) -> Option<(u32, u32)> {
        self.model.image_size()
    }

    /// Follow the viewer's magnification of the displayed image.
    pub fn set_image_zoom_factor(&mut self, factor: f32) -> Result<(), LensError> {
        self.controller
            .set_image_zoom_factor(factor, &mut self.model)?;
        self.sync();
        Ok(())
    }

    pub fn image_zoom_factor(&self) -> f32 {
        self.model.image_zoom_factor()
    }

    // ========================================================================
    // Geometry
    // ========================================================================

    /// Set the preview magnification.
    pub fn set_zoom_factor(&mut self, factor: f32) -> Result<(), LensError> {
        if !(MIN_ZOOM_FACTOR..=MAX_ZOOM_FACTOR).contains(&factor) {
            return Err(LensError::invalid_argument(format!(
                "zoom factor {} outside [{}, {}]",
                factor, MIN_ZOOM_FACTOR, MAX_ZOOM_FACTOR
            )));
        }
        self.model.set_zoom_factor(factor);
        log::debug!("Lens zoom factor set to {}", factor);
        self.sync();
        Ok(())
    }

    pub fn zoom_factor(&self) -> f32 {
        self.model.zoom_factor()
    }

    /// Move the lens to a position in source-image pixels.
    ///
    /// The model keeps `(x, y)` exactly, but the overlay box is truncated to
    /// whole screen pixels. Under a fractional image zoom the next accepted
    /// drag re-derives the position from that box, which can land up to one
    /// source pixel short of `(x, y)`.
    pub fn set_lens_location(&mut self, x: u32, y: u32) -> Result<(), LensError> {
        let factor = self.model.image_zoom_factor();
        let bounds = self.controller.bounds();
        let rect = ScreenRect::new(
            source_to_screen(x, factor),
            source_to_screen(y, factor),
            bounds.width,
            bounds.height,
        );
        self.controller.set_lens_bounds(rect, &mut self.model)?;
        // Keep the exact source position rather than the truncated screen one.
        self.model.set_lens_location(x, y);
        self.sync();
        Ok(())
    }

    /// Resize the lens on screen, keeping its top-left corner.
    pub fn set_lens_size(&mut self, width: i32, height: i32) -> Result<(), LensError> {
        let bounds = self.controller.bounds();
        let rect = ScreenRect::new(bounds.x, bounds.y, width, height);
        self.controller.set_lens_bounds(rect, &mut self.model)?;
        self.sync();
        Ok(())
    }

    /// Resize the lens to one of the preset square sizes.
    pub fn set_lens_preset_size(&mut self, index: usize) -> Result<(), LensError> {
        let size = LENS_PRESET_SIZES.get(index).copied().ok_or_else(|| {
            LensError::invalid_argument(format!("no lens preset at index {}", index))
        })?;
        self.set_lens_size(size, size)
    }

    /// The lens box in screen pixels.
    pub fn lens_bounds(&self) -> ScreenRect {
        self.controller.bounds()
    }

    pub fn model(&self) -> &LensModel {
        &self.model
    }

    // ========================================================================
    // Appearance
    // ========================================================================

    pub fn set_lens_color(&mut self, color: LensColor) {
        self.overlay.set_color(color);
    }

    pub fn lens_color(&self) -> LensColor {
        self.overlay.color()
    }

    /// Set the physical pixel size used for status text.
    pub fn set_pixel_units(&mut self, units: Option<UnitMapping>) {
        self.units = units;
        self.sync();
    }

    /// Report extents in microns when a unit mapping is known.
    pub fn set_show_in_microns(&mut self, show: bool) {
        self.show_microns = show;
        self.sync();
    }

    /// Show or hide the resize grips on the overlay.
    pub fn set_show_handles(&mut self, show: bool) {
        self.overlay.set_show_handles(show);
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
        self.overlay.set_visible(visible);
        self.preview.set_visible(visible);
        self.sync();
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn overlay(&self) -> &LensOverlay {
        &self.overlay
    }

    pub fn preview(&self) -> &ZoomPreview {
        &self.preview
    }

    /// Short description of the lens for a status bar.
    pub fn status_text(&self) -> String {
        let g = self.model.geometry();
        let extent = match (self.show_microns, self.units) {
            (true, Some(units)) => units.format_extent(g.width, g.height),
            _ => format_pixels(g.width, g.height),
        };
        format!("Lens at ({}, {}): {}", g.x, g.y, extent)
    }

    fn preview_title(&self) -> String {
        let g = self.model.geometry();
        let extent = match (self.show_microns, self.units) {
            (true, Some(units)) => units.format_extent(g.width, g.height),
            _ => format_pixels(g.width, g.height),
        };
        format!("Zoom: {:.1}x  Lens: {}", g.zoom_factor, extent)
    }

    /// Push the current geometry to both surfaces.
    fn sync(&mut self) {
        self.overlay.set_bounds(self.controller.bounds());
        if !self.visible {
            return;
        }
        let title = self.preview_title();
        let zoomed = self.model.zoomed_image();
        self.preview.update(zoomed.as_ref(), title);
    }

    // ========================================================================
    // Pointer events
    // ========================================================================

    pub fn mouse_pressed(&mut self, x: i32, y: i32, modifiers: Modifiers) -> DragMode {
        self.controller.lens_mouse_down(x, y, modifiers)
    }

    /// Returns true if the lens moved or changed size.
    pub fn mouse_dragged(&mut self, x: i32, y: i32, modifiers: Modifiers) -> bool {
        let changed = self
            .controller
            .lens_mouse_drag(x, y, modifiers, &mut self.model);
        if changed {
            self.sync();
        }
        changed
    }

    pub fn mouse_released(&mut self, x: i32, y: i32) {
        self.controller.lens_mouse_up(x, y);
    }

    // ========================================================================
    // Output
    // ========================================================================

    /// The magnified crop under the lens.
    pub fn zoomed_image(&mut self) -> Option<ZoomedImage<'_>> {
        self.model.zoomed_image()
    }

    /// Write the magnified crop to a file.
    pub fn save_as(&mut self, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
        let zoomed = self
            .model
            .zoomed_image()
            .ok_or(ExportError::NothingToExport)?;
        export::save_image(&zoomed, path, format)
    }

    /// Ask for a file and save to it. Failures are reported through the
    /// notifier. Returns the written path.
    pub fn save_interactive(
        &mut self,
        dialog: &dyn SaveDialog,
        notifier: &dyn Notifier,
        fallback: ExportFormat,
    ) -> Option<PathBuf> {
        if self.model.image().is_none() {
            notifier.error(SAVE_TITLE, &ExportError::NothingToExport.to_string());
            return None;
        }

        let chosen = dialog.choose_path(&fallback.default_filename(), ExportFormat::all())?;
        let result = export::resolve_target(&chosen, fallback)
            .and_then(|(path, format)| self.save_as(&path, format).map(|_| path));

        match result {
            Ok(path) => Some(path),
            Err(e) => {
                log::error!("Saving zoomed image failed: {}", e);
                notifier.error(SAVE_TITLE, &e.to_string());
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    use image::Rgba;

    struct FixedDialog(Option<PathBuf>);

    impl SaveDialog for FixedDialog {
        fn choose_path(&self, _default_name: &str, _formats: &[ExportFormat]) -> Option<PathBuf> {
            self.0.clone()
        }
    }

    #[derive(Default)]
    struct RecordingNotifier(RefCell<Vec<String>>);

    impl Notifier for RecordingNotifier {
        fn error(&self, _title: &str, message: &str) {
            self.0.borrow_mut().push(message.to_string());
        }
    }

    fn image(width: u32, height: u32) -> Arc<RgbaImage> {
        Arc::new(RgbaImage::from_fn(width, height, |x, y| {
            Rgba([(x % 256) as u8, (y % 256) as u8, 7, 255])
        }))
    }

    fn lens(width: i32, height: i32) -> LensComponent {
        LensComponent::new(&LensSettings {
            width,
            height,
            ..LensSettings::default()
        })
        .unwrap()
    }

    #[test]
    fn test_invalid_settings_fail_fast() {
        let settings = LensSettings {
            width: 1,
            ..LensSettings::default()
        };
        assert!(matches!(
            LensComponent::new(&settings),
            Err(LensError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_no_image_no_zoom() {
        let mut lens = lens(50, 50);
        assert!(lens.zoomed_image().is_none());
    }

    #[test]
    fn test_location_round_trip_with_fractional_image_zoom() {
        let mut lens = lens(50, 50);
        lens.set_image(Some(image(400, 400)));
        lens.set_image_zoom_factor(1.5).unwrap();
        lens.set_lens_location(3, 7).unwrap();
        assert_eq!((lens.model().x(), lens.model().y()), (3, 7));
    }

    #[test]
    fn test_zoom_two_on_fifty_lens() {
        let mut lens = lens(50, 50);
        lens.set_image(Some(image(400, 400)));
        lens.set_zoom_factor(2.0).unwrap();
        let zoomed = lens.zoomed_image().unwrap();
        assert_eq!(zoomed.dimensions(), (100, 100));
    }

    #[test]
    fn test_zoom_factor_range() {
        let mut lens = lens(50, 50);
        assert!(lens.set_zoom_factor(0.5).is_err());
        assert!(lens.set_zoom_factor(10.5).is_err());
        assert!(lens.set_zoom_factor(10.0).is_ok());
    }

    #[test]
    fn test_location_outside_image_is_error() {
        let mut lens = lens(50, 50);
        lens.set_image(Some(image(100, 100)));
        assert!(matches!(
            lens.set_lens_location(60, 0),
            Err(LensError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn test_drag_refreshes_preview_and_overlay() {
        let mut lens = lens(50, 50);
        lens.set_image(Some(image(300, 300)));
        lens.set_visible(true);
        assert_eq!(lens.preview().preferred_size(), (100, 100));

        lens.mouse_pressed(25, 25, Modifiers::default());
        assert!(lens.mouse_dragged(45, 35, Modifiers::default()));
        lens.mouse_released(45, 35);

        assert_eq!(lens.overlay().bounds(), ScreenRect::new(20, 10, 50, 50));
        let first = lens.preview().image().unwrap().get_pixel(0, 0);
        assert_eq!(first.0, [20, 10, 7, 255]);
    }

    #[test]
    fn test_hidden_lens_skips_preview() {
        let mut lens = lens(50, 50);
        lens.set_image(Some(image(300, 300)));
        assert!(lens.preview().image().is_none());
    }

    #[test]
    fn test_new_image_resets_buffer_and_refits() {
        let mut lens = lens(200, 200);
        lens.set_image(Some(image(1000, 1000)));
        lens.set_lens_location(700, 700).unwrap();
        lens.set_zoom_factor(4.0).unwrap();
        assert!(lens.zoomed_image().is_some());

        lens.set_image(Some(image(250, 150)));
        assert!(!lens.model().buffer().is_allocated());
        assert_eq!(lens.lens_bounds(), ScreenRect::new(0, 0, 200, 150));
    }

    #[test]
    fn test_preset_size() {
        let mut lens = lens(50, 50);
        lens.set_image(Some(image(500, 500)));
        lens.set_lens_preset_size(4).unwrap();
        assert_eq!(lens.lens_bounds().width, LENS_PRESET_SIZES[4]);
        assert!(lens.set_lens_preset_size(99).is_err());
    }

    #[test]
    fn test_status_text_units() {
        let mut lens = lens(40, 20);
        lens.set_image(Some(image(100, 100)));
        assert_eq!(lens.status_text(), "Lens at (0, 0): 40 x 20 px");

        lens.set_pixel_units(UnitMapping::new(0.5, 0.25));
        lens.set_show_in_microns(true);
        assert_eq!(lens.status_text(), "Lens at (0, 0): 20.00 x 5.00 µm");
    }

    #[test]
    fn test_save_as_writes_zoomed_view() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zoom.png");
        let mut lens = lens(50, 40);
        lens.set_image(Some(image(100, 100)));
        lens.save_as(&path, ExportFormat::Png).unwrap();
        let saved = image::open(&path).unwrap();
        assert_eq!((saved.width(), saved.height()), (100, 80));
    }

    #[test]
    fn test_save_interactive_cancel_does_nothing() {
        let mut lens = lens(50, 50);
        lens.set_image(Some(image(100, 100)));
        let notifier = RecordingNotifier::default();
        let saved = lens.save_interactive(&FixedDialog(None), &notifier, ExportFormat::Png);
        assert!(saved.is_none());
        assert!(notifier.0.borrow().is_empty());
    }

    #[test]
    fn test_save_interactive_appends_extension() {
        let dir = tempfile::tempdir().unwrap();
        let mut lens = lens(50, 50);
        lens.set_image(Some(image(100, 100)));
        let notifier = RecordingNotifier::default();
        let saved = lens
            .save_interactive(
                &FixedDialog(Some(dir.path().join("zoom"))),
                &notifier,
                ExportFormat::Bmp,
            )
            .unwrap();
        assert_eq!(saved, dir.path().join("zoom.bmp"));
        assert!(saved.exists());
    }

    #[test]
    fn test_save_interactive_reports_failure() {
        let mut lens = lens(50, 50);
        lens.set_image(Some(image(100, 100)));
        let notifier = RecordingNotifier::default();
        let saved = lens.save_interactive(
            &FixedDialog(Some(PathBuf::from("zoom.gif"))),
            &notifier,
            ExportFormat::Png,
        );
        assert!(saved.is_none());
        assert_eq!(notifier.0.borrow().len(), 1);
    }

    #[test]
    fn test_save_interactive_without_image_reports() {
        let mut lens = lens(50, 50);
        let notifier = RecordingNotifier::default();
        let dialog = FixedDialog(Some(PathBuf::from("never.png")));
        assert!(lens
            .save_interactive(&dialog, &notifier, ExportFormat::Png)
            .is_none());
        assert_eq!(notifier.0.borrow().len(), 1);
    }

    #[test]
    fn test_clearing_image_keeps_lens_size() {
        let mut lens = lens(100, 100);
        lens.set_image(Some(image(1000, 1000)));
        lens.set_visible(true);
        assert!(lens.preview().image().is_some());

        lens.set_image(None);
        assert_eq!(lens.lens_bounds(), ScreenRect::new(0, 0, 100, 100));
        assert!(lens.preview().image().is_none());

        lens.set_image(Some(image(1000, 1000)));
        assert_eq!(lens.lens_bounds(), ScreenRect::new(0, 0, 100, 100));
        assert_eq!((lens.model().width(), lens.model().height()), (100, 100));
    }

    #[test]
    fn test_image_zoom_before_first_image() {
        let mut lens = lens(100, 100);
        lens.set_image_zoom_factor(2.0).unwrap();
        lens.set_image(Some(image(1000, 1000)));
        assert_eq!(lens.lens_bounds(), ScreenRect::new(0, 0, 200, 200));
        assert_eq!((lens.model().width(), lens.model().height()), (100, 100));
    }

    #[test]
    fn test_location_without_image_is_error() {
        let mut lens = lens(50, 50);
        assert!(matches!(
            lens.set_lens_location(0, 0),
            Err(LensError::NoImage)
        ));
    }

    #[test]
    fn test_drag_after_location_follows_screen_box() {
        let mut lens = lens(50, 50);
        lens.set_image(Some(image(400, 400)));
        lens.set_image_zoom_factor(1.5).unwrap();
        lens.set_lens_location(3, 7).unwrap();
        assert_eq!(lens.lens_bounds(), ScreenRect::new(4, 10, 50, 50));

        lens.mouse_pressed(29, 35, Modifiers::default());
        assert!(lens.mouse_dragged(32, 35, Modifiers::default()));
        assert_eq!(lens.lens_bounds(), ScreenRect::new(7, 10, 50, 50));
        assert_eq!((lens.model().x(), lens.model().y()), (4, 6));
    }

    #[test]
    fn test_handles_follow_settings() {
        let settings = LensSettings {
            width: 40,
            height: 40,
            show_handles: false,
            ..LensSettings::default()
        };
        let mut lens = LensComponent::new(&settings).unwrap();
        lens.set_image(Some(image(100, 100)));
        lens.set_visible(true);

        // A grip would cover the middle of the top edge's inner row.
        let mut canvas = RgbaImage::new(100, 100);
        lens.overlay().paint(&mut canvas);
        assert_eq!(canvas.get_pixel(20, 2)[3], 0);

        lens.set_show_handles(true);
        let mut canvas = RgbaImage::new(100, 100);
        lens.overlay().paint(&mut canvas);
        assert_eq!(canvas.get_pixel(20, 2)[3], 255);
    }
}
