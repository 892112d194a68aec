//! lensview - a magnifying lens for image viewers.
//!
//! Geometry, pointer handling and magnification live in [`lensview_core`].
//! This crate adds the surfaces around it: the overlay drawn on the viewer,
//! the zoom preview, export to raster files, unit display, icons and the
//! data/classification hierarchy browser model.

pub mod component;
pub mod config;
pub mod export;
pub mod hierarchy;
pub mod icons;
pub mod overlay;
pub mod paint;
pub mod preview;
pub mod units;

pub use component::LensComponent;
pub use config::{AppConfig, ConfigError, LensSettings, LogLevel};
pub use export::{ExportError, ExportFormat, LogNotifier, Notifier, SaveDialog};
pub use hierarchy::{HierarchyError, HierarchyTree};
pub use icons::{IconId, IconProvider};
pub use overlay::LensOverlay;
pub use paint::LensColor;
pub use preview::ZoomPreview;
pub use units::UnitMapping;

#[cfg(not(target_arch = "wasm32"))]
pub use export::RfdDialogs;
