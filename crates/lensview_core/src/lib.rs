//! lensview_core - toolkit-independent lens geometry and magnification.
//!
//! The lens is a box laid over a displayed image. The [`LensController`]
//! turns pointer gestures into validated box changes, and the [`LensModel`]
//! keeps the resulting geometry in source-image pixels and produces the
//! magnified crop shown in the zoom preview.

pub mod buffer;
pub mod constants;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod handle;
pub mod model;

pub use buffer::ZoomBuffer;
pub use controller::{Delta, DragMode, LensController, Modifiers};
pub use error::{LensError, Result};
pub use geometry::{LensGeometry, ScreenRect};
pub use handle::{HitRegion, ResizeHandle};
pub use model::{LensModel, ZoomedImage};
