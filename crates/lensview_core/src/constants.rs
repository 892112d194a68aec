//! Lens sizing and zoom limits.

/// Smallest lens extent on screen, in pixels.
pub const MIN_LENS_SIZE: i32 = 20;

/// Largest lens extent on screen, in pixels.
pub const MAX_LENS_SIZE: i32 = 400;

/// Lens extent used when nothing else is configured.
pub const DEFAULT_LENS_SIZE: i32 = 100;

/// Preset lens extents offered to the user.
pub const LENS_PRESET_SIZES: &[i32] = &[40, 60, 80, 100, 150, 200, 250, 300, 350, 400];

/// Magnification used for the preview when nothing else is configured.
pub const DEFAULT_ZOOM_FACTOR: f32 = 2.0;

/// Lowest preview magnification.
pub const MIN_ZOOM_FACTOR: f32 = 1.0;

/// Highest preview magnification.
pub const MAX_ZOOM_FACTOR: f32 = 10.0;

/// Preset preview magnifications.
pub const ZOOM_PRESETS: &[f32] = &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];

/// Width of the band along the lens edge that starts a resize, in screen pixels.
pub const BORDER_HIT_WIDTH: i32 = 6;

/// Pixel capacity the zoom buffer never shrinks below: a default lens at
/// default magnification (200 x 200).
pub const BUFFER_FLOOR_PIXELS: usize = 200 * 200;

/// Bytes per RGBA pixel.
pub const BYTES_PER_PIXEL: usize = 4;
