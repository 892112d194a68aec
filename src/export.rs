//! Saving the magnified view to disk.
//!
//! The zoomed raster is written as JPEG, PNG, TIFF or BMP. JPEG and BMP are
//! written without alpha. Choosing the file and reporting failures go through
//! the [`SaveDialog`] and [`Notifier`] traits so the lens does not depend on
//! a particular windowing toolkit.

use std::ops::Deref;
use std::path::{Path, PathBuf};

use image::{ExtendedColorType, ImageBuffer, ImageFormat, Rgba};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while exporting the zoomed view.
#[derive(Error, Debug)]
pub enum ExportError {
    /// I/O error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Encoder failure
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// The file name does not map to a supported format
    #[error("Unsupported file extension: {path:?}")]
    UnknownExtension {
        /// The rejected path
        path: PathBuf,
    },

    /// There is no zoomed image to save
    #[error("Nothing to export: the lens shows no image")]
    NothingToExport,
}

pub type Result<T> = std::result::Result<T, ExportError>;

/// Raster formats the zoomed view can be saved as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Jpeg,
    #[default]
    Png,
    Tiff,
    Bmp,
}

impl ExportFormat {
    /// Get all formats in menu order.
    pub fn all() -> &'static [ExportFormat] {
        &[
            ExportFormat::Jpeg,
            ExportFormat::Png,
            ExportFormat::Tiff,
            ExportFormat::Bmp,
        ]
    }

    /// Human-readable name for dialogs.
    pub fn display_name(&self) -> &'static str {
        match self {
            ExportFormat::Jpeg => "JPEG",
            ExportFormat::Png => "PNG",
            ExportFormat::Tiff => "TIFF",
            ExportFormat::Bmp => "BMP",
        }
    }

    /// File extensions, preferred first.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            ExportFormat::Jpeg => &["jpg", "jpeg"],
            ExportFormat::Png => &["png"],
            ExportFormat::Tiff => &["tif", "tiff"],
            ExportFormat::Bmp => &["bmp"],
        }
    }

    pub fn preferred_extension(&self) -> &'static str {
        self.extensions()[0]
    }

    /// Find the format for an extension, ignoring case.
    pub fn from_extension(ext: &str) -> Option<Self> {
        let lower = ext.to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|f| f.extensions().iter().any(|e| *e == lower))
    }

    /// Find the format for a path from its extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Whether the format keeps the alpha channel.
    pub fn keeps_alpha(&self) -> bool {
        matches!(self, ExportFormat::Png | ExportFormat::Tiff)
    }

    fn image_format(&self) -> ImageFormat {
        match self {
            ExportFormat::Jpeg => ImageFormat::Jpeg,
            ExportFormat::Png => ImageFormat::Png,
            ExportFormat::Tiff => ImageFormat::Tiff,
            ExportFormat::Bmp => ImageFormat::Bmp,
        }
    }

    /// Default file name offered in the save dialog.
    pub fn default_filename(&self) -> String {
        format!("lens_zoom.{}", self.preferred_extension())
    }
}

/// Work out the file and format to write.
///
/// A path without an extension gets the fallback format's extension. A path
/// with an unknown extension is rejected.
pub fn resolve_target(path: &Path, fallback: ExportFormat) -> Result<(PathBuf, ExportFormat)> {
    match path.extension() {
        None => Ok((
            path.with_extension(fallback.preferred_extension()),
            fallback,
        )),
        Some(_) => ExportFormat::from_path(path)
            .map(|format| (path.to_path_buf(), format))
            .ok_or_else(|| ExportError::UnknownExtension {
                path: path.to_path_buf(),
            }),
    }
}

/// Write an RGBA raster in the given format.
pub fn save_image<C>(image: &ImageBuffer<Rgba<u8>, C>, path: &Path, format: ExportFormat) -> Result<()>
where
    C: Deref<Target = [u8]>,
{
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(ExportError::NothingToExport);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let raw: &[u8] = image.as_raw();
    if format.keeps_alpha() {
        image::save_buffer_with_format(
            path,
            raw,
            width,
            height,
            ExtendedColorType::Rgba8,
            format.image_format(),
        )?;
    } else {
        let rgb: Vec<u8> = raw
            .chunks_exact(4)
            .flat_map(|px| [px[0], px[1], px[2]])
            .collect();
        image::save_buffer_with_format(
            path,
            &rgb,
            width,
            height,
            ExtendedColorType::Rgb8,
            format.image_format(),
        )?;
    }

    log::info!(
        "Saved {}x{} {} image to {:?}",
        width,
        height,
        format.display_name(),
        path
    );
    Ok(())
}

// ============================================================================
// Dialog seams
// ============================================================================

/// Asks the user where to save.
pub trait SaveDialog {
    /// Return the chosen path, or `None` if the user cancelled.
    fn choose_path(&self, default_name: &str, formats: &[ExportFormat]) -> Option<PathBuf>;
}

/// Reports outcomes to the user.
pub trait Notifier {
    /// Show a blocking error message.
    fn error(&self, title: &str, message: &str);
}

/// Native file dialog and message box.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default, Clone, Copy)]
pub struct RfdDialogs;

#[cfg(not(target_arch = "wasm32"))]
impl SaveDialog for RfdDialogs {
    fn choose_path(&self, default_name: &str, formats: &[ExportFormat]) -> Option<PathBuf> {
        let mut dialog = rfd::FileDialog::new().set_file_name(default_name);
        for format in formats {
            dialog = dialog.add_filter(format.display_name(), format.extensions());
        }
        dialog.save_file()
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl Notifier for RfdDialogs {
    fn error(&self, title: &str, message: &str) {
        rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Error)
            .set_title(title)
            .set_description(message)
            .set_buttons(rfd::MessageButtons::Ok)
            .show();
    }
}

/// Notifier that only logs, for headless use.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn error(&self, title: &str, message: &str) {
        log::error!("{}: {}", title, message);
    }
}
