//! Icon loading and rasterization.
//!
//! Icons are small SVG documents embedded in the binary and rasterized with
//! resvg/tiny-skia on first use. An [`IconProvider`] is created by the caller
//! and handed to whatever needs icons; each provider keeps its own cache.

use std::collections::HashMap;

use image::{Rgba, RgbaImage};

/// Icons known to the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IconId {
    Project,
    Dataset,
    Image,
    CategoryGroup,
    Category,
    Lens,
    ZoomIn,
    ZoomOut,
    Save,
}

impl IconId {
    pub fn all() -> &'static [IconId] {
        &[
            IconId::Project,
            IconId::Dataset,
            IconId::Image,
            IconId::CategoryGroup,
            IconId::Category,
            IconId::Lens,
            IconId::ZoomIn,
            IconId::ZoomOut,
            IconId::Save,
        ]
    }

    fn svg(&self) -> &'static str {
        match self {
            IconId::Project => svg::FOLDER,
            IconId::Dataset => svg::FOLDER_OPEN,
            IconId::Image => svg::IMAGE,
            IconId::CategoryGroup => svg::TAGS,
            IconId::Category => svg::TAG,
            IconId::Lens => svg::LENS,
            IconId::ZoomIn => svg::ZOOM_IN,
            IconId::ZoomOut => svg::ZOOM_OUT,
            IconId::Save => svg::SAVE,
        }
    }
}

/// Rasterizes and caches icons in one colour.
#[derive(Debug, Clone)]
pub struct IconProvider {
    color: [u8; 4],
    cache: HashMap<(IconId, u32), RgbaImage>,
}

impl IconProvider {
    /// Create a provider drawing icons in the given RGBA colour.
    pub fn new(color: [u8; 4]) -> Self {
        Self {
            color,
            cache: HashMap::new(),
        }
    }

    /// Get an icon, rasterizing it on first use.
    pub fn icon(&mut self, id: IconId, size: u32) -> Option<&RgbaImage> {
        let key = (id, size);
        if !self.cache.contains_key(&key) {
            let image = rasterize_svg(id.svg(), size, self.color)?;
            self.cache.insert(key, image);
        }
        self.cache.get(&key)
    }

    /// Rasterize a set of icons up front.
    pub fn preload(&mut self, ids: &[IconId], size: u32) {
        for id in ids {
            if self.icon(*id, size).is_none() {
                log::warn!("Failed to rasterize icon {:?}", id);
            }
        }
    }

    /// Number of cached rasters.
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    /// Drop all cached rasters.
    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

impl Default for IconProvider {
    fn default() -> Self {
        Self::new([224, 224, 224, 255])
    }
}

/// Rasterize an SVG into a `size` x `size` straight-alpha RGBA image.
///
/// `currentColor` in the document is replaced by `color`.
pub fn rasterize_svg(svg_data: &str, size: u32, color: [u8; 4]) -> Option<RgbaImage> {
    if size == 0 {
        return None;
    }

    let hex_color = format!("#{:02x}{:02x}{:02x}", color[0], color[1], color[2]);
    let svg_with_color = svg_data.replace("currentColor", &hex_color);

    let tree = match resvg::usvg::Tree::from_str(&svg_with_color, &resvg::usvg::Options::default())
    {
        Ok(t) => t,
        Err(e) => {
            log::error!("Failed to parse SVG: {:?}", e);
            return None;
        }
    };

    let svg_size = tree.size();
    let scale = size as f32 / svg_size.width().max(svg_size.height());

    let Some(mut pixmap) = tiny_skia::Pixmap::new(size, size) else {
        log::error!("Failed to create pixmap {}x{}", size, size);
        return None;
    };

    let transform = tiny_skia::Transform::from_scale(scale, scale);
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    let alpha = color[3] as u16;
    let mut image = RgbaImage::new(size, size);
    for (dst, src) in image.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        let a = (c.alpha() as u16 * alpha / 255) as u8;
        *dst = Rgba([c.red(), c.green(), c.blue(), a]);
    }

    log::debug!("Rasterized {}x{} icon", size, size);
    Some(image)
}

/// Built-in icon documents.
mod svg {
    pub const FOLDER: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="16" height="16" viewBox="0 0 16 16"><path fill="currentColor" d="M1 3h5l1.5 2H15v8H1z"/></svg>"#;
    pub const FOLDER_OPEN: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="16" height="16" viewBox="0 0 16 16"><path fill="currentColor" d="M1 3h5l1.5 2H13v2H4l-3 6z"/><path fill="currentColor" d="M4 8h11l-3 5H1z"/></svg>"#;
    pub const IMAGE: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="16" height="16" viewBox="0 0 16 16"><rect x="1" y="2" width="14" height="12" fill="none" stroke="currentColor" stroke-width="1.5"/><path fill="currentColor" d="M2 13l4-5 3 3 2-2 4 4z"/></svg>"#;
    pub const TAGS: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="16" height="16" viewBox="0 0 16 16"><path fill="currentColor" d="M1 2h6l7 7-5 5-8-8z"/><path fill="none" stroke="currentColor" d="M9 2l6 6"/></svg>"#;
    pub const TAG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="16" height="16" viewBox="0 0 16 16"><path fill="currentColor" d="M1 1h7l7 7-7 7-7-7z"/></svg>"#;
    pub const LENS: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="16" height="16" viewBox="0 0 16 16"><circle cx="6.5" cy="6.5" r="5" fill="none" stroke="currentColor" stroke-width="2"/><path stroke="currentColor" stroke-width="2.5" d="M10 10l5 5"/></svg>"#;
    pub const ZOOM_IN: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="16" height="16" viewBox="0 0 16 16"><circle cx="6.5" cy="6.5" r="5" fill="none" stroke="currentColor" stroke-width="1.5"/><path stroke="currentColor" stroke-width="1.5" d="M4 6.5h5M6.5 4v5M10 10l5 5"/></svg>"#;
    pub const ZOOM_OUT: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="16" height="16" viewBox="0 0 16 16"><circle cx="6.5" cy="6.5" r="5" fill="none" stroke="currentColor" stroke-width="1.5"/><path stroke="currentColor" stroke-width="1.5" d="M4 6.5h5M10 10l5 5"/></svg>"#;
    pub const SAVE: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="16" height="16" viewBox="0 0 16 16"><path fill="currentColor" d="M1 1h11l3 3v11H1z"/><rect x="4" y="2" width="7" height="4" fill="white"/></svg>"#;
}
