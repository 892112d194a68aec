//! Icon strip for the hierarchy browser.

use image::{Rgba, RgbaImage};
use lensview_core::ScreenRect;

use super::tree::HierarchyTree;
use crate::icons::IconProvider;
use crate::paint::{blit, fill_rect};

const SELECTION: Rgba<u8> = Rgba([60, 90, 140, 255]);

/// Paint one icon per visible row, indented by depth.
///
/// Returns `None` when there is nothing to draw. Names are left to the
/// caller's text renderer.
pub fn render_rows(
    tree: &HierarchyTree,
    icons: &mut IconProvider,
    row_height: u32,
    indent: u32,
) -> Option<RgbaImage> {
    let rows = tree.visible_rows();
    if rows.is_empty() || row_height == 0 {
        return None;
    }

    let max_depth = rows.iter().map(|r| r.depth).max().unwrap_or(0) as u32;
    let width = max_depth * indent + row_height;
    let height = rows.len() as u32 * row_height;
    let mut canvas = RgbaImage::new(width, height);

    for (i, row) in rows.iter().enumerate() {
        let y = (i as u32 * row_height) as i32;
        if row.selected {
            fill_rect(
                &mut canvas,
                &ScreenRect::new(0, y, width as i32, row_height as i32),
                SELECTION,
            );
        }
        let x = (row.depth as u32 * indent) as i32;
        match icons.icon(row.key.kind.icon(), row_height) {
            Some(icon) => blit(&mut canvas, icon, x, y),
            None => log::warn!("No icon for {:?}", row.key.kind),
        }
    }

    Some(canvas)
}
