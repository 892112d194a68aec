//! Colours and raster drawing helpers shared by the lens surfaces.
//!
//! All drawing clips against the canvas, so callers can pass boxes that hang
//! off the edge of the displayed image.

use image::{GenericImageView, Rgba, RgbaImage};
use lensview_core::ScreenRect;
use serde::{Deserialize, Serialize};

/// Colours the lens outline can be drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LensColor {
    Red,
    Green,
    Blue,
    Yellow,
    #[default]
    White,
    Black,
    Grey,
}

impl LensColor {
    /// Get the display name for this colour.
    pub fn name(&self) -> &'static str {
        match self {
            LensColor::Red => "Red",
            LensColor::Green => "Green",
            LensColor::Blue => "Blue",
            LensColor::Yellow => "Yellow",
            LensColor::White => "White",
            LensColor::Black => "Black",
            LensColor::Grey => "Grey",
        }
    }

    /// Get all colours in menu order.
    pub fn all() -> &'static [LensColor] {
        &[
            LensColor::Red,
            LensColor::Green,
            LensColor::Blue,
            LensColor::Yellow,
            LensColor::White,
            LensColor::Black,
            LensColor::Grey,
        ]
    }

    pub fn rgba(&self) -> Rgba<u8> {
        match self {
            LensColor::Red => Rgba([255, 0, 0, 255]),
            LensColor::Green => Rgba([0, 255, 0, 255]),
            LensColor::Blue => Rgba([0, 0, 255, 255]),
            LensColor::Yellow => Rgba([255, 255, 0, 255]),
            LensColor::White => Rgba([255, 255, 255, 255]),
            LensColor::Black => Rgba([0, 0, 0, 255]),
            LensColor::Grey => Rgba([128, 128, 128, 255]),
        }
    }
}

/// Intersection of a box with the canvas as `(x0, y0, x1, y1)`, exclusive.
fn clip(canvas: &RgbaImage, rect: &ScreenRect) -> Option<(u32, u32, u32, u32)> {
    let (w, h) = canvas.dimensions();
    let x0 = rect.x.max(0);
    let y0 = rect.y.max(0);
    let x1 = rect.right().min(w as i32);
    let y1 = rect.bottom().min(h as i32);
    if x0 >= x1 || y0 >= y1 {
        return None;
    }
    Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
}

/// Fill a box.
pub fn fill_rect(canvas: &mut RgbaImage, rect: &ScreenRect, color: Rgba<u8>) {
    if let Some((x0, y0, x1, y1)) = clip(canvas, rect) {
        for y in y0..y1 {
            for x in x0..x1 {
                canvas.put_pixel(x, y, color);
            }
        }
    }
}

/// Draw the outline of a box, `thickness` pixels wide, inside its bounds.
pub fn stroke_rect(canvas: &mut RgbaImage, rect: &ScreenRect, thickness: i32, color: Rgba<u8>) {
    let t = thickness.max(1).min(rect.width).min(rect.height);
    if t <= 0 {
        return;
    }
    let top = ScreenRect::new(rect.x, rect.y, rect.width, t);
    let bottom = ScreenRect::new(rect.x, rect.bottom() - t, rect.width, t);
    let left = ScreenRect::new(rect.x, rect.y, t, rect.height);
    let right = ScreenRect::new(rect.right() - t, rect.y, t, rect.height);
    for edge in [top, bottom, left, right] {
        fill_rect(canvas, &edge, color);
    }
}

/// Copy `source` onto the canvas with its top-left corner at `(x, y)`,
/// alpha-blending over what is already there.
pub fn blit<I>(canvas: &mut RgbaImage, source: &I, x: i32, y: i32)
where
    I: GenericImageView<Pixel = Rgba<u8>>,
{
    let (sw, sh) = source.dimensions();
    let target = ScreenRect::new(x, y, sw as i32, sh as i32);
    let Some((x0, y0, x1, y1)) = clip(canvas, &target) else {
        return;
    };
    for cy in y0..y1 {
        for cx in x0..x1 {
            let src = source.get_pixel((cx as i32 - x) as u32, (cy as i32 - y) as u32);
            let dst = canvas.get_pixel_mut(cx, cy);
            *dst = blend(*dst, src);
        }
    }
}

/// Source-over blend of straight-alpha pixels.
fn blend(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    let a = src[3] as u32;
    if a == 255 {
        return src;
    }
    if a == 0 {
        return dst;
    }
    let inv = 255 - a;
    let mix = |s: u8, d: u8| ((s as u32 * a + d as u32 * inv) / 255) as u8;
    let out_a = (a + dst[3] as u32 * inv / 255).min(255) as u8;
    Rgba([
        mix(src[0], dst[0]),
        mix(src[1], dst[1]),
        mix(src[2], dst[2]),
        out_a,
    ])
}
