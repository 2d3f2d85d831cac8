//! Pixel-level helpers for the software renderer

use glam::{DVec2, Vec2};
use image::RgbaImage;

use super::FRect;
use crate::color::{BlendMode, Color};

/// `a * b / 255`, rounded.
#[inline]
pub(super) fn mul8(a: u8, b: u8) -> u8 {
    ((a as u32 * b as u32 + 127) / 255) as u8
}

/// Combine `src` onto `dst`.
pub(super) fn blend(dst: [u8; 4], src: [u8; 4], mode: BlendMode) -> [u8; 4] {
    let sa = src[3];
    let inv = 255 - sa;
    let mut out = dst;
    match mode {
        BlendMode::None => return src,
        BlendMode::Blend => {
            for i in 0..3 {
                out[i] = mul8(src[i], sa).saturating_add(mul8(dst[i], inv));
            }
            out[3] = sa.saturating_add(mul8(dst[3], inv));
        }
        BlendMode::Add => {
            for i in 0..3 {
                out[i] = mul8(src[i], sa).saturating_add(dst[i]);
            }
        }
        BlendMode::Mod => {
            for i in 0..3 {
                out[i] = mul8(src[i], dst[i]);
            }
        }
        BlendMode::Mul => {
            for i in 0..3 {
                out[i] = mul8(src[i], dst[i]).saturating_add(mul8(dst[i], inv));
            }
        }
    }
    out
}

/// Blend one pixel, ignoring coordinates outside the image.
#[inline]
pub(super) fn put(img: &mut RgbaImage, x: i32, y: i32, color: [u8; 4], mode: BlendMode) {
    if x < 0 || y < 0 || x >= img.width() as i32 || y >= img.height() as i32 {
        return;
    }
    let pixel = img.get_pixel_mut(x as u32, y as u32);
    pixel.0 = blend(pixel.0, color, mode);
}

/// Half-open integer span covered by `start..start + len`.
#[inline]
pub(super) fn span(start: f32, len: f32) -> (i32, i32) {
    (start.round() as i32, (start + len).round() as i32)
}

/// Clip the segment `a..b` to `min..max` (Liang-Barsky, in f64). `None` when it
/// misses the box or has non-finite endpoints.
pub(super) fn clip_segment(a: DVec2, b: DVec2, min: DVec2, max: DVec2) -> Option<(DVec2, DVec2)> {
    if !(a.is_finite() && b.is_finite()) {
        return None;
    }
    let d = b - a;
    let (mut t0, mut t1) = (0.0f64, 1.0f64);
    let edges = [
        (-d.x, a.x - min.x),
        (d.x, max.x - a.x),
        (-d.y, a.y - min.y),
        (d.y, max.y - a.y),
    ];
    for (p, q) in edges {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }
    let from = if t0 > 0.0 { a + d * t0 } else { a };
    let to = if t1 < 1.0 { a + d * t1 } else { b };
    Some((from, to))
}

/// Bresenham line, both endpoints included.
///
/// The segment is clipped to the image (with a one pixel margin) first, so
/// the walk is bounded by the image size.
pub(super) fn line(img: &mut RgbaImage, from: Vec2, to: Vec2, color: Color, mode: BlendMode) {
    let max = DVec2::new(img.width() as f64, img.height() as f64);
    let Some((from, to)) = clip_segment(from.as_dvec2(), to.as_dvec2(), DVec2::splat(-1.0), max)
    else {
        return;
    };

    let (mut x0, mut y0) = (from.x.floor() as i64, from.y.floor() as i64);
    let (x1, y1) = (to.x.floor() as i64, to.y.floor() as i64);
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let rgba = color.to_array();

    loop {
        put(img, x0 as i32, y0 as i32, rgba, mode);
        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}

pub(super) fn fill(img: &mut RgbaImage, rect: FRect, color: Color, mode: BlendMode) {
    let (x0, x1) = span(rect.x, rect.w);
    let (y0, y1) = span(rect.y, rect.h);
    let x0 = x0.max(0);
    let y0 = y0.max(0);
    let x1 = x1.min(img.width() as i32);
    let y1 = y1.min(img.height() as i32);
    for y in y0..y1 {
        for x in x0..x1 {
            put(img, x, y, color.to_array(), mode);
        }
    }
}

/// One pixel wide rectangle outline. Corners are touched once.
pub(super) fn outline(img: &mut RgbaImage, rect: FRect, color: Color, mode: BlendMode) {
    let (x0, x1) = span(rect.x, rect.w);
    let (y0, y1) = span(rect.y, rect.h);
    if x1 <= x0 || y1 <= y0 {
        return;
    }
    let rgba = color.to_array();
    let (right, bottom) = (x1 - 1, y1 - 1);

    let (w, h) = (img.width() as i32, img.height() as i32);
    for x in x0.max(0)..x1.min(w) {
        put(img, x, y0, rgba, mode);
        if bottom != y0 {
            put(img, x, bottom, rgba, mode);
        }
    }
    for y in (y0 + 1).max(0)..bottom.min(h) {
        put(img, x0, y, rgba, mode);
        if right != x0 {
            put(img, right, y, rgba, mode);
        }
    }
}
