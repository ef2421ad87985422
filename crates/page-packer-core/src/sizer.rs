use image::RgbaImage;

use crate::config::PageConfig;
use crate::model::Rectangle;

/// Pixel-space bounding box, top-left origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

/// Minimal bounding box of pixels with alpha above `threshold`.
///
/// Fully transparent images fall back to the full frame, so every input
/// yields a usable region; opaque images are returned untrimmed.
pub fn visible_bbox(rgba: &RgbaImage, threshold: u8) -> PixelRect {
    let (w, h) = rgba.dimensions();
    let full = PixelRect { x: 0, y: 0, w, h };
    if w == 0 || h == 0 {
        return full;
    }
    let mut x1 = 0;
    let mut y1 = 0;
    let mut x2 = w - 1;
    let mut y2 = h - 1;
    // left
    while x1 < w {
        let mut all_transparent = true;
        for y in 0..h {
            if rgba.get_pixel(x1, y)[3] > threshold {
                all_transparent = false;
                break;
            }
        }
        if all_transparent {
            x1 += 1;
        } else {
            break;
        }
    }
    if x1 >= w {
        return full;
    }
    // right
    while x2 > x1 {
        let mut all_transparent = true;
        for y in 0..h {
            if rgba.get_pixel(x2, y)[3] > threshold {
                all_transparent = false;
                break;
            }
        }
        if all_transparent {
            x2 -= 1;
        } else {
            break;
        }
    }
    // top
    while y1 < h {
        let mut all_transparent = true;
        for x in x1..=x2 {
            if rgba.get_pixel(x, y1)[3] > threshold {
                all_transparent = false;
                break;
            }
        }
        if all_transparent {
            y1 += 1;
        } else {
            break;
        }
    }
    // bottom
    while y2 > y1 {
        let mut all_transparent = true;
        for x in x1..=x2 {
            if rgba.get_pixel(x, y2)[3] > threshold {
                all_transparent = false;
                break;
            }
        }
        if all_transparent {
            y2 -= 1;
        } else {
            break;
        }
    }
    PixelRect {
        x: x1,
        y: y1,
        w: x2 - x1 + 1,
        h: y2 - y1 + 1,
    }
}

/// Scales a trimmed pixel size into a `Rectangle` whose larger dimension
/// meets its configured cap, aspect ratio preserved.
pub fn sized_rect(id: impl Into<String>, w_px: u32, h_px: u32, cfg: &PageConfig) -> Rectangle {
    let id = id.into();
    if w_px == 0 || h_px == 0 {
        return Rectangle::degenerate(id);
    }
    let (w, h) = (w_px as f64, h_px as f64);
    let scale = (cfg.max_rect_width / w).min(cfg.max_rect_height / h);
    Rectangle::new(id, w * scale, h * scale)
}
