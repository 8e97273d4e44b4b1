use crate::geometry::mask::Mask;

/// Pixels with alpha strictly below this are treated as a transparent hole.
pub const TRANSPARENT_ALPHA_MAX: u8 = 10;
/// Pixels with alpha strictly above this can count as a near-white placeholder.
pub const OPAQUE_ALPHA_MIN: u8 = 240;
/// Every color channel must be strictly above this for a near-white placeholder pixel.
pub const WHITE_CHANNEL_MIN: u8 = 240;
/// Detected regions narrower or shorter than this are discarded.
pub const MIN_WINDOW_SIDE: u32 = 50;
/// Margin added around a detected bounding box (clamped to the image).
pub const WINDOW_PADDING: u32 = 5;

/// Where a detected mask came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaskSource {
    /// Bounding box of transparent / near-white pixels, padded.
    Detected,
    /// No usable region; the default inset rectangle was used.
    Fallback,
}

/// Result of [`detect_mask`]. Detection never fails; an inconclusive scan yields a fallback.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MaskDetection {
    /// Window in the frame's native pixel coordinates.
    pub mask: Mask,
    /// Detected or fallback.
    pub source: MaskSource,
}

/// Return `true` if a straight-alpha RGBA pixel belongs to a photo window.
pub fn is_window_pixel(px: [u8; 4]) -> bool {
    let [r, g, b, a] = px;
    a < TRANSPARENT_ALPHA_MAX
        || (a > OPAQUE_ALPHA_MIN
            && r > WHITE_CHANNEL_MIN
            && g > WHITE_CHANNEL_MIN
            && b > WHITE_CHANNEL_MIN)
}

/// Detect the photo window of a decoded frame image.
pub fn detect_mask(image: &image::RgbaImage) -> MaskDetection {
    let (width, height) = image.dimensions();
    detect_mask_rgba8(image.as_raw(), width, height)
}

/// Detect the photo window from tightly packed straight-alpha RGBA8 rows.
///
/// Deterministic and `O(width * height)`. Buffers whose length does not match the dimensions are
/// treated as inconclusive.
#[tracing::instrument(skip(rgba))]
pub fn detect_mask_rgba8(rgba: &[u8], width: u32, height: u32) -> MaskDetection {
    let fallback = MaskDetection {
        mask: Mask::fallback_for(width, height),
        source: MaskSource::Fallback,
    };

    let expected = (width as usize)
        .saturating_mul(height as usize)
        .saturating_mul(4);
    if width == 0 || height == 0 || rgba.len() != expected {
        tracing::debug!(len = rgba.len(), expected, "pixel buffer unusable, using fallback");
        return fallback;
    }

    let mut min_x = u32::MAX;
    let mut min_y = u32::MAX;
    let mut max_x = 0u32;
    let mut max_y = 0u32;
    let mut found = false;

    for (y, row) in rgba.chunks_exact(width as usize * 4).enumerate() {
        let y = y as u32;
        for (x, px) in row.chunks_exact(4).enumerate() {
            if !is_window_pixel([px[0], px[1], px[2], px[3]]) {
                continue;
            }
            let x = x as u32;
            found = true;
            min_x = min_x.min(x);
            max_x = max_x.max(x);
            min_y = min_y.min(y);
            max_y = max_y.max(y);
        }
    }

    if !found {
        tracing::debug!("no window pixels found, using fallback");
        return fallback;
    }

    let box_w = max_x - min_x + 1;
    let box_h = max_y - min_y + 1;
    if box_w < MIN_WINDOW_SIDE || box_h < MIN_WINDOW_SIDE {
        tracing::debug!(box_w, box_h, "window region too small, using fallback");
        return fallback;
    }

    let x0 = min_x.saturating_sub(WINDOW_PADDING);
    let y0 = min_y.saturating_sub(WINDOW_PADDING);
    let x1 = (max_x + 1).saturating_add(WINDOW_PADDING).min(width);
    let y1 = (max_y + 1).saturating_add(WINDOW_PADDING).min(height);

    MaskDetection {
        mask: Mask {
            x: f64::from(x0),
            y: f64::from(y0),
            width: f64::from(x1 - x0),
            height: f64::from(y1 - y0),
        },
        source: MaskSource::Detected,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/detect.rs"]
mod tests;
