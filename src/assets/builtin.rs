//! The frame bundled with the application.
//!
//! It is stored as SVG and rasterized at its native size the first time a project is opened
//! without it. Its window is known in advance, so no detection runs for it.

use crate::assets::decode::ImagePayload;
use crate::assets::registry::{AssetId, AssetRegistry, FrameAsset};
use crate::assets::svg_raster::{parse_svg, rasterize_svg_to_premul_rgba8, system_fontdb};
use crate::foundation::error::{CardError, CardResult};
use crate::foundation::math::unpremultiply_rgba8_in_place;
use crate::geometry::mask::Mask;

/// Fixed identifier of the bundled frame.
pub const DEFAULT_FRAME_ID: &str = "builtin-frame-classic";

/// Display name of the bundled frame.
pub const DEFAULT_FRAME_NAME: &str = "Classic";

/// Native size of the bundled frame.
pub const DEFAULT_FRAME_SIZE: (u32, u32) = (1080, 1920);

const DEFAULT_FRAME_SVG: &str = include_str!("../../assets/default_frame.svg");

/// Identifier of the bundled frame as an [`AssetId`].
pub fn default_frame_id() -> AssetId {
    AssetId::new(DEFAULT_FRAME_ID)
}

/// Window cut into the bundled frame, in its native pixels.
pub fn default_frame_mask() -> Mask {
    Mask {
        x: 140.0,
        y: 260.0,
        width: 800.0,
        height: 1000.0,
    }
}

/// Rasterize the bundled frame into a PNG-backed [`FrameAsset`].
pub fn default_frame() -> CardResult<FrameAsset> {
    let (width, height) = DEFAULT_FRAME_SIZE;
    let tree = parse_svg(DEFAULT_FRAME_SVG, system_fontdb())?;
    let mut rgba = rasterize_svg_to_premul_rgba8(&tree, width, height)?;
    unpremultiply_rgba8_in_place(&mut rgba);

    let png = crate::export::image::encode_png(width, height, &rgba)
        .map_err(|e| CardError::render(format!("encode bundled frame: {e}")))?;
    Ok(FrameAsset {
        id: default_frame_id(),
        name: DEFAULT_FRAME_NAME.to_owned(),
        payload: ImagePayload::from_bytes(png)?,
        width,
        height,
        mask: Some(default_frame_mask()),
    })
}

/// Prepend the bundled frame if the collection does not already hold it.
///
/// Returns `true` when the frame was added.
pub fn ensure_default_frame(frames: &mut AssetRegistry<FrameAsset>) -> CardResult<bool> {
    if frames.contains(&default_frame_id()) {
        return Ok(false);
    }
    frames.prepend(default_frame()?);
    tracing::debug!(id = DEFAULT_FRAME_ID, "bundled frame added");
    Ok(true)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/builtin.rs"]
mod tests;
