use std::io::Cursor;

use crate::foundation::color::Rgba8;
use crate::foundation::error::{CardError, CardResult};
use crate::foundation::math::{
    add_sat_u8, mul_div255_u8, premultiply_rgba8_in_place, unpremultiply_rgba8_in_place,
};
use crate::render::backend::FrameRGBA;

/// Encode straight-alpha RGBA8 pixels as PNG.
pub fn encode_png(width: u32, height: u32, rgba: &[u8]) -> CardResult<Vec<u8>> {
    let img = image::RgbaImage::from_raw(width, height, rgba.to_vec())
        .ok_or_else(|| CardError::export("rgba buffer length does not match dimensions"))?;
    let mut out = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
        .map_err(|e| CardError::export(format!("png encode failed: {e}")))?;
    Ok(out)
}

/// Straight-alpha copy of a rendered frame.
pub fn straight_rgba8(frame: &FrameRGBA) -> Vec<u8> {
    let mut data = frame.data.clone();
    if frame.premultiplied {
        unpremultiply_rgba8_in_place(&mut data);
    }
    data
}

/// Flatten a rendered frame onto `matte`, dropping alpha.
pub fn flatten_rgb8(frame: &FrameRGBA, matte: Rgba8) -> Vec<u8> {
    let mut premul = frame.data.clone();
    if !frame.premultiplied {
        premultiply_rgba8_in_place(&mut premul);
    }
    let mut out = Vec::with_capacity((frame.width as usize) * (frame.height as usize) * 3);
    for px in premul.chunks_exact(4) {
        let inv = 255 - u16::from(px[3]);
        out.push(add_sat_u8(px[0], mul_div255_u8(u16::from(matte.r), inv)));
        out.push(add_sat_u8(px[1], mul_div255_u8(u16::from(matte.g), inv)));
        out.push(add_sat_u8(px[2], mul_div255_u8(u16::from(matte.b), inv)));
    }
    out
}

/// Encode a rendered frame as PNG, keeping transparency.
pub fn frame_to_png(frame: &FrameRGBA) -> CardResult<Vec<u8>> {
    encode_png(frame.width, frame.height, &straight_rgba8(frame))
}

/// Encode a rendered frame as baseline JPEG at `quality` (1..=100), flattened onto `matte`.
pub fn frame_to_jpeg(frame: &FrameRGBA, quality: u8, matte: Rgba8) -> CardResult<Vec<u8>> {
    let rgb = flatten_rgb8(frame, matte);
    let mut out = Vec::new();
    let mut enc =
        image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, quality.clamp(1, 100));
    enc.encode(
        &rgb,
        frame.width,
        frame.height,
        image::ExtendedColorType::Rgb8,
    )
    .map_err(|e| CardError::export(format!("jpeg encode failed: {e}")))?;
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/export/image.rs"]
mod tests;
