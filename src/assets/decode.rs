use std::sync::Arc;

use base64::Engine as _;

use crate::foundation::error::{CardError, CardResult};
use crate::foundation::math::premultiply_rgba8_in_place;

/// A decoded raster in straight-alpha RGBA8.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedImage {
    /// Width in pixels (> 0).
    pub width: u32,
    /// Height in pixels (> 0).
    pub height: u32,
    /// Row-major, tightly packed, straight alpha.
    pub rgba8: Arc<Vec<u8>>,
}

impl DecodedImage {
    /// Borrow as an `image` buffer.
    pub fn to_rgba_image(&self) -> CardResult<image::RgbaImage> {
        image::RgbaImage::from_raw(self.width, self.height, self.rgba8.as_ref().clone())
            .ok_or_else(|| CardError::decode("decoded pixel buffer length mismatch"))
    }

    /// Premultiplied copy of the pixels, as consumed by the renderers.
    pub fn premultiplied(&self) -> Vec<u8> {
        let mut out = self.rgba8.as_ref().clone();
        premultiply_rgba8_in_place(&mut out);
        out
    }
}

/// Decode PNG / JPEG / WebP bytes.
///
/// Zero-sized images are rejected so downstream geometry never divides by zero.
pub fn decode_image(bytes: &[u8]) -> CardResult<DecodedImage> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| CardError::decode(format!("decode image from memory: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(CardError::decode("image has zero width or height"));
    }
    Ok(DecodedImage {
        width,
        height,
        rgba8: Arc::new(rgba.into_raw()),
    })
}

/// MIME type of a supported image payload.
pub fn sniff_mime(bytes: &[u8]) -> CardResult<&'static str> {
    let format = image::guess_format(bytes)
        .map_err(|e| CardError::decode(format!("unrecognized image format: {e}")))?;
    match format {
        image::ImageFormat::Png => Ok("image/png"),
        image::ImageFormat::Jpeg => Ok("image/jpeg"),
        image::ImageFormat::WebP => Ok("image/webp"),
        other => Err(CardError::decode(format!(
            "unsupported image format {other:?} (expected PNG, JPEG or WebP)"
        ))),
    }
}

/// Raw encoded image bytes plus MIME type, persisted as a `data:` URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImagePayload {
    mime: String,
    bytes: Arc<Vec<u8>>,
}

impl ImagePayload {
    /// Wrap encoded bytes, sniffing the MIME type.
    pub fn from_bytes(bytes: Vec<u8>) -> CardResult<Self> {
        let mime = sniff_mime(&bytes)?;
        Ok(Self {
            mime: mime.to_owned(),
            bytes: Arc::new(bytes),
        })
    }

    /// MIME type, e.g. `image/png`.
    pub fn mime(&self) -> &str {
        &self.mime
    }

    /// Encoded bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// `true` when both payloads share the same byte buffer.
    pub(crate) fn shares_bytes(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.bytes, &other.bytes)
    }

    /// Encoded size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// `true` for an empty payload.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Decode the payload.
    pub fn decode(&self) -> CardResult<DecodedImage> {
        decode_image(&self.bytes)
    }

    /// `data:<mime>;base64,<...>` form.
    pub fn to_data_url(&self) -> String {
        let b64 = base64::engine::general_purpose::STANDARD.encode(self.bytes.as_slice());
        format!("data:{};base64,{b64}", self.mime)
    }

    /// Parse a base64 `data:` URL.
    pub fn from_data_url(url: &str) -> CardResult<Self> {
        let rest = url
            .strip_prefix("data:")
            .ok_or_else(|| CardError::decode("payload is not a data: URL"))?;
        let (meta, data) = rest
            .split_once(',')
            .ok_or_else(|| CardError::decode("data: URL has no ',' separator"))?;
        let mime = meta
            .strip_suffix(";base64")
            .ok_or_else(|| CardError::decode("data: URL is not base64 encoded"))?;
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(data)
            .map_err(|e| CardError::decode(format!("invalid base64 payload: {e}")))?;
        Ok(Self {
            mime: mime.to_owned(),
            bytes: Arc::new(bytes),
        })
    }
}

impl serde::Serialize for ImagePayload {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_data_url())
    }
}

impl<'de> serde::Deserialize<'de> for ImagePayload {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_data_url(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
