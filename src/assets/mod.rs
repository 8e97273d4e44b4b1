/// Bundled default frame.
pub mod builtin;
/// Image decoding and data-URL payloads.
pub mod decode;
/// Frame and photo collections.
pub mod registry;
pub(crate) mod svg_raster;
