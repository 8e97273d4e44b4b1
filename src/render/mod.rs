//! Compositing and rasterization.
//!
//! [`scene::Compositor`] turns the editor state into a [`scene::Scene`]: a flat list of layers in
//! canvas space. A [`backend::RenderBackend`] draws that scene at any pixel size, and
//! [`raster`] picks the size for previews and exports.

/// Render backend trait and frame type.
pub mod backend;
/// CPU backend.
pub mod cpu;
/// Target resolution selection.
pub mod raster;
/// Scene building.
pub mod scene;
/// Caption rasterization.
pub mod text;
