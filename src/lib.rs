//! Framecard composes greeting cards: a user photo placed inside the transparent window of a
//! decorative frame, a styled caption on top, exported at a fixed logical resolution.
//!
//! The crate is organized around a single state owner:
//!
//! - Upload frames and photos into an [`Editor`] (decoded, and for frames window-detected, on a
//!   background pool)
//! - Select, fit, drag and restyle; every command returns an immutable [`ProjectSnapshot`]
//! - Build a [`Scene`] with a [`Compositor`] and draw it with a [`RenderBackend`]
//! - Export PNG, JPEG or a paper-sized PDF with [`export_card`]
//! - Persist the project through a [`Persister`] over any [`KeyValueStore`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Frame and photo assets.
pub mod assets;
/// Editor configuration.
pub mod config;
/// Export pipeline.
pub mod export;
/// Shared primitives: canvas, colors, errors.
pub mod foundation;
pub mod geometry;
/// Persisted records.
pub mod model;
pub mod persist;
pub mod render;
/// Editor state.
pub mod state;

pub use crate::assets::decode::{DecodedImage, ImagePayload, decode_image};
pub use crate::assets::registry::{AssetId, AssetRegistry, FrameAsset, PhotoAsset, Upload};
pub use crate::config::EditorConfig;
pub use crate::export::{
    ExportFormat, ExportRequest, ExportedCard, PaperFormat, export_card, save_finished_card,
};
pub use crate::foundation::color::Rgba8;
pub use crate::foundation::core::{Affine, Canvas, Point, Rect, Vec2};
pub use crate::foundation::error::{CardError, CardResult};
pub use crate::geometry::detect::{MaskDetection, MaskSource, detect_mask};
pub use crate::geometry::fit::{FitMode, compute_fit_transform};
pub use crate::geometry::mask::Mask;
pub use crate::geometry::transform::PhotoTransform;
pub use crate::model::project::Project;
pub use crate::model::text::TextProperties;
pub use crate::persist::kv::{FileStore, KeyValueStore, MemoryStore};
pub use crate::persist::writer::Persister;
pub use crate::render::backend::{
    BackendKind, FrameRGBA, RenderBackend, RenderSettings, create_backend,
};
pub use crate::render::scene::{Compositor, Scene};
pub use crate::state::editor::{Editor, ProjectSnapshot, TaskEvent};
