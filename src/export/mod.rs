//! Export pipeline: rasterize the current card at the export resolution and encode it.

/// Paper-sized document output.
pub mod document;
/// Raster image encoders.
pub mod image;

use crate::assets::decode::ImagePayload;
use crate::config::EditorConfig;
use crate::foundation::color::Rgba8;
use crate::foundation::error::{CardError, CardResult};
use crate::model::saved::SavedCard;
use crate::render::backend::RenderBackend;
use crate::render::raster::rasterize;
use crate::render::scene::Compositor;
use crate::state::editor::Editor;

pub use document::PaperFormat;

/// Output container.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    /// Lossless raster, transparency kept.
    Png,
    /// Lossy raster flattened onto the matte.
    Jpeg,
    /// Single-page document on the given paper.
    Pdf(PaperFormat),
}

impl ExportFormat {
    /// MIME type of the encoded output.
    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Pdf(_) => "application/pdf",
        }
    }

    /// Conventional file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Pdf(_) => "pdf",
        }
    }
}

/// What to export and how.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportRequest {
    /// Output container.
    pub format: ExportFormat,
    /// Exports target `canvas * multiplier` pixels.
    pub multiplier: u32,
    /// JPEG quality, 1..=100.
    pub jpeg_quality: u8,
    /// Document page margin.
    pub pdf_margin_mm: f32,
    /// Color formats without alpha are flattened onto.
    pub matte: Rgba8,
}

impl ExportRequest {
    /// Request for `format` using the export settings of `config`.
    pub fn from_config(format: ExportFormat, config: &EditorConfig) -> Self {
        Self {
            format,
            multiplier: config.export_multiplier,
            jpeg_quality: config.jpeg_quality,
            pdf_margin_mm: config.pdf_margin_mm,
            matte: config.background,
        }
    }
}

/// An encoded card.
#[derive(Clone, Debug)]
pub struct ExportedCard {
    /// Container the bytes are in.
    pub format: ExportFormat,
    /// Raster width in pixels.
    pub width: u32,
    /// Raster height in pixels.
    pub height: u32,
    /// Encoded output.
    pub bytes: Vec<u8>,
}

/// Rasterize the editor's current card at `canvas * multiplier` and encode it.
///
/// Only reads `editor`; a failed export leaves the project untouched.
#[tracing::instrument(skip(editor, compositor, backend), fields(format = ?req.format))]
pub fn export_card(
    editor: &Editor,
    compositor: &mut Compositor,
    backend: &mut dyn RenderBackend,
    req: &ExportRequest,
) -> CardResult<ExportedCard> {
    if req.multiplier == 0 {
        return Err(CardError::validation("export multiplier must be >= 1"));
    }
    let target = editor.canvas().scaled(req.multiplier)?;
    let frame = rasterize(editor, compositor, backend, target)?;

    let bytes = match req.format {
        ExportFormat::Png => image::frame_to_png(&frame)?,
        ExportFormat::Jpeg => image::frame_to_jpeg(&frame, req.jpeg_quality, req.matte)?,
        ExportFormat::Pdf(paper) => {
            document::encode_pdf(&frame, paper, req.pdf_margin_mm, req.matte, "Greeting card")?
        }
    };
    tracing::info!(
        width = frame.width,
        height = frame.height,
        bytes = bytes.len(),
        "exported card"
    );
    Ok(ExportedCard {
        format: req.format,
        width: frame.width,
        height: frame.height,
        bytes,
    })
}

/// Export the current card as PNG at 1x and keep it in the saved-cards list.
pub fn save_finished_card(
    editor: &mut Editor,
    compositor: &mut Compositor,
    backend: &mut dyn RenderBackend,
    name: impl Into<String>,
) -> CardResult<SavedCard> {
    let req = ExportRequest {
        format: ExportFormat::Png,
        multiplier: 1,
        jpeg_quality: 92,
        pdf_margin_mm: 0.0,
        matte: Rgba8::WHITE,
    };
    let exported = export_card(editor, compositor, backend, &req)?;
    let payload = ImagePayload::from_bytes(exported.bytes)?;
    Ok(editor.save_card(name, payload))
}
