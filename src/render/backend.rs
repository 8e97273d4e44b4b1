use crate::foundation::color::Rgba8;
use crate::foundation::error::CardResult;
use crate::render::scene::Scene;

/// A rendered card as RGBA8 pixels.
///
/// Backends return premultiplied alpha; `premultiplied` makes that explicit at API boundaries.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameRGBA {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// RGBA of the pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// Something that can draw a [`Scene`] at a given pixel size.
pub trait RenderBackend {
    /// Draw `scene`, stretched from its canvas to `width x height` pixels.
    fn render_scene(&mut self, scene: &Scene, width: u32, height: u32) -> CardResult<FrameRGBA>;
}

/// Available backend kinds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BackendKind {
    /// CPU raster backend powered by `vello_cpu`.
    #[default]
    Cpu,
}

/// Backend-agnostic settings.
#[derive(Clone, Debug, Default)]
pub struct RenderSettings {
    /// If set, the target is cleared to this color before any layer is drawn.
    pub clear: Option<Rgba8>,
}

/// Create a rendering backend.
pub fn create_backend(
    kind: BackendKind,
    settings: &RenderSettings,
) -> CardResult<Box<dyn RenderBackend>> {
    match kind {
        BackendKind::Cpu => Ok(Box::new(crate::render::cpu::CpuBackend::new(
            settings.clone(),
        ))),
    }
}
