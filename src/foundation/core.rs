use crate::foundation::error::{CardError, CardResult};

pub use kurbo::{Affine, Point, Rect, Size, Vec2};

/// Logical canvas dimensions in pixels.
///
/// This is the single frame of reference for photo transforms, caption placement and exports. It
/// does not change with the on-screen editor size or with the pixel size of any source asset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Portrait 9:16 canvas used by the reference deployment.
    pub const REFERENCE: Canvas = Canvas {
        width: 1080,
        height: 1920,
    };

    /// Create a validated canvas with non-zero dimensions.
    pub fn new(width: u32, height: u32) -> CardResult<Self> {
        if width == 0 || height == 0 {
            return Err(CardError::validation("canvas width/height must be > 0"));
        }
        Ok(Self { width, height })
    }

    /// Width as `f64`.
    pub fn width_f64(self) -> f64 {
        f64::from(self.width)
    }

    /// Height as `f64`.
    pub fn height_f64(self) -> f64 {
        f64::from(self.height)
    }

    /// Canvas bounds anchored at the origin.
    pub fn rect(self) -> Rect {
        Rect::new(0.0, 0.0, self.width_f64(), self.height_f64())
    }

    /// Multiply both dimensions by an integer resolution multiplier.
    pub fn scaled(self, multiplier: u32) -> CardResult<Self> {
        let width = self
            .width
            .checked_mul(multiplier)
            .ok_or_else(|| CardError::validation("scaled canvas width overflows u32"))?;
        let height = self
            .height
            .checked_mul(multiplier)
            .ok_or_else(|| CardError::validation("scaled canvas height overflows u32"))?;
        Self::new(width, height)
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::REFERENCE
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
