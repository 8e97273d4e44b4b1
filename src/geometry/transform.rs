use crate::foundation::core::{Affine, Size, Vec2};
use crate::foundation::error::{CardError, CardResult};

/// Placement of a photo on the logical canvas.
///
/// `(x, y)` is where the photo's top-left corner lands, `scale` is uniform, and `rotation` is in
/// degrees around that same top-left corner. Values are always canvas units, never display pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PhotoTransform {
    /// Left position in canvas units.
    pub x: f64,
    /// Top position in canvas units.
    pub y: f64,
    /// Uniform scale factor (> 0).
    pub scale: f64,
    /// Rotation in degrees.
    #[serde(default)]
    pub rotation: f64,
}

impl Default for PhotoTransform {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale: 1.0,
            rotation: 0.0,
        }
    }
}

impl PhotoTransform {
    /// Reject non-finite fields and a non-positive scale.
    pub fn validate(&self) -> CardResult<()> {
        if ![self.x, self.y, self.scale, self.rotation]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err(CardError::validation("photo transform fields must be finite"));
        }
        if self.scale <= 0.0 {
            return Err(CardError::validation("photo scale must be > 0"));
        }
        Ok(())
    }

    /// Size of a `photo_width x photo_height` image after scaling.
    pub fn scaled_size(&self, photo_width: f64, photo_height: f64) -> Size {
        Size::new(photo_width * self.scale, photo_height * self.scale)
    }

    /// Affine mapping photo-native pixels into canvas space.
    pub fn to_affine(&self) -> Affine {
        Affine::translate(Vec2::new(self.x, self.y))
            * Affine::rotate(self.rotation.to_radians())
            * Affine::scale(self.scale)
    }

    /// Copy moved by a canvas-space delta.
    pub fn translated(self, delta: Vec2) -> Self {
        Self {
            x: self.x + delta.x,
            y: self.y + delta.y,
            ..self
        }
    }

    /// Copy with a replaced rotation.
    pub fn with_rotation(self, rotation: f64) -> Self {
        Self { rotation, ..self }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/transform.rs"]
mod tests;
