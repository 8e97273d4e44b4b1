use crate::foundation::core::Rect;
use crate::foundation::error::{CardError, CardResult};

/// Smallest window footprint accepted while a user drags or resizes a mask.
pub const MIN_EDIT_SIDE: f64 = 50.0;

/// Rectangular photo window.
///
/// Stored masks live in the owning frame's native pixel coordinates. The same type is reused for a
/// window that has been mapped into canvas space by [`crate::geometry::space::FramePlacement`];
/// callers name the space in the function they use, never by mixing values.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Mask {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width, always > 0 for a valid mask.
    pub width: f64,
    /// Height, always > 0 for a valid mask.
    pub height: f64,
}

impl Mask {
    /// Create a validated mask.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> CardResult<Self> {
        let m = Self {
            x,
            y,
            width,
            height,
        };
        m.validate()?;
        Ok(m)
    }

    /// Default window for a frame without a usable detected region.
    ///
    /// Inset 15% from the top-left, 70% of the width and 50% of the height.
    pub fn fallback_for(width: u32, height: u32) -> Self {
        let w = f64::from(width);
        let h = f64::from(height);
        Self {
            x: w * 0.15,
            y: h * 0.15,
            width: w * 0.7,
            height: h * 0.5,
        }
    }

    /// Check that all fields are finite and the size is positive.
    pub fn validate(&self) -> CardResult<()> {
        let finite = [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite());
        if !finite {
            return Err(CardError::validation("mask fields must be finite"));
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(CardError::validation("mask width/height must be > 0"));
        }
        Ok(())
    }

    /// Width / height.
    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }

    /// Right edge.
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Convert to a kurbo rectangle.
    pub fn to_rect(self) -> Rect {
        Rect::new(self.x, self.y, self.right(), self.bottom())
    }

    /// Build from a kurbo rectangle (normalized so width/height are non-negative).
    pub fn from_rect(r: Rect) -> Self {
        let r = r.abs();
        Self {
            x: r.x0,
            y: r.y0,
            width: r.width(),
            height: r.height(),
        }
    }

    /// Clamp a user-edited mask the way the interactive editor does.
    ///
    /// The origin is clamped to `>= 0`, each side grows to at least [`MIN_EDIT_SIDE`], and the
    /// rectangle is pulled back inside the frame on axes where the frame is large enough to hold it.
    pub fn clamp_for_edit(self, frame_width: u32, frame_height: u32) -> Self {
        fn clamp_axis(pos: f64, len: f64, bound: f64) -> (f64, f64) {
            let len = if len.is_finite() {
                len.max(MIN_EDIT_SIDE)
            } else {
                MIN_EDIT_SIDE
            };
            let mut pos = if pos.is_finite() { pos.max(0.0) } else { 0.0 };
            if bound >= len && pos + len > bound {
                pos = bound - len;
            }
            (pos, len)
        }

        let (x, width) = clamp_axis(self.x, self.width, f64::from(frame_width));
        let (y, height) = clamp_axis(self.y, self.height, f64::from(frame_height));
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/mask.rs"]
mod tests;
