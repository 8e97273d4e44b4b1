use crate::foundation::color::Rgba8;
use crate::foundation::core::Vec2;
use crate::foundation::error::{CardError, CardResult};

/// Caption content, style and position.
///
/// Sizes and positions are logical canvas units; `(x, y)` is the top-left of the text block.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TextProperties {
    /// Text; `\n` starts a new line.
    pub content: String,
    /// CSS-style font family list.
    pub font_family: String,
    /// Font size in canvas units.
    pub font_size: f64,
    /// Glyph fill.
    pub fill: Rgba8,
    /// Outline color.
    pub outline: Rgba8,
    /// Outline width in canvas units; `0` disables the outline.
    pub outline_width: f64,
    /// Draw a soft drop shadow.
    pub shadow: bool,
    /// Render the caption at all.
    pub visible: bool,
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
}

impl Default for TextProperties {
    fn default() -> Self {
        Self {
            content: "Happy Birthday!".to_owned(),
            font_family: "sans-serif".to_owned(),
            font_size: 72.0,
            fill: Rgba8::WHITE,
            outline: Rgba8::BLACK,
            outline_width: 2.0,
            shadow: true,
            visible: true,
            x: 140.0,
            y: 1500.0,
        }
    }
}

impl TextProperties {
    /// Reject non-finite geometry, a non-positive font size and a negative outline.
    pub fn validate(&self) -> CardResult<()> {
        if !(self.x.is_finite() && self.y.is_finite()) {
            return Err(CardError::validation("text position must be finite"));
        }
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(CardError::validation("font size must be finite and > 0"));
        }
        if !self.outline_width.is_finite() || self.outline_width < 0.0 {
            return Err(CardError::validation("outline width must be finite and >= 0"));
        }
        Ok(())
    }

    /// Copy moved by a canvas-space delta.
    pub fn translated(&self, delta: Vec2) -> Self {
        Self {
            x: self.x + delta.x,
            y: self.y + delta.y,
            ..self.clone()
        }
    }

    /// `true` when there is something to draw.
    pub fn is_drawable(&self) -> bool {
        self.visible && !self.content.trim().is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/text.rs"]
mod tests;
