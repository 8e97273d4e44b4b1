//! Conversions between the three coordinate spaces.
//!
//! - **Asset space**: pixels of an uploaded frame image. Stored masks live here.
//! - **Canvas space**: the fixed logical canvas ([`Canvas`]). Photo transforms, caption positions
//!   and exports live here.
//! - **Display space**: the current on-screen editor surface, a uniform `<= 1` scale of the canvas.
//!
//! [`CoordinateSpaces`] is the only place scale factors are derived; renderers, the editor and the
//! export pipeline all call into it.

use crate::foundation::core::{Affine, Canvas, Point, Rect, Size, Vec2};
use crate::foundation::error::{CardError, CardResult};
use crate::geometry::mask::Mask;

/// Uniform scale-to-fit placement of a frame image on the canvas, centered.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FramePlacement {
    /// Native frame size in asset pixels.
    pub frame_size: Size,
    /// Asset pixel -> canvas unit factor.
    pub scale: f64,
    /// Letterbox / pillarbox offset of the frame's top-left corner on the canvas.
    pub offset: Vec2,
}

impl FramePlacement {
    /// Fit a `frame_width x frame_height` image into `canvas`, preserving aspect ratio.
    pub fn new(frame_width: u32, frame_height: u32, canvas: Canvas) -> CardResult<Self> {
        if frame_width == 0 || frame_height == 0 {
            return Err(CardError::validation("frame width/height must be > 0"));
        }
        let fw = f64::from(frame_width);
        let fh = f64::from(frame_height);
        let cw = canvas.width_f64();
        let ch = canvas.height_f64();

        let scale = (cw / fw).min(ch / fh);
        let offset = Vec2::new((cw - fw * scale) / 2.0, (ch - fh * scale) / 2.0);
        Ok(Self {
            frame_size: Size::new(fw, fh),
            scale,
            offset,
        })
    }

    /// Area the frame occupies on the canvas.
    pub fn frame_rect(&self) -> Rect {
        Rect::from_origin_size(
            self.offset.to_point(),
            Size::new(
                self.frame_size.width * self.scale,
                self.frame_size.height * self.scale,
            ),
        )
    }

    /// Affine mapping asset pixels into canvas space.
    pub fn to_affine(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.scale)
    }

    /// Asset-space point -> canvas-space point.
    pub fn point_to_canvas(&self, p: Point) -> Point {
        Point::new(
            self.offset.x + p.x * self.scale,
            self.offset.y + p.y * self.scale,
        )
    }

    /// Canvas-space point -> asset-space point.
    pub fn point_to_asset(&self, p: Point) -> Point {
        Point::new(
            (p.x - self.offset.x) / self.scale,
            (p.y - self.offset.y) / self.scale,
        )
    }

    /// Map a stored (asset-space) mask onto the canvas.
    pub fn mask_to_canvas(&self, m: &Mask) -> Mask {
        Mask {
            x: self.offset.x + m.x * self.scale,
            y: self.offset.y + m.y * self.scale,
            width: m.width * self.scale,
            height: m.height * self.scale,
        }
    }

    /// Inverse of [`FramePlacement::mask_to_canvas`].
    pub fn mask_to_asset(&self, m: &Mask) -> Mask {
        Mask {
            x: (m.x - self.offset.x) / self.scale,
            y: (m.y - self.offset.y) / self.scale,
            width: m.width / self.scale,
            height: m.height / self.scale,
        }
    }
}

/// Uniform canvas -> display scale, never above 1.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayMapping {
    canvas: Canvas,
    scale: f64,
}

impl DisplayMapping {
    /// One display pixel per canvas unit.
    pub fn identity(canvas: Canvas) -> Self {
        Self { canvas, scale: 1.0 }
    }

    /// Largest scale `<= 1` at which the canvas fits a `display_width x display_height` surface.
    pub fn fit(canvas: Canvas, display_width: f64, display_height: f64) -> CardResult<Self> {
        let usable = display_width.is_finite()
            && display_height.is_finite()
            && display_width > 0.0
            && display_height > 0.0;
        if !usable {
            return Err(CardError::render(format!(
                "display surface unavailable ({display_width}x{display_height})"
            )));
        }
        let scale = (display_width / canvas.width_f64())
            .min(display_height / canvas.height_f64())
            .min(1.0);
        Ok(Self { canvas, scale })
    }

    /// The canvas this mapping scales.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Canvas unit -> display pixel factor.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// On-screen size of the whole canvas.
    pub fn display_size(&self) -> Size {
        Size::new(
            self.canvas.width_f64() * self.scale,
            self.canvas.height_f64() * self.scale,
        )
    }

    /// Canvas length (position, size, stroke, font size, shadow offset) -> display pixels.
    pub fn len_to_display(&self, v: f64) -> f64 {
        v * self.scale
    }

    /// Canvas point -> display point.
    pub fn point_to_display(&self, p: Point) -> Point {
        Point::new(p.x * self.scale, p.y * self.scale)
    }

    /// Canvas rectangle -> display rectangle.
    pub fn rect_to_display(&self, r: Rect) -> Rect {
        Rect::from_points(
            self.point_to_display(Point::new(r.x0, r.y0)),
            self.point_to_display(Point::new(r.x1, r.y1)),
        )
    }

    /// Display point -> canvas point.
    pub fn point_to_canvas(&self, p: Point) -> Point {
        Point::new(p.x / self.scale, p.y / self.scale)
    }

    /// Pointer delta read in display pixels -> canvas-space delta.
    pub fn delta_to_canvas(&self, delta: Vec2) -> Vec2 {
        Vec2::new(delta.x / self.scale, delta.y / self.scale)
    }

    /// Affine mapping canvas space into display space.
    pub fn to_affine(&self) -> Affine {
        Affine::scale(self.scale)
    }
}

/// Frame dimensions plus its stored window, as needed for canvas placement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameWindow {
    /// Native frame width in pixels.
    pub width: u32,
    /// Native frame height in pixels.
    pub height: u32,
    /// Stored mask in asset space, if any.
    pub mask: Option<Mask>,
}

/// Owner of every scale factor used between asset, canvas and display space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CoordinateSpaces {
    canvas: Canvas,
    display: DisplayMapping,
}

impl CoordinateSpaces {
    /// Spaces for `canvas`, displayed at 1:1.
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            display: DisplayMapping::identity(canvas),
        }
    }

    /// The logical canvas.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Current canvas <-> display mapping.
    pub fn display(&self) -> DisplayMapping {
        self.display
    }

    /// Current display scale.
    pub fn display_scale(&self) -> f64 {
        self.display.scale()
    }

    /// Recompute the display mapping for a resized editor surface.
    ///
    /// On failure the previous mapping is kept.
    pub fn set_display_size(&mut self, width: f64, height: f64) -> CardResult<()> {
        self.display = DisplayMapping::fit(self.canvas, width, height)?;
        Ok(())
    }

    /// Placement of a frame image on the canvas.
    pub fn frame_placement(&self, frame_width: u32, frame_height: u32) -> CardResult<FramePlacement> {
        FramePlacement::new(frame_width, frame_height, self.canvas)
    }

    /// Photo window in canvas space.
    ///
    /// A frame without a stored mask uses the default inset window of that frame; no frame at all
    /// uses the default inset window of the canvas itself.
    pub fn window_in_canvas(&self, frame: Option<FrameWindow>) -> CardResult<Mask> {
        let Some(frame) = frame else {
            return Ok(Mask::fallback_for(self.canvas.width, self.canvas.height));
        };
        let placement = self.frame_placement(frame.width, frame.height)?;
        let mask = frame
            .mask
            .unwrap_or_else(|| Mask::fallback_for(frame.width, frame.height));
        Ok(placement.mask_to_canvas(&mask))
    }

    /// Canvas-space window edited on screen -> asset-space mask for storage.
    pub fn window_to_asset(&self, frame_width: u32, frame_height: u32, window: &Mask) -> CardResult<Mask> {
        let placement = self.frame_placement(frame_width, frame_height)?;
        Ok(placement.mask_to_asset(window))
    }

    /// Display-space drag delta -> canvas-space delta.
    pub fn drag_to_canvas(&self, delta: Vec2) -> Vec2 {
        self.display.delta_to_canvas(delta)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/space.rs"]
mod tests;
