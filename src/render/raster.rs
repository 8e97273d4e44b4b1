use crate::foundation::core::Canvas;
use crate::foundation::error::{CardError, CardResult};
use crate::render::backend::{FrameRGBA, RenderBackend};
use crate::render::scene::Compositor;
use crate::state::editor::Editor;

/// Ratio between a target resolution and the size the composition is currently rendered at.
///
/// The larger of the two axis ratios, so the result covers the target on both axes.
pub fn pixel_ratio(target: Canvas, rendered_width: f64, rendered_height: f64) -> CardResult<f64> {
    let usable = rendered_width.is_finite()
        && rendered_height.is_finite()
        && rendered_width > 0.0
        && rendered_height > 0.0;
    if !usable {
        return Err(CardError::render(format!(
            "no render target ({rendered_width}x{rendered_height})"
        )));
    }
    Ok((target.width_f64() / rendered_width).max(target.height_f64() / rendered_height))
}

/// Output size for rendering a `rendered_*` surface at `ratio`, never smaller than `target`.
pub fn output_size(target: Canvas, rendered_width: f64, rendered_height: f64, ratio: f64) -> (u32, u32) {
    let w = (rendered_width * ratio).round().max(1.0) as u32;
    let h = (rendered_height * ratio).round().max(1.0) as u32;
    (w.max(target.width), h.max(target.height))
}

/// Render the current on-screen composition scaled up to at least `target`.
#[tracing::instrument(skip(editor, compositor, backend))]
pub fn rasterize(
    editor: &Editor,
    compositor: &mut Compositor,
    backend: &mut dyn RenderBackend,
    target: Canvas,
) -> CardResult<FrameRGBA> {
    let rendered = editor.spaces().display().display_size();
    let ratio = pixel_ratio(target, rendered.width, rendered.height)?;
    let (width, height) = output_size(target, rendered.width, rendered.height, ratio);
    tracing::debug!(ratio, width, height, "rasterizing");

    let scene = compositor.build_scene(editor)?;
    backend.render_scene(&scene, width, height)
}

/// Render the composition at the current display size.
pub fn render_preview(
    editor: &Editor,
    compositor: &mut Compositor,
    backend: &mut dyn RenderBackend,
) -> CardResult<FrameRGBA> {
    let size = editor.spaces().display().display_size();
    let width = size.width.round().max(1.0) as u32;
    let height = size.height.round().max(1.0) as u32;
    let scene = compositor.build_scene(editor)?;
    backend.render_scene(&scene, width, height)
}

#[cfg(test)]
#[path = "../../tests/unit/render/raster.rs"]
mod tests;
