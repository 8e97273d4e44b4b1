use std::collections::HashMap;
use std::sync::Arc;

use crate::assets::decode::DecodedImage;
use crate::foundation::core::{Affine, Rect};
use crate::foundation::error::{CardError, CardResult};
use crate::foundation::math::{add_sat_u8, mul_div255_u8};
use crate::render::backend::{FrameRGBA, RenderBackend, RenderSettings};
use crate::render::scene::{ImageLayer, Layer, Scene};
use crate::render::text::rasterize_caption;

/// CPU backend: images through `vello_cpu`, captions through `resvg`.
///
/// Each layer is drawn into its own surface, clipped, then composited source-over onto the
/// target in premultiplied RGBA8.
pub struct CpuBackend {
    settings: RenderSettings,
    ctx: Option<vello_cpu::RenderContext>,
    image_cache: HashMap<usize, (Arc<DecodedImage>, vello_cpu::Image)>,
}

const IMAGE_CACHE_CAPACITY: usize = 16;

impl std::fmt::Debug for CpuBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuBackend")
            .field("settings", &self.settings)
            .field("cached_images", &self.image_cache.len())
            .finish_non_exhaustive()
    }
}

impl CpuBackend {
    /// Backend with `settings`.
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            settings,
            ctx: None,
            image_cache: HashMap::new(),
        }
    }

    fn with_ctx_mut<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut Self, &mut vello_cpu::RenderContext) -> CardResult<R>,
    ) -> CardResult<R> {
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            _ => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(self, &mut ctx)?;
        self.ctx = Some(ctx);
        Ok(out)
    }

    fn image_paint_for(&mut self, image: &Arc<DecodedImage>) -> CardResult<vello_cpu::Image> {
        let key = Arc::as_ptr(image) as usize;
        if let Some((_, p)) = self.image_cache.get(&key) {
            return Ok(p.clone());
        }
        if self.image_cache.len() >= IMAGE_CACHE_CAPACITY {
            self.image_cache.clear();
        }
        let pixmap = pixmap_from_premul_bytes(&image.premultiplied(), image.width, image.height)?;
        let paint = vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        };
        self.image_cache
            .insert(key, (Arc::clone(image), paint.clone()));
        Ok(paint)
    }

    fn draw_image_layer(
        &mut self,
        layer: &ImageLayer,
        to_output: Affine,
        scratch: &mut vello_cpu::Pixmap,
    ) -> CardResult<()> {
        let paint = self.image_paint_for(&layer.image)?;
        let w = f64::from(layer.image.width);
        let h = f64::from(layer.image.height);
        let tr = to_output * layer.transform;
        self.with_ctx_mut(scratch.width(), scratch.height(), |_, ctx| {
            ctx.set_transform(affine_to_cpu(tr));
            ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(paint);
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, w, h));
            ctx.flush();
            ctx.render_to_pixmap(scratch);
            Ok(())
        })?;
        if let Some(clip) = layer.clip {
            let clip_px = to_output.transform_rect_bbox(clip);
            let (w, h) = (u32::from(scratch.width()), u32::from(scratch.height()));
            clip_rect_in_place(scratch.data_as_u8_slice_mut(), w, h, clip_px);
        }
        Ok(())
    }
}

impl RenderBackend for CpuBackend {
    fn render_scene(&mut self, scene: &Scene, width: u32, height: u32) -> CardResult<FrameRGBA> {
        let w16: u16 = width
            .try_into()
            .map_err(|_| CardError::render("render width exceeds u16"))?;
        let h16: u16 = height
            .try_into()
            .map_err(|_| CardError::render("render height exceeds u16"))?;
        if w16 == 0 || h16 == 0 {
            return Err(CardError::render("render target has zero size"));
        }

        let to_output = Affine::scale_non_uniform(
            f64::from(width) / scene.canvas.width_f64(),
            f64::from(height) / scene.canvas.height_f64(),
        );

        let mut target = vello_cpu::Pixmap::new(w16, h16);
        match self.settings.clear {
            Some(c) => clear_pixmap(&mut target, c.premultiplied()),
            None => target.data_as_u8_slice_mut().fill(0),
        }
        let mut scratch = vello_cpu::Pixmap::new(w16, h16);

        for layer in &scene.layers {
            match layer {
                Layer::Image(img) => {
                    self.draw_image_layer(img, to_output, &mut scratch)?;
                    premul_over_in_place(
                        target.data_as_u8_slice_mut(),
                        scratch.data_as_u8_slice(),
                    )?;
                }
                Layer::Text(text) => {
                    let raster = rasterize_caption(text, scene.canvas, width, height)?;
                    premul_over_in_place(target.data_as_u8_slice_mut(), &raster)?;
                }
            }
        }

        Ok(FrameRGBA {
            width,
            height,
            data: target.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap, rgba: [u8; 4]) {
    for px in pixmap.data_as_u8_slice_mut().chunks_exact_mut(4) {
        px.copy_from_slice(&rgba);
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn pixmap_from_premul_bytes(bytes: &[u8], width: u32, height: u32) -> CardResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| CardError::render("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| CardError::render("image height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(CardError::render("image byte len mismatch"));
    }
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]]))
        .collect::<Vec<_>>();
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, true))
}

/// Scale every pixel by how much of it lies inside `clip` (in pixel units).
fn clip_rect_in_place(rgba: &mut [u8], width: u32, height: u32, clip: Rect) {
    fn coverage(n: u32, lo: f64, hi: f64) -> Vec<u16> {
        (0..n)
            .map(|i| {
                let a = f64::from(i);
                let c = (hi.min(a + 1.0) - lo.max(a)).clamp(0.0, 1.0);
                (c * 255.0).round() as u16
            })
            .collect()
    }

    let cols = coverage(width, clip.x0, clip.x1);
    let rows = coverage(height, clip.y0, clip.y1);
    for (y, row) in rgba.chunks_exact_mut((width as usize) * 4).enumerate() {
        let cy = rows[y];
        for (x, px) in row.chunks_exact_mut(4).enumerate() {
            let w = u16::from(mul_div255_u8(cols[x], cy));
            if w == 255 {
                continue;
            }
            for c in px.iter_mut() {
                *c = mul_div255_u8(u16::from(*c), w);
            }
        }
    }
}

fn premul_over_in_place(dst: &mut [u8], src: &[u8]) -> CardResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(CardError::render(
            "premul_over_in_place expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        let sa = s[3];
        if sa == 0 {
            continue;
        }
        if sa == 255 {
            d.copy_from_slice(s);
            continue;
        }
        let inv = 255u16 - u16::from(sa);
        for c in 0..4 {
            d[c] = add_sat_u8(s[c], mul_div255_u8(u16::from(d[c]), inv));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
