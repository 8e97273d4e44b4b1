use std::collections::HashMap;
use std::sync::Arc;

use crate::assets::decode::{DecodedImage, ImagePayload};
use crate::assets::registry::{Asset, AssetId};
use crate::foundation::core::{Affine, Canvas, Rect};
use crate::foundation::error::CardResult;
use crate::model::text::TextProperties;
use crate::state::editor::Editor;

/// A raster drawn with an affine transform, optionally clipped.
#[derive(Clone, Debug)]
pub struct ImageLayer {
    /// Source asset.
    pub asset: AssetId,
    /// Straight-alpha pixels.
    pub image: Arc<DecodedImage>,
    /// Image pixels -> canvas space.
    pub transform: Affine,
    /// Canvas-space clip rectangle.
    pub clip: Option<Rect>,
}

/// One drawable element.
#[derive(Clone, Debug)]
pub enum Layer {
    /// Frame or photo.
    Image(ImageLayer),
    /// Caption.
    Text(TextProperties),
}

/// Layers in draw order, all in canvas space.
#[derive(Clone, Debug)]
pub struct Scene {
    /// Canvas the layers are expressed in.
    pub canvas: Canvas,
    /// Bottom to top.
    pub layers: Vec<Layer>,
}

/// Builds scenes from editor state, caching decoded asset pixels between builds.
#[derive(Debug, Default)]
pub struct Compositor {
    cache: HashMap<AssetId, (ImagePayload, Arc<DecodedImage>)>,
}

impl Compositor {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached decoded images.
    pub fn cached_images(&self) -> usize {
        self.cache.len()
    }

    /// Compose the current project: frame, then the photo clipped to the window, then the caption.
    #[tracing::instrument(skip_all)]
    pub fn build_scene(&mut self, editor: &Editor) -> CardResult<Scene> {
        self.cache.retain(|id, _| editor.frames().contains(id) || editor.photos().contains(id));

        let mut layers = Vec::with_capacity(3);
        if let Some(frame) = editor.selected_frame() {
            let placement = editor.spaces().frame_placement(frame.width, frame.height)?;
            layers.push(Layer::Image(ImageLayer {
                asset: frame.id.clone(),
                image: self.image_for(editor, frame)?,
                transform: placement.to_affine(),
                clip: None,
            }));
        }
        if let Some(photo) = editor.selected_photo() {
            let window = editor.window_in_canvas()?;
            layers.push(Layer::Image(ImageLayer {
                asset: photo.id.clone(),
                image: self.image_for(editor, photo)?,
                transform: editor.project().photo_transform.to_affine(),
                clip: Some(window.to_rect()),
            }));
        }
        let text = &editor.project().text;
        if text.is_drawable() {
            layers.push(Layer::Text(text.clone()));
        }

        Ok(Scene {
            canvas: editor.canvas(),
            layers,
        })
    }

    fn image_for<A: Asset>(&mut self, editor: &Editor, asset: &A) -> CardResult<Arc<DecodedImage>> {
        if let Some(img) = editor.cached_image(asset.id()) {
            return Ok(img);
        }
        // Same id with different bytes means the asset was replaced.
        if let Some((payload, img)) = self.cache.get(asset.id())
            && payload.shares_bytes(asset.payload())
        {
            tracing::debug!(id = %asset.id(), "decoded image cache hit");
            return Ok(Arc::clone(img));
        }
        let img = Arc::new(asset.payload().decode()?);
        self.cache.insert(
            asset.id().clone(),
            (asset.payload().clone(), Arc::clone(&img)),
        );
        Ok(img)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/scene.rs"]
mod tests;
