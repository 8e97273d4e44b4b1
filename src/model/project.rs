use crate::assets::registry::AssetId;
use crate::geometry::transform::PhotoTransform;
use crate::model::text::TextProperties;

/// The single document driving rendering.
///
/// Selections are foreign keys into the frame and photo registries. Without a photo selection
/// `photo_transform` holds [`PhotoTransform::default`].
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Project {
    /// Selected frame.
    pub selected_frame_id: Option<AssetId>,
    /// Selected photo.
    pub selected_photo_id: Option<AssetId>,
    /// Placement of the selected photo in canvas space.
    pub photo_transform: PhotoTransform,
    /// Caption.
    pub text: TextProperties,
}
