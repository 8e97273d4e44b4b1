use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Serialize, de::DeserializeOwned};

use crate::assets::decode::{DecodedImage, ImagePayload};
use crate::foundation::error::{CardError, CardResult};
use crate::foundation::math::Fnv1a64;
use crate::geometry::mask::Mask;
use crate::geometry::space::FrameWindow;

/// Stable identifier of a frame or photo.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    /// Wrap an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Fresh id for an upload: `<kind>-<16 hex digits>`.
    pub(crate) fn generate(kind: &str, name: &str, bytes: &[u8]) -> Self {
        static SEQ: AtomicU64 = AtomicU64::new(0);

        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0);
        let mut h = Fnv1a64::new_default();
        h.write_bytes(kind.as_bytes());
        h.write_bytes(name.as_bytes());
        h.write_u64(bytes.len() as u64);
        h.write_bytes(&bytes[..bytes.len().min(4096)]);
        h.write_u64(nanos);
        h.write_u64(SEQ.fetch_add(1, Ordering::Relaxed));
        Self(format!("{kind}-{:016x}", h.finish()))
    }
}

impl std::fmt::Display for AssetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Common surface of frame and photo assets.
pub trait Asset: Clone + Serialize + DeserializeOwned + Send + 'static {
    /// Short kind label used in generated ids and logs.
    const KIND: &'static str;

    /// Identifier.
    fn id(&self) -> &AssetId;
    /// Display name (usually the uploaded file name).
    fn name(&self) -> &str;
    /// Encoded image bytes.
    fn payload(&self) -> &ImagePayload;
    /// Native pixel `(width, height)`.
    fn dimensions(&self) -> (u32, u32);
    /// Build from uploaded bytes, decoding them to learn the dimensions.
    fn from_upload(name: &str, bytes: Vec<u8>) -> CardResult<(Self, DecodedImage)>;
}

/// Decorative frame with an optional photo window.
#[derive(Clone, Debug, PartialEq, Serialize, serde::Deserialize)]
pub struct FrameAsset {
    /// Identifier.
    pub id: AssetId,
    /// Display name.
    pub name: String,
    /// Encoded image.
    pub payload: ImagePayload,
    /// Native width in pixels.
    pub width: u32,
    /// Native height in pixels.
    pub height: u32,
    /// Photo window in this frame's pixel coordinates.
    #[serde(default)]
    pub mask: Option<Mask>,
}

impl FrameAsset {
    /// Dimensions and stored mask, for coordinate-space placement.
    pub fn window(&self) -> FrameWindow {
        FrameWindow {
            width: self.width,
            height: self.height,
            mask: self.mask,
        }
    }
}

impl Asset for FrameAsset {
    const KIND: &'static str = "frame";

    fn id(&self) -> &AssetId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn payload(&self) -> &ImagePayload {
        &self.payload
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn from_upload(name: &str, bytes: Vec<u8>) -> CardResult<(Self, DecodedImage)> {
        let decoded = crate::assets::decode::decode_image(&bytes)?;
        let id = AssetId::generate(Self::KIND, name, &bytes);
        let payload = ImagePayload::from_bytes(bytes)?;
        Ok((
            Self {
                id,
                name: name.to_owned(),
                payload,
                width: decoded.width,
                height: decoded.height,
                mask: None,
            },
            decoded,
        ))
    }
}

/// Uploaded photo.
#[derive(Clone, Debug, PartialEq, Serialize, serde::Deserialize)]
pub struct PhotoAsset {
    /// Identifier.
    pub id: AssetId,
    /// Display name.
    pub name: String,
    /// Encoded image.
    pub payload: ImagePayload,
    /// Native width in pixels.
    pub width: u32,
    /// Native height in pixels.
    pub height: u32,
}

impl Asset for PhotoAsset {
    const KIND: &'static str = "photo";

    fn id(&self) -> &AssetId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn payload(&self) -> &ImagePayload {
        &self.payload
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn from_upload(name: &str, bytes: Vec<u8>) -> CardResult<(Self, DecodedImage)> {
        let decoded = crate::assets::decode::decode_image(&bytes)?;
        let id = AssetId::generate(Self::KIND, name, &bytes);
        let payload = ImagePayload::from_bytes(bytes)?;
        Ok((
            Self {
                id,
                name: name.to_owned(),
                payload,
                width: decoded.width,
                height: decoded.height,
            },
            decoded,
        ))
    }
}

/// Ordered collection of assets keyed by [`AssetId`].
///
/// Every foreign-key lookup goes through [`AssetRegistry::get`], which is where a missing
/// reference shows up as `None`.
#[derive(Clone, Debug, PartialEq, Serialize, serde::Deserialize)]
#[serde(transparent)]
#[serde(bound(deserialize = "A: DeserializeOwned"))]
pub struct AssetRegistry<A> {
    items: Vec<A>,
}

impl<A> Default for AssetRegistry<A> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<A: Asset> AssetRegistry<A> {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a list, keeping the first occurrence of each id and skipping zero-sized assets.
    pub fn from_vec(items: Vec<A>) -> Self {
        let mut out = Self::new();
        for item in items {
            let (w, h) = item.dimensions();
            if w == 0 || h == 0 {
                tracing::warn!(id = %item.id(), kind = A::KIND, w, h, "dropping zero-sized asset");
                continue;
            }
            if out.contains(item.id()) {
                tracing::warn!(id = %item.id(), kind = A::KIND, "dropping duplicate asset id");
                continue;
            }
            out.items.push(item);
        }
        out
    }

    /// Look up an asset.
    pub fn get(&self, id: &AssetId) -> Option<&A> {
        self.items.iter().find(|a| a.id() == id)
    }

    /// Look up an asset mutably.
    pub fn get_mut(&mut self, id: &AssetId) -> Option<&mut A> {
        self.items.iter_mut().find(|a| a.id() == id)
    }

    /// Look up an asset, turning a dangling reference into a validation error.
    pub fn require(&self, id: &AssetId) -> CardResult<&A> {
        self.get(id).ok_or_else(|| {
            CardError::validation(format!("unknown {} id \"{id}\"", A::KIND))
        })
    }

    /// `true` if `id` is present.
    pub fn contains(&self, id: &AssetId) -> bool {
        self.get(id).is_some()
    }

    /// Append an asset; an asset with the same id is replaced in place and returned.
    pub fn insert(&mut self, asset: A) -> Option<A> {
        match self.items.iter().position(|a| a.id() == asset.id()) {
            Some(i) => Some(std::mem::replace(&mut self.items[i], asset)),
            None => {
                self.items.push(asset);
                None
            }
        }
    }

    /// Insert at the front; an asset with the same id is removed first.
    pub fn prepend(&mut self, asset: A) -> Option<A> {
        let old = self.remove(asset.id());
        self.items.insert(0, asset);
        old
    }

    /// Remove and return an asset.
    pub fn remove(&mut self, id: &AssetId) -> Option<A> {
        let i = self.items.iter().position(|a| a.id() == id)?;
        Some(self.items.remove(i))
    }

    /// Iterate in collection order.
    pub fn iter(&self) -> impl Iterator<Item = &A> {
        self.items.iter()
    }

    /// Ids in collection order.
    pub fn ids(&self) -> Vec<AssetId> {
        self.items.iter().map(|a| a.id().clone()).collect()
    }

    /// Number of assets.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// `true` when empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A file handed to the ingestion path.
#[derive(Clone, Debug)]
pub struct Upload {
    /// File-like name.
    pub name: String,
    /// Raw bytes.
    pub bytes: Vec<u8>,
}

impl Upload {
    /// Construct an upload.
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// Outcome of a batch upload: decoded assets plus the files that were skipped.
#[derive(Debug)]
pub struct IngestReport<A> {
    /// Successfully decoded assets with their pixels.
    pub accepted: Vec<(A, DecodedImage)>,
    /// Skipped files and why.
    pub rejected: Vec<(String, CardError)>,
}

/// Decode a batch of uploads. A corrupt file is skipped; the rest are still processed.
pub fn ingest_uploads<A: Asset>(uploads: impl IntoIterator<Item = Upload>) -> IngestReport<A> {
    let mut report = IngestReport {
        accepted: Vec::new(),
        rejected: Vec::new(),
    };
    for upload in uploads {
        match A::from_upload(&upload.name, upload.bytes) {
            Ok(pair) => report.accepted.push(pair),
            Err(e) => {
                tracing::warn!(name = %upload.name, kind = A::KIND, error = %e, "skipping upload");
                report.rejected.push((upload.name, e));
            }
        }
    }
    report
}

#[cfg(test)]
#[path = "../../tests/unit/assets/registry.rs"]
mod tests;
