use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::assets::registry::{Asset, AssetRegistry, FrameAsset, PhotoAsset};
use crate::foundation::error::CardResult;
use crate::model::project::Project;
use crate::model::saved::{SavedCard, SavedCards};
use crate::persist::kv::KeyValueStore;

/// Frame collection.
pub const FRAMES_KEY: &str = "framecard.frames";
/// Photo collection.
pub const PHOTOS_KEY: &str = "framecard.photos";
/// Project record.
pub const PROJECT_KEY: &str = "framecard.project";
/// Saved-card list.
pub const SAVED_CARDS_KEY: &str = "framecard.saved_cards";

/// Everything read back from a store.
#[derive(Clone, Debug, Default)]
pub struct StoredRecords {
    /// Frames, without the bundled one unless it was stored.
    pub frames: AssetRegistry<FrameAsset>,
    /// Photos.
    pub photos: AssetRegistry<PhotoAsset>,
    /// Project, possibly holding dangling selections.
    pub project: Project,
    /// Saved cards.
    pub saved: SavedCards,
}

impl StoredRecords {
    /// Load all four records, substituting defaults for anything missing or unreadable.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        Self {
            frames: load_assets(store, FRAMES_KEY),
            photos: load_assets(store, PHOTOS_KEY),
            project: load_project(store),
            saved: load_saved_cards(store),
        }
    }
}

fn read_json(store: &dyn KeyValueStore, key: &str) -> Option<serde_json::Value> {
    match store.get(key) {
        Ok(Some(text)) => match serde_json::from_str(&text) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!(key, error = %e, "stored record is not valid JSON; using default");
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            tracing::warn!(key, error = %e, "store read failed; using default");
            None
        }
    }
}

/// Deserialize a JSON array element by element, skipping entries that do not parse.
fn lenient_list<T: DeserializeOwned>(key: &str, value: serde_json::Value) -> Vec<T> {
    let serde_json::Value::Array(items) = value else {
        tracing::warn!(key, "stored record is not a list; using empty list");
        return Vec::new();
    };
    items
        .into_iter()
        .enumerate()
        .filter_map(|(i, item)| match serde_json::from_value(item) {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!(key, index = i, error = %e, "skipping unreadable entry");
                None
            }
        })
        .collect()
}

/// Load an asset collection; missing, unreadable or partially corrupt records degrade gracefully.
pub fn load_assets<A: Asset>(store: &dyn KeyValueStore, key: &str) -> AssetRegistry<A> {
    read_json(store, key)
        .map(|v| AssetRegistry::from_vec(lenient_list(key, v)))
        .unwrap_or_default()
}

/// Load the project record, or [`Project::default`].
pub fn load_project(store: &dyn KeyValueStore) -> Project {
    read_json(store, PROJECT_KEY)
        .and_then(|v| match serde_json::from_value(v) {
            Ok(p) => Some(p),
            Err(e) => {
                tracing::warn!(key = PROJECT_KEY, error = %e, "unreadable project; using default");
                None
            }
        })
        .unwrap_or_default()
}

/// Load the saved-card list, or an empty one.
pub fn load_saved_cards(store: &dyn KeyValueStore) -> SavedCards {
    read_json(store, SAVED_CARDS_KEY)
        .map(|v| SavedCards::from_vec(lenient_list::<SavedCard>(SAVED_CARDS_KEY, v)))
        .unwrap_or_default()
}

/// Serialize `value` and write it under `key`.
pub fn save_record<T: Serialize + ?Sized>(
    store: &mut dyn KeyValueStore,
    key: &str,
    value: &T,
) -> CardResult<()> {
    let text = serde_json::to_string(value)?;
    store.set(key, &text)
}

#[cfg(test)]
#[path = "../../tests/unit/persist/records.rs"]
mod tests;
