use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::foundation::error::{CardError, CardResult};

/// Minimal string key/value store.
pub trait KeyValueStore: Send {
    /// Read a value; `Ok(None)` when the key has never been written.
    fn get(&self, key: &str) -> CardResult<Option<String>>;
    /// Write or overwrite a value.
    fn set(&mut self, key: &str, value: &str) -> CardResult<()>;
    /// Delete a key. Deleting a missing key is not an error.
    fn remove(&mut self, key: &str) -> CardResult<()>;
}

/// In-process store, used by tests and when no store directory is configured.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> CardResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> CardResult<()> {
        self.entries.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> CardResult<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per key under a root directory.
#[derive(Clone, Debug)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open (and create) a store rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> CardResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|e| {
            CardError::storage(format!("create store dir {}: {e}", root.display()))
        })?;
        Ok(Self { root })
    }

    /// Root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> CardResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
            && !key.starts_with('.');
        if !valid {
            return Err(CardError::storage(format!("invalid store key \"{key}\"")));
        }
        Ok(self.root.join(format!("{key}.json")))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> CardResult<Option<String>> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CardError::storage(format!("read {}: {e}", path.display()))),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> CardResult<()> {
        let path = self.path_for(key)?;
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, value)
            .map_err(|e| CardError::storage(format!("write {}: {e}", tmp.display())))?;
        std::fs::rename(&tmp, &path)
            .map_err(|e| CardError::storage(format!("replace {}: {e}", path.display())))
    }

    fn remove(&mut self, key: &str) -> CardResult<()> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CardError::storage(format!("remove {}: {e}", path.display()))),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/persist/kv.rs"]
mod tests;
