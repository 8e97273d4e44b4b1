use std::time::{Duration, Instant};

use crate::foundation::error::CardError;
use crate::persist::kv::KeyValueStore;
use crate::persist::records::{FRAMES_KEY, PHOTOS_KEY, PROJECT_KEY, SAVED_CARDS_KEY, save_record};
use crate::state::editor::{Editor, Revisions};

/// What a flush wrote.
#[derive(Debug, Default)]
pub struct PersistReport {
    /// Keys written successfully.
    pub written: Vec<&'static str>,
    /// Keys that failed, with the error. They stay dirty and are retried on the next flush.
    pub failed: Vec<(&'static str, CardError)>,
}

impl PersistReport {
    /// `true` when nothing failed.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Writes changed records to a store, either on demand or after a quiet period.
///
/// Each record is written only when its revision moved since the last successful write.
pub struct Persister {
    store: Box<dyn KeyValueStore>,
    debounce: Duration,
    flushed: Option<Revisions>,
    first_seen: Option<(Revisions, Instant)>,
}

impl std::fmt::Debug for Persister {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persister")
            .field("debounce", &self.debounce)
            .field("flushed", &self.flushed)
            .finish_non_exhaustive()
    }
}

impl Persister {
    /// Persister that treats every record as unsaved.
    pub fn new(store: Box<dyn KeyValueStore>, debounce: Duration) -> Self {
        Self {
            store,
            debounce,
            flushed: None,
            first_seen: None,
        }
    }

    /// Record that the store already matches `editor` (for example right after a restore).
    pub fn mark_synced(&mut self, editor: &Editor) {
        self.flushed = Some(editor.revisions());
        self.first_seen = None;
    }

    /// Underlying store.
    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    /// `true` when some record changed since the last successful write.
    pub fn is_dirty(&self, editor: &Editor) -> bool {
        self.flushed != Some(editor.revisions())
    }

    /// Flush once the editor has been unchanged for the debounce period.
    ///
    /// Call this on every tick or after every command. Returns `None` when nothing was written.
    pub fn maybe_persist(&mut self, editor: &Editor, now: Instant) -> Option<PersistReport> {
        let current = editor.revisions();
        if !self.is_dirty(editor) {
            self.first_seen = None;
            return None;
        }
        match self.first_seen {
            Some((seen, since)) if seen == current => {
                if now.saturating_duration_since(since) >= self.debounce {
                    Some(self.persist(editor))
                } else {
                    None
                }
            }
            _ => {
                self.first_seen = Some((current, now));
                if self.debounce.is_zero() {
                    Some(self.persist(editor))
                } else {
                    None
                }
            }
        }
    }

    /// Write every changed record now. Write failures are logged and reported, not returned.
    pub fn persist(&mut self, editor: &Editor) -> PersistReport {
        let current = editor.revisions();
        let mut done = self.flushed.unwrap_or(Revisions {
            frames: u64::MAX,
            photos: u64::MAX,
            project: u64::MAX,
            saved: u64::MAX,
        });
        let mut report = PersistReport::default();

        if done.frames != current.frames {
            match save_record(self.store.as_mut(), FRAMES_KEY, editor.frames()) {
                Ok(()) => {
                    done.frames = current.frames;
                    report.written.push(FRAMES_KEY);
                }
                Err(e) => report.failed.push((FRAMES_KEY, e)),
            }
        }
        if done.photos != current.photos {
            match save_record(self.store.as_mut(), PHOTOS_KEY, editor.photos()) {
                Ok(()) => {
                    done.photos = current.photos;
                    report.written.push(PHOTOS_KEY);
                }
                Err(e) => report.failed.push((PHOTOS_KEY, e)),
            }
        }
        if done.project != current.project {
            match save_record(self.store.as_mut(), PROJECT_KEY, editor.project()) {
                Ok(()) => {
                    done.project = current.project;
                    report.written.push(PROJECT_KEY);
                }
                Err(e) => report.failed.push((PROJECT_KEY, e)),
            }
        }
        if done.saved != current.saved {
            match save_record(self.store.as_mut(), SAVED_CARDS_KEY, editor.saved_cards()) {
                Ok(()) => {
                    done.saved = current.saved;
                    report.written.push(SAVED_CARDS_KEY);
                }
                Err(e) => report.failed.push((SAVED_CARDS_KEY, e)),
            }
        }

        for (key, e) in &report.failed {
            tracing::warn!(key, error = %e, "persisting record failed");
        }
        if !report.written.is_empty() {
            tracing::info!(records = ?report.written, "persisted");
        }
        self.flushed = Some(done);
        self.first_seen = None;
        report
    }
}

#[cfg(test)]
#[path = "../../tests/unit/persist/writer.rs"]
mod tests;
