//! The project state owner.
//!
//! [`Editor`] owns the asset registries, the project record and the coordinate spaces. Every
//! mutation goes through a command method; commands that touch the project return the new
//! immutable [`ProjectSnapshot`]. A selection change and the transform recomputed for it land in
//! the same snapshot.

use std::collections::HashMap;
use std::sync::Arc;

use crate::assets::builtin::ensure_default_frame;
use crate::assets::decode::{DecodedImage, ImagePayload};
use crate::assets::registry::{
    Asset, AssetId, AssetRegistry, FrameAsset, PhotoAsset, Upload, ingest_uploads,
};
use crate::config::EditorConfig;
use crate::foundation::core::{Canvas, Vec2};
use crate::foundation::error::{CardError, CardResult};
use crate::geometry::detect::{MaskDetection, MaskSource, detect_mask_rgba8};
use crate::geometry::fit::{FitMode, try_compute_fit_transform};
use crate::geometry::mask::Mask;
use crate::geometry::space::{CoordinateSpaces, FrameWindow};
use crate::geometry::transform::PhotoTransform;
use crate::model::project::Project;
use crate::model::saved::{SavedCard, SavedCards};
use crate::model::text::TextProperties;
use crate::persist::kv::KeyValueStore;
use crate::persist::records::StoredRecords;
use crate::state::tasks::{CancellationToken, TaskHandle, TaskPoll};

/// Immutable view of the project after a command.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectSnapshot {
    /// Increments on every project change.
    pub revision: u64,
    /// The project at that revision.
    pub project: Project,
}

/// Per-record change counters, compared by the persister.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Revisions {
    /// Frame collection.
    pub frames: u64,
    /// Photo collection.
    pub photos: u64,
    /// Project record.
    pub project: u64,
    /// Saved cards.
    pub saved: u64,
}

/// Identifier of a background task started by the editor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub u64);

/// A background completion applied by [`Editor::poll_tasks`] or [`Editor::wait_for_tasks`].
#[derive(Debug)]
pub enum TaskEvent {
    /// A frame upload was decoded, its window detected, and the frame added.
    FrameAdded {
        /// Task.
        task: TaskId,
        /// New frame.
        id: AssetId,
        /// How the window was obtained.
        mask_source: MaskSource,
    },
    /// A photo upload was decoded and added.
    PhotoAdded {
        /// Task.
        task: TaskId,
        /// New photo.
        id: AssetId,
    },
    /// An upload could not be decoded; nothing was added.
    UploadFailed {
        /// Task.
        task: TaskId,
        /// Uploaded file name.
        name: String,
        /// Why.
        error: CardError,
    },
    /// Re-detection replaced a frame's window.
    MaskUpdated {
        /// Task.
        task: TaskId,
        /// Frame.
        frame_id: AssetId,
        /// How the window was obtained.
        source: MaskSource,
    },
    /// The result arrived for an asset that is gone, or the task was cancelled.
    Discarded {
        /// Task.
        task: TaskId,
    },
}

/// Outcome of a synchronous batch upload.
#[derive(Debug, Default)]
pub struct UploadOutcome {
    /// Added assets in upload order.
    pub added: Vec<AssetId>,
    /// Skipped files and why.
    pub rejected: Vec<(String, CardError)>,
}

type FrameUploadResult = CardResult<(FrameAsset, DecodedImage, MaskDetection)>;
type PhotoUploadResult = CardResult<(PhotoAsset, DecodedImage)>;

enum PendingWork {
    FrameUpload {
        name: String,
        handle: TaskHandle<FrameUploadResult>,
    },
    PhotoUpload {
        name: String,
        handle: TaskHandle<PhotoUploadResult>,
    },
    Redetect {
        frame_id: AssetId,
        handle: TaskHandle<CardResult<MaskDetection>>,
    },
}

struct PendingTask {
    id: TaskId,
    work: PendingWork,
}

enum Completion {
    FrameUpload(String, FrameUploadResult),
    PhotoUpload(String, PhotoUploadResult),
    Redetect(AssetId, CardResult<MaskDetection>),
}

impl PendingTask {
    fn token(&self) -> &CancellationToken {
        match &self.work {
            PendingWork::FrameUpload { handle, .. } => handle.token(),
            PendingWork::PhotoUpload { handle, .. } => handle.token(),
            PendingWork::Redetect { handle, .. } => handle.token(),
        }
    }

    fn is_for_frame(&self, id: &AssetId) -> bool {
        matches!(&self.work, PendingWork::Redetect { frame_id, .. } if frame_id == id)
    }

    fn poll(&mut self) -> TaskPoll<Completion> {
        match &mut self.work {
            PendingWork::FrameUpload { name, handle } => match handle.try_take() {
                TaskPoll::Ready(r) => TaskPoll::Ready(Completion::FrameUpload(name.clone(), r)),
                TaskPoll::Pending => TaskPoll::Pending,
                TaskPoll::Gone => TaskPoll::Gone,
            },
            PendingWork::PhotoUpload { name, handle } => match handle.try_take() {
                TaskPoll::Ready(r) => TaskPoll::Ready(Completion::PhotoUpload(name.clone(), r)),
                TaskPoll::Pending => TaskPoll::Pending,
                TaskPoll::Gone => TaskPoll::Gone,
            },
            PendingWork::Redetect { frame_id, handle } => match handle.try_take() {
                TaskPoll::Ready(d) => TaskPoll::Ready(Completion::Redetect(frame_id.clone(), d)),
                TaskPoll::Pending => TaskPoll::Pending,
                TaskPoll::Gone => TaskPoll::Gone,
            },
        }
    }

    fn wait(&mut self) -> Option<Completion> {
        match &mut self.work {
            PendingWork::FrameUpload { name, handle } => handle
                .wait()
                .map(|r| Completion::FrameUpload(name.clone(), r)),
            PendingWork::PhotoUpload { name, handle } => handle
                .wait()
                .map(|r| Completion::PhotoUpload(name.clone(), r)),
            PendingWork::Redetect { frame_id, handle } => handle
                .wait()
                .map(|d| Completion::Redetect(frame_id.clone(), d)),
        }
    }
}

/// Single owner of the card being edited.
pub struct Editor {
    spaces: CoordinateSpaces,
    frames: AssetRegistry<FrameAsset>,
    photos: AssetRegistry<PhotoAsset>,
    saved: SavedCards,
    snapshot: Arc<ProjectSnapshot>,
    revisions: Revisions,
    decoded: HashMap<AssetId, Arc<DecodedImage>>,
    pending: Vec<PendingTask>,
    next_task: u64,
}

impl std::fmt::Debug for Editor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Editor")
            .field("canvas", &self.spaces.canvas())
            .field("frames", &self.frames.len())
            .field("photos", &self.photos.len())
            .field("saved", &self.saved.len())
            .field("revisions", &self.revisions)
            .field("pending", &self.pending.len())
            .finish()
    }
}

impl Drop for Editor {
    fn drop(&mut self) {
        for task in &self.pending {
            task.token().cancel();
        }
    }
}

impl Editor {
    /// Empty editor for `canvas`, without the bundled frame.
    pub fn new(canvas: Canvas) -> Self {
        Self {
            spaces: CoordinateSpaces::new(canvas),
            frames: AssetRegistry::new(),
            photos: AssetRegistry::new(),
            saved: SavedCards::new(),
            snapshot: Arc::new(ProjectSnapshot {
                revision: 0,
                project: Project::default(),
            }),
            revisions: Revisions::default(),
            decoded: HashMap::new(),
            pending: Vec::new(),
            next_task: 0,
        }
    }

    /// Editor for `canvas` holding just the bundled frame.
    pub fn with_default_frame(canvas: Canvas) -> CardResult<Self> {
        let mut editor = Self::new(canvas);
        ensure_default_frame(&mut editor.frames)?;
        Ok(editor)
    }

    /// Rebuild an editor from stored records.
    ///
    /// The bundled frame is prepended when missing, selections pointing at assets that no longer
    /// exist are dropped, and the configured display size is applied. Never fails: problems are
    /// logged and replaced by defaults.
    pub fn from_records(config: &EditorConfig, records: StoredRecords) -> Self {
        let StoredRecords {
            mut frames,
            photos,
            mut project,
            saved,
        } = records;

        if let Err(e) = ensure_default_frame(&mut frames) {
            tracing::warn!(error = %e, "bundled frame unavailable");
        }
        let mut reset_masks = Vec::new();
        for id in frames.ids() {
            if let Some(frame) = frames.get_mut(&id)
                && let Some(mask) = frame.mask
                && let Err(e) = mask.validate()
            {
                tracing::warn!(%id, error = %e, "dropping unusable stored mask");
                frame.mask = None;
                reset_masks.push(id);
            }
        }

        let mut window_changed = false;
        if let Some(id) = &project.selected_frame_id {
            if !frames.contains(id) {
                tracing::warn!(%id, "dropping selection of missing frame");
                project.selected_frame_id = None;
                window_changed = true;
            } else if reset_masks.contains(id) {
                window_changed = true;
            }
        }
        if let Some(id) = &project.selected_photo_id
            && !photos.contains(id)
        {
            tracing::warn!(%id, "dropping selection of missing photo");
            project.selected_photo_id = None;
        }
        if project.selected_photo_id.is_none() || project.photo_transform.validate().is_err() {
            project.photo_transform = PhotoTransform::default();
        }
        if project.text.validate().is_err() {
            project.text = TextProperties::default();
        }

        let mut spaces = CoordinateSpaces::new(config.canvas);
        if let Some(d) = config.display
            && let Err(e) = spaces.set_display_size(d.width, d.height)
        {
            tracing::warn!(error = %e, "ignoring configured display size");
        }

        let mut editor = Self {
            spaces,
            frames,
            photos,
            saved,
            snapshot: Arc::new(ProjectSnapshot {
                revision: 0,
                project,
            }),
            revisions: Revisions::default(),
            decoded: HashMap::new(),
            pending: Vec::new(),
            next_task: 0,
        };

        // The stored transform was fitted to a window that no longer applies.
        if window_changed && let Some(photo_id) = editor.project().selected_photo_id.clone() {
            let frame_id = editor.project().selected_frame_id.clone();
            let mut project = editor.project().clone();
            project.photo_transform = editor
                .fit_photo(&photo_id, frame_id.as_ref(), FitMode::Fill)
                .unwrap_or_else(|e| {
                    tracing::warn!(error = %e, "refit after restore failed; using default");
                    PhotoTransform::default()
                });
            editor.snapshot = Arc::new(ProjectSnapshot {
                revision: 0,
                project,
            });
        }
        editor
    }

    /// Load the stored records from `store` and rebuild the editor.
    pub fn restore(config: &EditorConfig, store: &dyn KeyValueStore) -> Self {
        Self::from_records(config, StoredRecords::load(store))
    }

    // --- accessors --------------------------------------------------------------------------

    /// Latest project snapshot.
    pub fn snapshot(&self) -> Arc<ProjectSnapshot> {
        Arc::clone(&self.snapshot)
    }

    /// Latest project.
    pub fn project(&self) -> &Project {
        &self.snapshot.project
    }

    /// Frame collection.
    pub fn frames(&self) -> &AssetRegistry<FrameAsset> {
        &self.frames
    }

    /// Photo collection.
    pub fn photos(&self) -> &AssetRegistry<PhotoAsset> {
        &self.photos
    }

    /// Saved cards, newest first.
    pub fn saved_cards(&self) -> &SavedCards {
        &self.saved
    }

    /// Coordinate spaces, including the current display mapping.
    pub fn spaces(&self) -> &CoordinateSpaces {
        &self.spaces
    }

    /// Logical canvas.
    pub fn canvas(&self) -> Canvas {
        self.spaces.canvas()
    }

    /// Change counters.
    pub fn revisions(&self) -> Revisions {
        self.revisions
    }

    /// Number of background tasks not yet applied.
    pub fn pending_tasks(&self) -> usize {
        self.pending.len()
    }

    /// Selected frame, if it still exists.
    pub fn selected_frame(&self) -> Option<&FrameAsset> {
        self.project()
            .selected_frame_id
            .as_ref()
            .and_then(|id| self.frames.get(id))
    }

    /// Selected photo, if it still exists.
    pub fn selected_photo(&self) -> Option<&PhotoAsset> {
        self.project()
            .selected_photo_id
            .as_ref()
            .and_then(|id| self.photos.get(id))
    }

    /// Decoded pixels kept from ingestion, if any.
    pub fn cached_image(&self, id: &AssetId) -> Option<Arc<DecodedImage>> {
        self.decoded.get(id).cloned()
    }

    /// Photo window of the selected frame in canvas space.
    pub fn window_in_canvas(&self) -> CardResult<Mask> {
        self.window_for(self.project().selected_frame_id.as_ref())
    }

    // --- project commands -------------------------------------------------------------------

    /// Select a frame (or none). With a photo selected, the photo is re-fitted with `fill` against
    /// the new window in the same snapshot.
    pub fn select_frame(&mut self, id: Option<AssetId>) -> CardResult<Arc<ProjectSnapshot>> {
        if let Some(id) = &id {
            self.frames.require(id)?;
        }
        let mut next = self.project().clone();
        next.selected_frame_id = id;
        if let Some(photo_id) = next.selected_photo_id.clone() {
            next.photo_transform =
                self.fit_photo(&photo_id, next.selected_frame_id.as_ref(), FitMode::Fill)?;
        }
        Ok(self.commit(next))
    }

    /// Select a photo (or none). A selected photo is fitted with `fill` into the current window;
    /// clearing the selection resets the transform.
    pub fn select_photo(&mut self, id: Option<AssetId>) -> CardResult<Arc<ProjectSnapshot>> {
        let mut next = self.project().clone();
        next.photo_transform = match &id {
            Some(photo_id) => {
                self.fit_photo(photo_id, next.selected_frame_id.as_ref(), FitMode::Fill)?
            }
            None => PhotoTransform::default(),
        };
        next.selected_photo_id = id;
        Ok(self.commit(next))
    }

    /// Replace the photo transform.
    pub fn set_photo_transform(
        &mut self,
        transform: PhotoTransform,
    ) -> CardResult<Arc<ProjectSnapshot>> {
        transform.validate()?;
        self.require_photo_selected()?;
        let mut next = self.project().clone();
        next.photo_transform = transform;
        Ok(self.commit(next))
    }

    /// Replace the caption.
    pub fn set_text_properties(
        &mut self,
        text: TextProperties,
    ) -> CardResult<Arc<ProjectSnapshot>> {
        text.validate()?;
        let mut next = self.project().clone();
        next.text = text;
        Ok(self.commit(next))
    }

    /// Re-apply a scaling policy to the selected photo. Rotation is reset.
    pub fn apply_fit(&mut self, mode: FitMode) -> CardResult<Arc<ProjectSnapshot>> {
        let photo_id = self.require_photo_selected()?;
        let mut next = self.project().clone();
        next.photo_transform = self.fit_photo(&photo_id, next.selected_frame_id.as_ref(), mode)?;
        Ok(self.commit(next))
    }

    /// Move the selected photo by a pointer delta measured in display pixels.
    pub fn drag_photo(&mut self, display_delta: Vec2) -> CardResult<Arc<ProjectSnapshot>> {
        self.require_photo_selected()?;
        let delta = self.spaces.drag_to_canvas(display_delta);
        let mut next = self.project().clone();
        next.photo_transform = next.photo_transform.translated(delta);
        Ok(self.commit(next))
    }

    /// Move the caption by a pointer delta measured in display pixels.
    pub fn drag_text(&mut self, display_delta: Vec2) -> Arc<ProjectSnapshot> {
        let delta = self.spaces.drag_to_canvas(display_delta);
        let mut next = self.project().clone();
        next.text = next.text.translated(delta);
        self.commit(next)
    }

    /// Resize the editing surface. Stored positions are unaffected. Returns the new display scale.
    pub fn set_display_size(&mut self, width: f64, height: f64) -> CardResult<f64> {
        self.spaces.set_display_size(width, height)?;
        Ok(self.spaces.display_scale())
    }

    // --- masks ------------------------------------------------------------------------------

    /// Store an edited window for a frame, in the frame's native pixels.
    ///
    /// The mask is clamped like an interactive edit. Pending re-detections for the frame are
    /// cancelled. If the frame and a photo are selected, the photo is re-fitted with `fill`.
    pub fn save_mask(
        &mut self,
        frame_id: &AssetId,
        mask: Mask,
    ) -> CardResult<Arc<ProjectSnapshot>> {
        let frame = self.frames.require(frame_id)?;
        let clamped = mask.clamp_for_edit(frame.width, frame.height);
        clamped.validate()?;

        for task in self.pending.iter().filter(|t| t.is_for_frame(frame_id)) {
            task.token().cancel();
        }
        self.store_mask(frame_id, clamped)
    }

    /// Store a window edited on the canvas, converting it back to the frame's native pixels.
    pub fn save_canvas_window(
        &mut self,
        frame_id: &AssetId,
        canvas_window: Mask,
    ) -> CardResult<Arc<ProjectSnapshot>> {
        let frame = self.frames.require(frame_id)?;
        let mask = self
            .spaces
            .window_to_asset(frame.width, frame.height, &canvas_window)?;
        self.save_mask(frame_id, mask)
    }

    /// Run window detection for an existing frame in the background.
    pub fn redetect_mask(&mut self, frame_id: &AssetId) -> CardResult<TaskId> {
        let payload = self.frames.require(frame_id)?.payload.clone();
        let cached = self.decoded.get(frame_id).cloned();
        let handle = TaskHandle::spawn(CancellationToken::new(), move || {
            let decoded = match cached {
                Some(d) => d,
                None => Arc::new(payload.decode()?),
            };
            Ok(detect_mask_rgba8(&decoded.rgba8, decoded.width, decoded.height))
        });
        Ok(self.push_task(PendingWork::Redetect {
            frame_id: frame_id.clone(),
            handle,
        }))
    }

    // --- assets -----------------------------------------------------------------------------

    /// Add a frame. An existing frame with the same id is replaced.
    pub fn add_frame(&mut self, frame: FrameAsset) -> AssetId {
        let id = frame.id.clone();
        self.decoded.remove(&id);
        self.frames.insert(frame);
        self.revisions.frames += 1;
        id
    }

    /// Add a photo. An existing photo with the same id is replaced.
    pub fn add_photo(&mut self, photo: PhotoAsset) -> AssetId {
        let id = photo.id.clone();
        self.decoded.remove(&id);
        self.photos.insert(photo);
        self.revisions.photos += 1;
        id
    }

    /// Decode a batch of frame files, detect their windows, and add them.
    pub fn ingest_frames(&mut self, uploads: impl IntoIterator<Item = Upload>) -> UploadOutcome {
        let report = ingest_uploads::<FrameAsset>(uploads);
        let mut out = UploadOutcome {
            added: Vec::new(),
            rejected: report.rejected,
        };
        for (mut frame, decoded) in report.accepted {
            let detection = detect_mask_rgba8(&decoded.rgba8, decoded.width, decoded.height);
            frame.mask = Some(detection.mask);
            out.added.push(self.add_decoded_frame(frame, decoded));
        }
        out
    }

    /// Decode a batch of photo files and add them.
    pub fn ingest_photos(&mut self, uploads: impl IntoIterator<Item = Upload>) -> UploadOutcome {
        let report = ingest_uploads::<PhotoAsset>(uploads);
        let mut out = UploadOutcome {
            added: Vec::new(),
            rejected: report.rejected,
        };
        for (photo, decoded) in report.accepted {
            out.added.push(self.add_decoded_photo(photo, decoded));
        }
        out
    }

    /// Decode and detect a frame upload in the background.
    pub fn begin_frame_upload(&mut self, upload: Upload) -> TaskId {
        let name = upload.name.clone();
        let handle = TaskHandle::spawn(CancellationToken::new(), move || {
            let (frame, decoded) = FrameAsset::from_upload(&upload.name, upload.bytes)?;
            let detection = detect_mask_rgba8(&decoded.rgba8, decoded.width, decoded.height);
            Ok((frame, decoded, detection))
        });
        self.push_task(PendingWork::FrameUpload { name, handle })
    }

    /// Decode a photo upload in the background.
    pub fn begin_photo_upload(&mut self, upload: Upload) -> TaskId {
        let name = upload.name.clone();
        let handle = TaskHandle::spawn(CancellationToken::new(), move || {
            PhotoAsset::from_upload(&upload.name, upload.bytes)
        });
        self.push_task(PendingWork::PhotoUpload { name, handle })
    }

    /// Delete a frame, cancelling its background work and clearing its selection.
    pub fn remove_frame(&mut self, id: &AssetId) -> CardResult<Arc<ProjectSnapshot>> {
        self.frames.require(id)?;
        for task in self.pending.iter().filter(|t| t.is_for_frame(id)) {
            task.token().cancel();
        }
        self.frames.remove(id);
        self.decoded.remove(id);
        self.revisions.frames += 1;

        if self.project().selected_frame_id.as_ref() == Some(id) {
            return self.select_frame(None);
        }
        Ok(self.snapshot())
    }

    /// Delete a photo and clear its selection.
    pub fn remove_photo(&mut self, id: &AssetId) -> CardResult<Arc<ProjectSnapshot>> {
        self.photos.require(id)?;
        self.photos.remove(id);
        self.decoded.remove(id);
        self.revisions.photos += 1;

        if self.project().selected_photo_id.as_ref() == Some(id) {
            return self.select_photo(None);
        }
        Ok(self.snapshot())
    }

    // --- saved cards ------------------------------------------------------------------------

    /// Store a finished card at the front of the saved list, evicting the oldest when full.
    pub fn save_card(&mut self, name: impl Into<String>, image: ImagePayload) -> SavedCard {
        let name = name.into();
        let created_at_ms = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        let card = SavedCard {
            id: AssetId::generate("card", &name, image.bytes()),
            name,
            created_at_ms,
            image,
        };
        if let Some(evicted) = self.saved.push(card.clone()) {
            tracing::debug!(id = %evicted.id, "evicted oldest saved card");
        }
        self.revisions.saved += 1;
        card
    }

    /// Delete a saved card.
    pub fn remove_saved_card(&mut self, id: &AssetId) -> Option<SavedCard> {
        let removed = self.saved.remove(id)?;
        self.revisions.saved += 1;
        Some(removed)
    }

    // --- background tasks -------------------------------------------------------------------

    /// Apply every finished background task without blocking.
    pub fn poll_tasks(&mut self) -> Vec<TaskEvent> {
        let mut events = Vec::new();
        let mut still_pending = Vec::with_capacity(self.pending.len());
        for mut task in std::mem::take(&mut self.pending) {
            match task.poll() {
                TaskPoll::Pending => still_pending.push(task),
                TaskPoll::Ready(done) => events.push(self.apply_completion(task.id, done)),
                TaskPoll::Gone => {
                    tracing::debug!(task = task.id.0, "task cancelled before completion");
                    events.push(TaskEvent::Discarded { task: task.id });
                }
            }
        }
        // Tasks started while applying completions are kept too.
        still_pending.append(&mut self.pending);
        self.pending = still_pending;
        events
    }

    /// Block until every background task has finished and been applied.
    pub fn wait_for_tasks(&mut self) -> Vec<TaskEvent> {
        let mut events = Vec::new();
        while !self.pending.is_empty() {
            for mut task in std::mem::take(&mut self.pending) {
                match task.wait() {
                    Some(done) => events.push(self.apply_completion(task.id, done)),
                    None => {
                        tracing::debug!(task = task.id.0, "task cancelled before completion");
                        events.push(TaskEvent::Discarded { task: task.id });
                    }
                }
            }
        }
        events
    }

    // --- internals --------------------------------------------------------------------------

    fn commit(&mut self, project: Project) -> Arc<ProjectSnapshot> {
        self.revisions.project += 1;
        self.snapshot = Arc::new(ProjectSnapshot {
            revision: self.revisions.project,
            project,
        });
        self.snapshot()
    }

    fn require_photo_selected(&self) -> CardResult<AssetId> {
        self.project()
            .selected_photo_id
            .clone()
            .ok_or_else(|| CardError::validation("no photo selected"))
    }

    fn window_for(&self, frame_id: Option<&AssetId>) -> CardResult<Mask> {
        let window: Option<FrameWindow> = match frame_id {
            Some(id) => Some(self.frames.require(id)?.window()),
            None => None,
        };
        self.spaces.window_in_canvas(window)
    }

    fn fit_photo(
        &self,
        photo_id: &AssetId,
        frame_id: Option<&AssetId>,
        mode: FitMode,
    ) -> CardResult<PhotoTransform> {
        let photo = self.photos.require(photo_id)?;
        let window = self.window_for(frame_id)?;
        try_compute_fit_transform(
            f64::from(photo.width),
            f64::from(photo.height),
            &window,
            mode,
        )
    }

    fn store_mask(&mut self, frame_id: &AssetId, mask: Mask) -> CardResult<Arc<ProjectSnapshot>> {
        let frame = self
            .frames
            .get_mut(frame_id)
            .ok_or_else(|| CardError::validation(format!("unknown frame id \"{frame_id}\"")))?;
        frame.mask = Some(mask);
        self.revisions.frames += 1;

        let project = self.project();
        if project.selected_frame_id.as_ref() == Some(frame_id)
            && let Some(photo_id) = project.selected_photo_id.clone()
        {
            let mut next = project.clone();
            next.photo_transform = self.fit_photo(&photo_id, Some(frame_id), FitMode::Fill)?;
            return Ok(self.commit(next));
        }
        Ok(self.snapshot())
    }

    fn add_decoded_frame(&mut self, frame: FrameAsset, decoded: DecodedImage) -> AssetId {
        let id = self.add_frame(frame);
        self.decoded.insert(id.clone(), Arc::new(decoded));
        id
    }

    fn add_decoded_photo(&mut self, photo: PhotoAsset, decoded: DecodedImage) -> AssetId {
        let id = self.add_photo(photo);
        self.decoded.insert(id.clone(), Arc::new(decoded));
        id
    }

    fn push_task(&mut self, work: PendingWork) -> TaskId {
        self.next_task += 1;
        let id = TaskId(self.next_task);
        self.pending.push(PendingTask { id, work });
        id
    }

    fn apply_completion(&mut self, task: TaskId, done: Completion) -> TaskEvent {
        match done {
            Completion::FrameUpload(_, Ok((mut frame, decoded, detection))) => {
                frame.mask = Some(detection.mask);
                let id = self.add_decoded_frame(frame, decoded);
                tracing::debug!(%id, source = ?detection.source, "frame upload applied");
                TaskEvent::FrameAdded {
                    task,
                    id,
                    mask_source: detection.source,
                }
            }
            Completion::PhotoUpload(_, Ok((photo, decoded))) => {
                let id = self.add_decoded_photo(photo, decoded);
                tracing::debug!(%id, "photo upload applied");
                TaskEvent::PhotoAdded { task, id }
            }
            Completion::FrameUpload(name, Err(error)) | Completion::PhotoUpload(name, Err(error)) => {
                tracing::warn!(%name, error = %error, "upload skipped");
                TaskEvent::UploadFailed { task, name, error }
            }
            Completion::Redetect(frame_id, Err(error)) => {
                tracing::warn!(%frame_id, error = %error, "window detection failed");
                TaskEvent::Discarded { task }
            }
            Completion::Redetect(frame_id, Ok(detection)) => {
                if !self.frames.contains(&frame_id) {
                    tracing::debug!(%frame_id, "discarding detection for removed frame");
                    return TaskEvent::Discarded { task };
                }
                match self.store_mask(&frame_id, detection.mask) {
                    Ok(_) => TaskEvent::MaskUpdated {
                        task,
                        frame_id,
                        source: detection.source,
                    },
                    Err(e) => {
                        tracing::warn!(%frame_id, error = %e, "could not apply detected window");
                        TaskEvent::Discarded { task }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/state/editor.rs"]
mod tests;
