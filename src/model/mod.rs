/// Persisted project record.
pub mod project;
/// Saved finished cards.
pub mod saved;
/// Caption styling.
pub mod text;
