//! Durable project storage.
//!
//! Frames, photos, the project record and the saved-card list are four independent JSON records in
//! a string-keyed store. Reads never fail from the caller's point of view: a missing or unreadable
//! record comes back as its default. Writes are batched by [`writer::Persister`].

/// String-keyed storage backends.
pub mod kv;
/// Record keys and tolerant (de)serialization.
pub mod records;
/// Debounced flushing.
pub mod writer;
