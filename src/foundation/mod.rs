/// Colors used by captions and backgrounds.
pub mod color;
/// Canvas dimensions and kurbo re-exports.
pub mod core;
/// Crate error type.
pub mod error;
pub(crate) mod math;
