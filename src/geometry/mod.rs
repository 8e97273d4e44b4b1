//! Pure geometry: window detection, fit policies and coordinate-space conversion.
//!
//! Nothing in here touches the editor state or performs IO. The three coordinate spaces
//! (asset-native, logical canvas, display) are converted exclusively through [`space`].

/// Window-region auto-detection from frame pixels.
pub mod detect;
/// Fit / fill / center placement of a photo inside a window.
pub mod fit;
/// Window rectangle type.
pub mod mask;
/// Asset, canvas and display coordinate spaces.
pub mod space;
/// Photo placement on the logical canvas.
pub mod transform;
