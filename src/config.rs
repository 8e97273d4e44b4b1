//! Editor and export configuration.
//!
//! Loaded from an optional JSON file; every field has a default so `{}` is a valid config.
//! A few tunables can be overridden through `FRAMECARD_*` environment variables.

use std::path::{Path, PathBuf};

use crate::foundation::color::Rgba8;
use crate::foundation::core::Canvas;
use crate::foundation::error::{CardError, CardResult};

/// Environment variable overriding [`EditorConfig::store_dir`].
pub const ENV_STORE_DIR: &str = "FRAMECARD_STORE_DIR";
/// Environment variable overriding [`EditorConfig::export_multiplier`].
pub const ENV_EXPORT_MULTIPLIER: &str = "FRAMECARD_EXPORT_MULTIPLIER";
/// Environment variable overriding [`EditorConfig::persist_debounce_ms`].
pub const ENV_PERSIST_DEBOUNCE_MS: &str = "FRAMECARD_PERSIST_DEBOUNCE_MS";

/// On-screen size of the editing surface.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DisplaySize {
    /// Width in display pixels.
    pub width: f64,
    /// Height in display pixels.
    pub height: f64,
}

/// Top-level configuration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Logical canvas.
    pub canvas: Canvas,
    /// Editing surface; `None` shows the canvas at 1:1.
    pub display: Option<DisplaySize>,
    /// Exports target `canvas * export_multiplier`.
    pub export_multiplier: u32,
    /// Root of the file-backed store; `None` keeps everything in memory.
    pub store_dir: Option<PathBuf>,
    /// Quiet period before a debounced persistence flush.
    pub persist_debounce_ms: u64,
    /// Page margin for document export.
    pub pdf_margin_mm: f32,
    /// JPEG quality, 1..=100.
    pub jpeg_quality: u8,
    /// Painted under every layer.
    pub background: Rgba8,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas::REFERENCE,
            display: None,
            export_multiplier: 1,
            store_dir: None,
            persist_debounce_ms: 500,
            pdf_margin_mm: 10.0,
            jpeg_quality: 92,
            background: Rgba8::WHITE,
        }
    }
}

impl EditorConfig {
    /// Read and validate a JSON config file.
    pub fn from_path(path: &Path) -> CardResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            CardError::validation(format!("read config {}: {e}", path.display()))
        })?;
        let cfg: Self = serde_json::from_str(&text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Apply `FRAMECARD_*` environment overrides. Unparseable values are ignored.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    pub(crate) fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(dir) = lookup(ENV_STORE_DIR).filter(|v| !v.trim().is_empty()) {
            self.store_dir = Some(PathBuf::from(dir));
        }
        if let Some(m) = lookup(ENV_EXPORT_MULTIPLIER)
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|&m| m > 0)
        {
            self.export_multiplier = m;
        }
        if let Some(ms) = lookup(ENV_PERSIST_DEBOUNCE_MS).and_then(|v| v.trim().parse::<u64>().ok())
        {
            self.persist_debounce_ms = ms;
        }
        self
    }

    /// Check value ranges.
    pub fn validate(&self) -> CardResult<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(CardError::validation("canvas width/height must be > 0"));
        }
        if self.export_multiplier == 0 {
            return Err(CardError::validation("export_multiplier must be >= 1"));
        }
        self.canvas.scaled(self.export_multiplier)?;
        if !self.pdf_margin_mm.is_finite() || self.pdf_margin_mm < 0.0 {
            return Err(CardError::validation("pdf_margin_mm must be finite and >= 0"));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(CardError::validation("jpeg_quality must be in 1..=100"));
        }
        if let Some(d) = self.display {
            let ok = d.width.is_finite() && d.height.is_finite() && d.width > 0.0 && d.height > 0.0;
            if !ok {
                return Err(CardError::validation("display width/height must be > 0"));
            }
        }
        Ok(())
    }

    /// Pixel size of exported rasters.
    pub fn export_canvas(&self) -> CardResult<Canvas> {
        self.canvas.scaled(self.export_multiplier)
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
