/// Crate result alias.
pub type CardResult<T> = Result<T, CardError>;

/// Errors surfaced by the compositor, registry, persistence and export layers.
#[derive(thiserror::Error, Debug)]
pub enum CardError {
    /// Invalid input or broken precondition (unknown ids, zero-sized geometry).
    #[error("validation error: {0}")]
    Validation(String),

    /// An uploaded payload could not be decoded as an image.
    #[error("decode error: {0}")]
    Decode(String),

    /// Key/value store read or write failure.
    #[error("storage error: {0}")]
    Storage(String),

    /// No usable render target, or rasterization failed.
    #[error("render error: {0}")]
    Render(String),

    /// Encoding the rasterized card into an image or document failed.
    #[error("export error: {0}")]
    Export(String),

    /// JSON (de)serialization failure.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Anything else, with its source chain preserved.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CardError {
    /// Build a [`CardError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CardError::Decode`].
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`CardError::Storage`].
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Build a [`CardError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`CardError::Export`].
    pub fn export(msg: impl Into<String>) -> Self {
        Self::Export(msg.into())
    }

    /// Build a [`CardError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Return `true` for failures the user can retry (render/export/decode/storage).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Decode(_) | Self::Storage(_) | Self::Render(_) | Self::Export(_)
        )
    }
}

impl From<serde_json::Error> for CardError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
