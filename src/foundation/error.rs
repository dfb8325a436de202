/// Convenience result type used across stagecraft.
pub type StageResult<T> = Result<T, StageError>;

/// Top-level error taxonomy for host-level failures.
///
/// Data-driven mistakes inside a scene document (unknown layers, kinds or
/// state names) are not errors: they are reported through `tracing` and the
/// interpreter keeps running. This type covers what the host has to handle.
#[derive(thiserror::Error, Debug)]
pub enum StageError {
    /// The scene document could not be read or parsed.
    #[error("config error: {0}")]
    Config(String),

    /// An asset could not be loaded or decoded.
    #[error("asset error: {0}")]
    Asset(String),

    /// A drawing surface failed.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StageError {
    /// Build a [`StageError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`StageError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`StageError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`StageError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for StageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
