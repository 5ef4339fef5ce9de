/// Convenience result type used across plinth.
pub type PlinthResult<T> = Result<T, PlinthError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Deskew never surfaces these to callers; its failures are folded into
/// [`crate::DeskewResult::reason`]. Layout and compositing return them directly.
#[derive(thiserror::Error, Debug)]
pub enum PlinthError {
    /// Invalid caller-provided geometry, options or stage data.
    #[error("validation error: {0}")]
    Validation(String),

    /// An input image could not be read or decoded.
    #[error("image unreadable: {0}")]
    Decode(String),

    /// The drawing surface could not be created or a buffer did not match it.
    #[error("surface error: {0}")]
    Surface(String),

    /// Errors while evaluating an analysis or render step.
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PlinthError {
    /// Build a [`PlinthError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`PlinthError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`PlinthError::Surface`] value.
    pub fn surface(msg: impl Into<String>) -> Self {
        Self::Surface(msg.into())
    }

    /// Build a [`PlinthError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build a [`PlinthError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
