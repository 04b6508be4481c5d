use std::path::PathBuf;

/// Convenience result type used across storyreel.
pub type StoryreelResult<T> = Result<T, StoryreelError>;

/// Top-level error taxonomy used by pipeline stages.
///
/// Recoverable kinds (`UnreadableMedia`, `MissingAsset`, `Render`) are returned by the leaf
/// operations that detect them; the stage above decides whether to skip and continue.
#[derive(thiserror::Error, Debug)]
pub enum StoryreelError {
    /// Invalid user-provided configuration or input data.
    #[error("validation error: {0}")]
    Validation(String),

    /// No usable clip remained after validation.
    #[error("no valid media: {0}")]
    NoValidMedia(String),

    /// One media reference could not be opened or probed.
    #[error("unreadable media '{}': {reason}", path.display())]
    UnreadableMedia {
        /// Offending media reference.
        path: PathBuf,
        /// Probe/decode failure description.
        reason: String,
    },

    /// An optional asset (background track, font) was not found.
    #[error("missing asset: {0}")]
    MissingAsset(String),

    /// Rendering a single caption overlay failed.
    #[error("render error: {0}")]
    Render(String),

    /// Errors while evaluating a stage (decode, mix, transcript parsing).
    #[error("evaluation error: {0}")]
    Evaluation(String),

    /// Native encoder failure.
    #[error("encode error: {0}")]
    Encode(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StoryreelError {
    /// Build a [`StoryreelError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`StoryreelError::NoValidMedia`] value.
    pub fn no_valid_media(msg: impl Into<String>) -> Self {
        Self::NoValidMedia(msg.into())
    }

    /// Build a [`StoryreelError::UnreadableMedia`] value.
    pub fn unreadable(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::UnreadableMedia {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Build a [`StoryreelError::MissingAsset`] value.
    pub fn missing_asset(msg: impl Into<String>) -> Self {
        Self::MissingAsset(msg.into())
    }

    /// Build a [`StoryreelError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`StoryreelError::Evaluation`] value.
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }

    /// Build a [`StoryreelError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Return `true` for failures that only invalidate one item (a clip, a word) rather than the
    /// whole run.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::UnreadableMedia { .. } | Self::MissingAsset(_) | Self::Render(_)
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
