//! Errors raised by the content layer

use thiserror::Error;

/// Failures surfaced by the post and project repositories.
///
/// Repositories hand these back to their caller untouched: nothing is logged,
/// retried or swallowed below the rendering layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContentError {
    /// The content store could not be read, a record in it is malformed,
    /// or the read did not finish in time.
    #[error("Content source {source_name} is unavailable: {reason}")]
    SourceUnavailable { source_name: String, reason: String },

    /// A listing limit that is not a positive integer.
    #[error("Invalid limit {value:?}: expected a positive integer")]
    InvalidLimit { value: String },
}

impl ContentError {
    pub fn unavailable(source_name: impl Into<String>, reason: impl ToString) -> Self {
        Self::SourceUnavailable {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid_limit(value: impl ToString) -> Self {
        Self::InvalidLimit {
            value: value.to_string(),
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::SourceUnavailable { .. })
    }
}
