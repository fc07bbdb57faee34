//! Error types for minlsh.

use thiserror::Error;

/// Errors that can occur while building signatures or using the index.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LshError {
    /// Signature length differs from the length the index was built for.
    #[error("shape mismatch: expected signature of length {expected}, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    /// Construction parameters are unusable (zero hashes, threshold out of
    /// range, no feasible banding).
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// `remove` was called for an id the index has never seen, under
    /// [`RemovePolicy::Strict`](crate::config::RemovePolicy::Strict).
    #[error("unknown id")]
    UnknownId,
}

impl LshError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Check a signature length against the configured one.
    pub(crate) fn check_shape(expected: usize, actual: usize) -> Result<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(Self::ShapeMismatch { expected, actual })
        }
    }
}

pub type Result<T> = std::result::Result<T, LshError>;
