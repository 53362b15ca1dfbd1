//! Image resolution error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors a single resolver can hit.
///
/// None of these are fatal: the resolver chain records them and moves on to
/// the next source.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
    /// The source could not be contacted (connection, DNS, timeout, or body
    /// transfer failure).
    #[error("{source_name} unreachable: {message}")]
    Unreachable {
        source_name: String,
        message: String,
    },

    /// The source answered with a non-success HTTP status.
    #[error("{source_name} returned HTTP {status}")]
    Rejected { source_name: String, status: u16 },

    /// The source answered, but not with the expected character directory.
    #[error("unexpected response shape from {source_name}: {message}")]
    UnexpectedShape {
        source_name: String,
        message: String,
    },

    /// A local image path could not be inspected.
    #[error("cannot inspect {}: {message}", path.display())]
    Io { path: PathBuf, message: String },
}

impl ImageError {
    /// Returns `true` when the error is transient and the operation may
    /// succeed if retried.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Unreachable { .. } => true,
            Self::Rejected { status, .. } => *status == 429 || *status >= 500,
            Self::UnexpectedShape { .. } | Self::Io { .. } => false,
        }
    }
}

/// Convenience alias for image resolution results.
pub type ImageResult<T> = std::result::Result<T, ImageError>;
