use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("data load error: {0}")]
    DataLoad(#[from] DataLoadError),

    #[error("index {index} is out of range for a catalog of {len} characters")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("no match available: the catalog holds {len} character(s)")]
    NoMatchAvailable { len: usize },

    #[error("unknown character: {name}")]
    UnknownCharacter { name: String },
}

/// Reasons the catalog or its embedding matrix could not be loaded.
///
/// Every variant is fatal to the load: there is no partial-load or repair
/// policy.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("resource not found: {}", path.display())]
    Missing { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed resource {}: {message}", path.display())]
    Malformed { path: PathBuf, message: String },

    #[error("resource {} holds no rows", path.display())]
    Empty { path: PathBuf },

    #[error("row count mismatch: {names} names but {vectors} vectors")]
    RowCountMismatch { names: usize, vectors: usize },

    #[error("empty character name at row {row}")]
    EmptyName { row: usize },

    #[error("duplicate character name {name:?} at rows {first} and {second}")]
    DuplicateName {
        name: String,
        first: usize,
        second: usize,
    },

    #[error("vector at row {row} has {found} dimensions, expected {expected}")]
    InconsistentDimension {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("embedding dimension must be greater than zero")]
    ZeroDimension,

    #[error("non-finite value at row {row}, column {column}")]
    NonFinite { row: usize, column: usize },
}

impl DataLoadError {
    /// Map an I/O error on `path` to `Missing` or `Io`.
    pub(crate) fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::Missing { path }
        } else {
            Self::Io { path, source }
        }
    }

    pub(crate) fn malformed(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Malformed {
            path: path.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
