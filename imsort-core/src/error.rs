use std::{io, path::PathBuf};

use thiserror::Error;

pub type Result<T, E = SessionError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("folder name must not be empty")]
    EmptyFolderName,

    #[error("invalid folder name '{0}'")]
    InvalidFolderName(String),

    #[error("folder '{0}' already exists")]
    AlreadyExists(String),

    #[error("no images left to classify")]
    NoImages,

    #[error("no folder at position {index} ({count} folders available)")]
    InvalidFolder { index: usize, count: usize },

    /// The destination of a move is occupied and no resolution was supplied.
    #[error("'{}' already exists", .path.display())]
    DestinationExists { path: PathBuf },

    #[error("{action} '{}' failed: {source}", .path.display())]
    FileSystem {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("nothing to undo")]
    NothingToUndo,
}

impl SessionError {
    pub(crate) fn fs(action: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        SessionError::FileSystem {
            action,
            path: path.into(),
            source,
        }
    }

    /// Whether this is one of the folder name validation failures.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            SessionError::EmptyFolderName | SessionError::InvalidFolderName(_)
        )
    }
}
