//! Error types for the directory and its storage backends.
//!
//! [`StorageError`] covers reading, decoding and writing the backing file.
//! [`DirectoryError`] is what every [`Directory`](crate::directory::Directory)
//! operation returns; its `Display` text is what the CLI prints and what the
//! HTTP server sends back in a `400` body. Messages embed the message of the
//! error they wrap.

use std::path::PathBuf;

use thiserror::Error;

/// Failure while loading or persisting contacts.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The backing file could not be read or written.
    #[error("failed to access {}: {err}", path.display())]
    Io { path: PathBuf, err: std::io::Error },

    /// The backing file exists and is non-empty but is not a valid contact list.
    #[error("failed to decode contacts from {}: {err}", path.display())]
    Decode {
        path: PathBuf,
        err: serde_json::Error,
    },

    #[error("failed to encode contacts: {0}")]
    Encode(serde_json::Error),

    /// Reported by test backends that simulate a failing disk.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            err,
        }
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, StorageError::Decode { .. })
    }
}

/// Failure of a directory operation.
#[derive(Error, Debug)]
pub enum DirectoryError {
    /// A required field was empty after trimming.
    #[error("{0}")]
    Validation(String),

    #[error("contact with name '{0}' already exists")]
    DuplicateName(String),

    #[error("contact with name '{0}' not found")]
    NotFound(String),

    /// The initial load failed; no directory was constructed.
    #[error("failed to load contacts: {0}")]
    Load(StorageError),

    /// Persisting after a mutation failed. The mutation has been undone.
    #[error("failed to save contacts: {0}")]
    Storage(StorageError),
}

impl DirectoryError {
    pub fn validation(msg: impl Into<String>) -> Self {
        DirectoryError::Validation(msg.into())
    }

    /// True for errors caused by the caller's input rather than by storage.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            DirectoryError::Validation(_)
                | DirectoryError::DuplicateName(_)
                | DirectoryError::NotFound(_)
        )
    }
}
