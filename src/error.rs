//! Error types shared by every component of the gallery.

use crate::media::descriptor::ReadError;

/// Everything that can go wrong inside the gallery core.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Registration with an existing username, or with an empty username/secret.
    #[error("cannot register user '{0}': already exists or credentials are empty")]
    DuplicateUser(String),

    /// Login mismatch or unknown user.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// Import skipped a file that is not an allow-listed image.
    #[error("unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// Reading the bytes of an imported file failed.
    #[error(transparent)]
    Read(#[from] ReadError),

    /// The entry was restored from the manifest and has no bytes in memory.
    #[error("preview unavailable for '{0}', re-import the folder to view it")]
    PreviewUnavailable(String),

    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("document store lock poisoned")]
    LockPoisoned,
}

pub type Result<T> = std::result::Result<T, AppError>;
