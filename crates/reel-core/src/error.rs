//! Unified error type for reelstream.
//!
//! All crates funnel their failures into [`Error`], which carries enough context
//! for API handlers to derive an HTTP status code via [`Error::http_status`].
//! There is no error for a malformed `Range` header: those degrade to the
//! full file instead.

use std::fmt;
use std::path::PathBuf;

/// The kind of entity a lookup failed to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Video,
    User,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Video => f.write_str("Video"),
            Resource::User => f.write_str("User"),
        }
    }
}

/// Unified error type covering all failure modes in reelstream.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A video or user could not be resolved.
    #[error("{0} Not Found")]
    NotFound(Resource),

    /// The backing file exists but could not be opened or inspected.
    #[error("Unable to open '{}': {source}", .path.display())]
    Open {
        /// Path that failed to open.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The resolved path points at a directory.
    #[error("'{}' is a directory, not a file", .0.display())]
    NotAFile(PathBuf),

    /// Request or configuration data failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// A database operation failed.
    #[error("Database error: {source}")]
    Database {
        /// The underlying database error.
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Catch-all for unexpected internal errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Map this error to an appropriate HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::NotFound(_) => 404,
            Error::Validation(_) => 400,
            Error::Open { .. } => 500,
            Error::NotAFile(_) => 500,
            Error::Database { .. } => 500,
            Error::Io { .. } => 500,
            Error::Internal(_) => 500,
        }
    }

    /// Shorthand for `Error::NotFound(Resource::Video)`.
    pub fn video_not_found() -> Self {
        Error::NotFound(Resource::Video)
    }

    /// Shorthand for `Error::NotFound(Resource::User)`.
    pub fn user_not_found() -> Self {
        Error::NotFound(Resource::User)
    }

    /// Convenience constructor for [`Error::Open`].
    pub fn open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Open {
            path: path.into(),
            source,
        }
    }

    /// Convenience constructor for [`Error::Database`].
    pub fn database(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Error::Database {
            source: source.into(),
        }
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
