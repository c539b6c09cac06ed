use std::{io, path::PathBuf, result::Result as StdResult};
use thiserror::Error;

/// Custom Result type for scopedir operations.
pub type Result<T> = StdResult<T, ScopeDirError>;

/// Scopedir-specific error types
#[derive(Error, Debug)]
pub enum ScopeDirError {
    /// The temporary directory could not be created.
    #[error("Failed to create temporary directory: {source}")]
    Creation {
        /// The underlying filesystem error.
        #[source]
        source: io::Error,
    },

    /// A strict recursive removal hit an entry it could not delete.
    #[error("Failed to delete {path}: {source}")]
    Deletion {
        /// The entry that could not be removed.
        path: PathBuf,
        /// The underlying filesystem error.
        #[source]
        source: io::Error,
    },

    /// A connection string did not match the expected shape.
    #[error("Invalid connection string: {input}")]
    Format {
        /// The string that failed to parse.
        input: String,
    },
}
