//! Error types for the voxtree crate.

use std::fmt;

use voxtree_decode::DecodeError;

/// Result type for voxtree operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading and materializing a document.
#[derive(Debug)]
pub enum Error {
    /// Reading the file failed.
    Io {
        /// The path that failed.
        path: String,
        /// The error message.
        message: String,
    },
    /// Document decoding failed.
    Decode(DecodeError),
    /// The decoded document cannot be materialized as requested.
    InvalidData {
        /// Context for where the error occurred.
        context: &'static str,
        /// Description of what was invalid.
        detail: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io { path, message } => {
                write!(f, "reading {path} failed: {message}")
            }
            Error::Decode(e) => write!(f, "decode error: {e}"),
            Error::InvalidData { context, detail } => {
                write!(f, "invalid {context}: {detail}")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Decode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DecodeError> for Error {
    fn from(e: DecodeError) -> Self {
        Error::Decode(e)
    }
}
