//! Failures that stop a request before it reaches the block store.

use std::io;

use thiserror::Error;

/// Errors surfaced while reading a request or reaching the shared store.
///
/// Validation failures are not listed here; they travel as
/// [`stag_blocks::RequestError`] inside an ordinary failed response.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Request exceeds the maximum allowed size.
    #[error("Request too large: {size} bytes exceeds {max_size} byte limit")]
    RequestTooLarge {
        /// Bytes received so far.
        size: usize,
        /// Configured limit.
        max_size: usize,
    },

    /// The producer stopped sending before completing a request.
    #[error("Timed out waiting for request.")]
    ReadTimeout,

    /// IO error during read or write.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Internal error (e.g., lock poisoned).
    #[error("internal error: {message}")]
    Internal {
        /// What went wrong.
        message: String,
    },
}

impl DispatchError {
    /// Creates a request too large error.
    #[must_use]
    pub const fn request_too_large(size: usize, max_size: usize) -> Self {
        Self::RequestTooLarge { size, max_size }
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Maps a read failure, folding socket timeouts into [`Self::ReadTimeout`].
    #[must_use]
    pub fn from_read(error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => Self::ReadTimeout,
            _ => Self::Io(error),
        }
    }
}
