//! Rejection reasons for producer requests.

use thiserror::Error;

/// Why a producer request was rejected.
///
/// The display text is sent verbatim as the failed response's `message`.
/// Every variant is recovered locally: the store is left untouched.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RequestError {
    /// The top-level payload was not a JSON object.
    #[error("Malformed request: {message}")]
    DecodeFailure {
        /// Parser diagnostic.
        message: String,
    },
    /// The nested `json` field did not hold a JSON object.
    #[error("Malformed JSON: {message}")]
    MalformedJson {
        /// Parser diagnostic.
        message: String,
    },
    /// No usable `name` string.
    #[error("Block does not have a name.")]
    MissingName,
    /// `sort_order` was present but not an integer.
    #[error("sort_order must be an integer.")]
    InvalidSortOrder,
    /// `remove` was present but not a boolean.
    #[error("remove must be a boolean.")]
    InvalidRemoveFlag,
}

impl RequestError {
    /// Creates a decode failure error.
    pub fn decode_failure(message: impl Into<String>) -> Self {
        Self::DecodeFailure {
            message: message.into(),
        }
    }

    /// Creates a malformed nested JSON error.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::MalformedJson {
            message: message.into(),
        }
    }
}
