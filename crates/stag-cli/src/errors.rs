//! Error types for the CLI runtime.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum AppError {
    #[error("failed to resolve server address {endpoint}: {source}")]
    Resolve { endpoint: String, source: io::Error },
    #[error("Could not connect to stag server at {endpoint}: {source}")]
    Connect { endpoint: String, source: io::Error },
    #[error("failed to serialise request: {0}")]
    SerialiseRequest(serde_json::Error),
    #[error("failed to send request to server: {0}")]
    SendRequest(io::Error),
    #[error("failed to read response from server: {0}")]
    ReadResponse(io::Error),
    #[error("failed to parse server response: {0}")]
    ParseResponse(serde_json::Error),
    #[error("server closed the connection without responding")]
    MissingResponse,
    #[error("{0}")]
    Rejected(String),
    #[error("failed to write output: {0}")]
    WriteOutput(io::Error),
    #[error("server failed: {0}")]
    Server(#[from] stagd::LaunchError),
}
