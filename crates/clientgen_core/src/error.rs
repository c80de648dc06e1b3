//! Error types shared across the core.

use std::io;

use thiserror::Error;

/// Failures talking to the engine's REST API.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The request never produced a response (connect, DNS, reset).
    #[error("transport failure on {endpoint}: {message}")]
    Transport { endpoint: String, message: String },

    /// The server answered with a non-success status code.
    #[error("server returned {status} for {endpoint}: {body}")]
    Server {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// The response body could not be decoded.
    #[error("failed to decode response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

impl BackendError {
    /// Endpoint path the failed request was addressed to.
    pub fn endpoint(&self) -> &str {
        match self {
            BackendError::Transport { endpoint, .. }
            | BackendError::Server { endpoint, .. }
            | BackendError::Decode { endpoint, .. } => endpoint,
        }
    }

    pub(crate) fn transport(endpoint: &str, err: impl std::fmt::Display) -> Self {
        BackendError::Transport {
            endpoint: endpoint.to_string(),
            message: err.to_string(),
        }
    }
}

/// Failures importing or exporting a config document.
#[derive(Error, Debug)]
pub enum TransferError {
    #[error("Failed to read import file: {0}")]
    Read(#[source] io::Error),

    #[error("Import file is not a flat config mapping: {0}")]
    Parse(#[source] serde_json::Error),

    #[error("Failed to encode config: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Failed to write export file: {0}")]
    Write(#[source] io::Error),
}

/// Result type for import/export operations.
pub type TransferResult<T> = Result<T, TransferError>;
