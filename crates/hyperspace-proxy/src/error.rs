//! Proxy error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProxyError {
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Invalid proxy descriptor {name}: {reason}")]
    InvalidDescriptor { name: String, reason: String },
}

/// Why a single descriptor attempt failed. Never leaves the engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AttemptError {
    #[error("timed out after {0} ms")]
    Timeout(u64),

    #[error("HTTP {0}")]
    Http(u16),

    #[error("network error: {0}")]
    Network(String),

    #[error("framing refused: {0}")]
    FrameRefused(String),

    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

impl From<reqwest::Error> for AttemptError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            AttemptError::Http(status.as_u16())
        } else {
            AttemptError::Network(e.to_string())
        }
    }
}
