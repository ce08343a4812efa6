//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Navigation error: {0}")]
    Navigation(#[from] hyperspace_navigation::NavigationError),

    #[error("Proxy error: {0}")]
    Proxy(#[from] hyperspace_proxy::ProxyError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
