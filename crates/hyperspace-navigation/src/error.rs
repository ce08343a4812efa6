//! Navigation error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("No target coordinates provided")]
    EmptyTarget,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}
