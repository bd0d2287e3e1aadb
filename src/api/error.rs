//! API Error Types
//!
//! Errors from the HTTP serving layer. Signaling handlers themselves
//! never answer with errors; the only failures here are startup and
//! listener ones, surfaced at the binary boundary.

use thiserror::Error;

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;
