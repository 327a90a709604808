//! Unified error handling for application bootstrap.
//!
//! Store operations never surface errors to callers (failures become user
//! notifications, see [`crate::notify`]); `AppError` exists for the paths
//! that run before any store does - configuration, storage setup, and
//! gateway construction.

use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::storage::StorageError;

/// Application-level error type for the client.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration loading failed.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Durable storage could not be prepared.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The HTTP gateway could not be constructed.
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
