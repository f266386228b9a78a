//! Shared Error Types
//!
//! This module defines the error taxonomy used by the client core.
//! Every failure is surfaced to the caller exactly once; nothing in here
//! retries or swallows.
//!
//! # Error Categories
//!
//! - `ApiError` - failures talking to the directory service
//! - `StorageError` - failures reading or writing the persisted session
//! - `ValidationError` - edit-form field failures
//!
//! # Usage
//!
//! ```rust
//! use userdesk::shared::error::ApiError;
//!
//! let error = ApiError::not_found(7);
//! assert!(!error.is_auth_rejection());
//! ```
use thiserror::Error;

use crate::shared::user::UserId;

/// Failures returned by the directory service client
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Credentials were rejected by the login endpoint
    #[error("Authentication failed: {message}")]
    Auth {
        /// Message reported by the service, or the status line
        message: String,
    },

    /// The addressed record does not exist on the service
    #[error("User {id} not found")]
    NotFound {
        /// Identifier that was requested
        id: UserId,
    },

    /// Network failure, unexpected status, or malformed response
    #[error("Transport error: {message}")]
    Transport {
        /// HTTP status when the service answered at all
        status: Option<u16>,
        /// Human-readable error message
        message: String,
    },
}

impl ApiError {
    /// Create a new authentication error
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
        }
    }

    /// Create a new not-found error
    pub fn not_found(id: UserId) -> Self {
        Self::NotFound { id }
    }

    /// Create a transport error for a request that never got a response
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            status: None,
            message: message.into(),
        }
    }

    /// Create a transport error for an unexpected HTTP status
    pub fn status(status: u16, message: impl Into<String>) -> Self {
        Self::Transport {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Whether the service refused the presented session token.
    ///
    /// A persisted token is trusted on restore without validation, so the
    /// first 401/403 is the signal that it went stale.
    pub fn is_auth_rejection(&self) -> bool {
        matches!(
            self,
            Self::Transport {
                status: Some(401 | 403),
                ..
            }
        )
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        let status = err.status().map(|s| s.as_u16());
        let message = if err.is_decode() {
            format!("Malformed response: {}", err)
        } else {
            format!("Network error: {}", err)
        };
        Self::Transport { status, message }
    }
}

/// Failures of the persisted session storage
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem failure
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored document could not be encoded or decoded
    #[error("Storage serialization error: {message}")]
    Serialization {
        /// Human-readable error message
        message: String,
    },
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            message: format!("JSON error: {}", err),
        }
    }
}

/// A single failed edit-form field
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Validation error in field '{field}': {message}")]
pub struct ValidationError {
    /// The field that failed validation
    pub field: &'static str,
    /// Human-readable error message
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}
