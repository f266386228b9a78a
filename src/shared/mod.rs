//! Shared Module
//!
//! Types shared by every part of the client: the directory record model,
//! the wire DTOs of the directory service, the error taxonomy, application
//! configuration and edit-form validation. Nothing in here performs I/O
//! except `AppConfig::load`.

/// Directory record model and wire DTOs
pub mod user;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Edit-form validation rules
pub mod validation;

/// Re-export commonly used types for convenience
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
pub use error::{ApiError, StorageError, ValidationError};
pub use user::{User, UserId, UserPage, UserPatch, UserUpdate};
pub use validation::EditUserForm;
