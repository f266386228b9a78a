//! userdesk - Main Library
//!
//! Client core for administering a paginated user directory exposed by a
//! reqres-style REST service.
//!
//! # Overview
//!
//! - Sign in against the service and keep the session token across restarts
//! - Page through directory records, filtering the current page locally
//! - Edit and delete individual records, patching the local page in place
//!
//! # Module Structure
//!
//! - **`shared`** - Types with no I/O of their own
//!   - User records and wire DTOs
//!   - Error taxonomy
//!   - Application configuration
//!   - Edit-form validation
//!
//! - **`client`** - The stateful core
//!   - `HttpDirectoryApi` over reqwest
//!   - `SessionStore` for authentication state
//!   - `DirectoryController` for page state
//!
//! The `userdesk` binary (`src/console`) is a headless front end over the
//! same core.
//!
//! # Thread Safety
//!
//! `SessionStore` and `DirectoryController` are `Send + Sync`; share them
//! with `Arc`. Their locks are never held across an await.
//!
//! # Error Handling
//!
//! - `ApiError` for everything the service or the network does wrong
//! - `SessionError` adds storage failures and login-state conflicts
//! - `ConfigError` for configuration problems
//!
//! Nothing in the core retries; every error reaches the caller once.

/// Shared types and data structures
pub mod shared;

/// Session, directory and API client core
pub mod client;
