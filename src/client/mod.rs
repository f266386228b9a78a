//! Client Core
//!
//! Everything between the presentation layer and the directory service.
//!
//! # Architecture
//!
//! - **`config`** - Resolved configuration (service URL, storage paths)
//! - **`storage`** - Persisted session token
//! - **`api`** - Directory service client (`DirectoryApi`, `HttpDirectoryApi`)
//! - **`session`** - Session Store: login, logout, route guard
//! - **`directory`** - Directory Controller: paging, search, edit, delete
//!
//! # Module Structure
//!
//! ```text
//! client/
//! ├── mod.rs          - Module exports and documentation
//! ├── config.rs       - Configuration management
//! ├── storage.rs      - Token storage backends
//! ├── api.rs          - HTTP client for the directory service
//! ├── session.rs      - Session Store
//! └── directory/      - Directory Controller, page state, search filter
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use userdesk::client::{Config, DirectoryController, FileTokenStore, HttpDirectoryApi, SessionStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::resolve(None)?;
//! let tokens = Arc::new(FileTokenStore::new(config.session_path()));
//! let api = Arc::new(HttpDirectoryApi::new(config, tokens.clone())?);
//!
//! let session = SessionStore::open(api.clone(), tokens)?;
//! session.login("eve.holt@reqres.in", "cityslicka").await?;
//!
//! let directory = DirectoryController::new(api);
//! directory.fetch_page(1).await?;
//! directory.set_query("janet");
//! println!("{:?}", directory.view().records);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod directory;
pub mod session;
pub mod storage;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export commonly used types
pub use api::{DirectoryApi, HttpDirectoryApi};
pub use config::Config;
pub use directory::{DirectoryController, DirectoryView, FetchOutcome};
pub use session::{RouteAccess, SessionError, SessionSnapshot, SessionStatus, SessionStore};
pub use storage::{FileTokenStore, MemoryTokenStore, TokenStore, TOKEN_KEY};
