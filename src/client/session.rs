//! Session Store
//!
//! Owns the authentication state of the client and the persisted token
//! behind it.
//!
//! ```text
//! unauthenticated --login()--> authenticating --ok--> authenticated
//!                                    |                     |
//!                                    +--err--> unauthenticated <--logout()
//! ```
//!
//! A persisted token is trusted on [`SessionStore::restore`] without asking
//! the service. Callers that see an API error carrying an authentication
//! rejection should hand it to [`SessionStore::invalidate_on_rejection`].

use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;

use crate::client::api::DirectoryApi;
use crate::client::storage::TokenStore;
use crate::shared::error::{ApiError, StorageError};

/// Where the session is in its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Unauthenticated,
    Authenticating,
    Authenticated,
}

/// Route guard decision for screens that need a signed-in user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    /// The persisted session has not been read yet
    Pending,
    /// Send the user to the login screen
    Denied,
    Granted,
}

/// Point-in-time copy of the session state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub status: SessionStatus,
    pub authenticated: bool,
    pub loading: bool,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("A login is already in progress")]
    LoginInProgress,
    #[error("Already logged in; log out first")]
    AlreadyAuthenticated,
}

#[derive(Debug)]
struct SessionState {
    status: SessionStatus,
    loading: bool,
    token: Option<String>,
}

/// Authentication state shared by everything that talks to the service
pub struct SessionStore<A: DirectoryApi> {
    api: Arc<A>,
    storage: Arc<dyn TokenStore>,
    state: RwLock<SessionState>,
}

impl<A: DirectoryApi> SessionStore<A> {
    /// Create a store that has not read persisted state yet (`loading`).
    pub fn new(api: Arc<A>, storage: Arc<dyn TokenStore>) -> Self {
        Self {
            api,
            storage,
            state: RwLock::new(SessionState {
                status: SessionStatus::Unauthenticated,
                loading: true,
                token: None,
            }),
        }
    }

    /// Create a store and immediately restore the persisted session.
    pub fn open(api: Arc<A>, storage: Arc<dyn TokenStore>) -> Result<Self, SessionError> {
        let store = Self::new(api, storage);
        store.restore()?;
        Ok(store)
    }

    /// Read the persisted token. Presence alone means authenticated.
    pub fn restore(&self) -> Result<SessionStatus, SessionError> {
        let loaded = self.storage.load();

        let mut state = self.state.write();
        state.loading = false;
        match loaded {
            Ok(Some(token)) => {
                state.token = Some(token);
                state.status = SessionStatus::Authenticated;
                tracing::info!("restored persisted session");
                Ok(state.status)
            }
            Ok(None) => {
                state.token = None;
                state.status = SessionStatus::Unauthenticated;
                Ok(state.status)
            }
            Err(e) => {
                state.token = None;
                state.status = SessionStatus::Unauthenticated;
                tracing::warn!(error = %e, "could not read persisted session");
                Err(e.into())
            }
        }
    }

    /// Exchange credentials for a token and persist it.
    ///
    /// On any failure the session ends up unauthenticated with nothing
    /// persisted, and the error is returned.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), SessionError> {
        {
            let mut state = self.state.write();
            match state.status {
                SessionStatus::Authenticating => return Err(SessionError::LoginInProgress),
                SessionStatus::Authenticated => return Err(SessionError::AlreadyAuthenticated),
                SessionStatus::Unauthenticated => {}
            }
            state.status = SessionStatus::Authenticating;
            state.loading = true;
        }

        let result = match self.api.login(email, password).await {
            Ok(token) => self.storage.save(&token).map(|()| token).map_err(SessionError::from),
            Err(e) => Err(e.into()),
        };

        let mut state = self.state.write();
        state.loading = false;
        match result {
            Ok(token) => {
                state.token = Some(token);
                state.status = SessionStatus::Authenticated;
                tracing::info!(email, "login successful");
                Ok(())
            }
            Err(e) => {
                state.token = None;
                state.status = SessionStatus::Unauthenticated;
                tracing::warn!(email, error = %e, "login failed");
                Err(e)
            }
        }
    }

    /// Erase the persisted token and forget the session.
    ///
    /// When erasing fails the session is left as it was, so memory and
    /// storage never disagree about the token.
    pub fn logout(&self) -> Result<(), SessionError> {
        self.storage.clear()?;
        {
            let mut state = self.state.write();
            state.token = None;
            state.status = SessionStatus::Unauthenticated;
            state.loading = false;
        }
        tracing::info!("logged out");
        Ok(())
    }

    /// Log out if `error` shows the service refused our token.
    ///
    /// Returns whether a logout happened.
    pub fn invalidate_on_rejection(&self, error: &ApiError) -> Result<bool, SessionError> {
        if !error.is_auth_rejection() || !self.is_authenticated() {
            return Ok(false);
        }
        tracing::warn!(error = %error, "service rejected the session token");
        self.logout()?;
        Ok(true)
    }

    pub fn status(&self) -> SessionStatus {
        self.state.read().status
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read().status == SessionStatus::Authenticated
    }

    pub fn is_loading(&self) -> bool {
        self.state.read().loading
    }

    pub fn token(&self) -> Option<String> {
        self.state.read().token.clone()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.read();
        SessionSnapshot {
            status: state.status,
            authenticated: state.status == SessionStatus::Authenticated,
            loading: state.loading,
        }
    }

    /// Route guard for protected screens
    pub fn access(&self) -> RouteAccess {
        let state = self.state.read();
        if state.loading {
            return RouteAccess::Pending;
        }
        match state.status {
            SessionStatus::Authenticated => RouteAccess::Granted,
            _ => RouteAccess::Denied,
        }
    }
}
