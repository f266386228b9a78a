//! Directory Controller
//!
//! Keeps one page of the remote directory in memory and the displayed,
//! filtered view over it consistent with the last known server state.
//!
//! - Fetches replace the page wholesale. Each fetch takes a sequence number
//!   and only the most recently issued one may touch state; an older
//!   response arriving late is discarded rather than overwriting a newer
//!   page.
//! - Edits and deletes patch the local page after the service confirms,
//!   without re-fetching.
//! - The search query is applied locally and never reaches the service.
//!
//! State sits behind a short-lived lock that is never held across an
//! await, so every operation takes `&self` and may be issued concurrently.

mod filter;
mod state;

use std::sync::Arc;

use parking_lot::RwLock;

use crate::client::api::DirectoryApi;
use crate::shared::error::ApiError;
use crate::shared::user::{User, UserId, UserPatch};

pub use filter::filter_records;
pub use state::DirectoryView;

use state::PageState;

/// What happened to a fetch request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The page was fetched and is now displayed
    Applied,
    /// A newer fetch was issued meanwhile; this result was dropped
    Superseded,
    /// Navigation was not possible (bounds or a fetch in flight)
    Skipped,
}

pub struct DirectoryController<A: DirectoryApi> {
    api: Arc<A>,
    state: RwLock<PageState>,
}

impl<A: DirectoryApi> DirectoryController<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            state: RwLock::new(PageState::default()),
        }
    }

    /// Fetch page `page` (1-indexed) and display it.
    ///
    /// A failure leaves the previously displayed page untouched and is
    /// returned to the caller. Results of superseded requests, successful
    /// or not, are dropped.
    pub async fn fetch_page(&self, page: u32) -> Result<FetchOutcome, ApiError> {
        let page = page.max(1);
        let request = self.state.write().begin_fetch(page);
        tracing::debug!(page, request, "fetching directory page");

        let result = self.api.list_users(page).await;

        let mut state = self.state.write();
        if !state.is_latest(request) {
            match &result {
                Ok(_) => tracing::debug!(page, request, "discarding superseded page"),
                Err(e) => tracing::debug!(page, request, error = %e, "discarding superseded failure"),
            }
            return Ok(FetchOutcome::Superseded);
        }

        state.settle();
        match result {
            Ok(contents) => {
                tracing::debug!(page, records = contents.records.len(), total_pages = contents.total_pages, "page applied");
                state.apply_page(page, contents);
                Ok(FetchOutcome::Applied)
            }
            Err(e) => {
                tracing::warn!(page, error = %e, "could not fetch users");
                Err(e)
            }
        }
    }

    /// Re-fetch the page currently displayed
    pub async fn refresh(&self) -> Result<FetchOutcome, ApiError> {
        let page = self.state.read().current_page;
        self.fetch_page(page).await
    }

    /// Go back one page; no-op on page 1 or while a fetch is in flight.
    pub async fn previous_page(&self) -> Result<FetchOutcome, ApiError> {
        let target = {
            let state = self.state.read();
            if !state.has_previous() || state.is_fetching() {
                return Ok(FetchOutcome::Skipped);
            }
            state.current_page - 1
        };
        self.fetch_page(target).await
    }

    /// Go forward one page; no-op on the last known page or while a fetch
    /// is in flight.
    pub async fn next_page(&self) -> Result<FetchOutcome, ApiError> {
        let target = {
            let state = self.state.read();
            if !state.has_next() || state.is_fetching() {
                return Ok(FetchOutcome::Skipped);
            }
            state.current_page + 1
        };
        self.fetch_page(target).await
    }

    /// Replace the search query. Purely local.
    pub fn set_query(&self, query: impl Into<String>) {
        self.state.write().query = query.into();
    }

    /// Update a record on the service, then patch it in place locally.
    ///
    /// Returns the patched local record, or `None` when the record is no
    /// longer on the displayed page (the service update still happened).
    pub async fn edit_record(&self, id: UserId, patch: UserPatch) -> Result<Option<User>, ApiError> {
        if let Err(e) = self.api.update_user(id, &patch).await {
            tracing::warn!(id, error = %e, "failed to update user");
            return Err(e);
        }

        let updated = self.state.write().patch_record(id, &patch);
        tracing::info!(id, "user updated");
        Ok(updated)
    }

    /// Delete a record on the service, then drop it from the local page.
    pub async fn delete_record(&self, id: UserId) -> Result<Option<User>, ApiError> {
        if let Err(e) = self.api.delete_user(id).await {
            tracing::warn!(id, error = %e, "failed to delete user");
            return Err(e);
        }

        let removed = self.state.write().remove_record(id);
        if let Some(user) = &removed {
            tracing::info!(id, name = %user.full_name(), "user deleted");
        }
        Ok(removed)
    }

    /// Snapshot for rendering
    pub fn view(&self) -> DirectoryView {
        self.state.read().view()
    }

    /// Unfiltered records of the last applied page
    pub fn records(&self) -> Vec<User> {
        self.state.read().records.clone()
    }

    /// Look up a record on the displayed page, e.g. to prefill the edit form
    pub fn record(&self, id: UserId) -> Option<User> {
        self.state.read().records.iter().find(|user| user.id == id).cloned()
    }

    pub fn current_page(&self) -> u32 {
        self.state.read().current_page
    }

    pub fn total_pages(&self) -> u32 {
        self.state.read().total_pages
    }

    pub fn query(&self) -> String {
        self.state.read().query.clone()
    }
}
