use crate::client::directory::filter::filter_records;
use crate::shared::user::{User, UserId, UserPage, UserPatch};

/// Mutable page state owned by the controller
#[derive(Debug, Clone)]
pub(crate) struct PageState {
    pub current_page: u32,
    pub total_pages: u32,
    /// Records of the last applied page, unfiltered
    pub records: Vec<User>,
    pub query: String,
    pub loading: bool,
    pub pagination_loading: bool,
    /// Sequence number of the most recently issued fetch
    pub latest_request: u64,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            records: Vec::new(),
            query: String::new(),
            // nothing to show until the first fetch settles
            loading: true,
            pagination_loading: false,
            latest_request: 0,
        }
    }
}

impl PageState {
    pub fn is_fetching(&self) -> bool {
        self.loading || self.pagination_loading
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Issue a new fetch sequence number and raise the matching flag.
    pub fn begin_fetch(&mut self, page: u32) -> u64 {
        self.latest_request += 1;
        if page == self.current_page {
            self.loading = true;
        } else {
            self.pagination_loading = true;
        }
        self.latest_request
    }

    pub fn is_latest(&self, request: u64) -> bool {
        request == self.latest_request
    }

    pub fn settle(&mut self) {
        self.loading = false;
        self.pagination_loading = false;
    }

    pub fn apply_page(&mut self, page: u32, contents: UserPage) {
        self.records = contents.records;
        self.total_pages = contents.total_pages.max(1);
        self.current_page = page;
    }

    pub fn patch_record(&mut self, id: UserId, patch: &UserPatch) -> Option<User> {
        let record = self.records.iter_mut().find(|user| user.id == id)?;
        record.apply(patch);
        Some(record.clone())
    }

    pub fn remove_record(&mut self, id: UserId) -> Option<User> {
        let index = self.records.iter().position(|user| user.id == id)?;
        Some(self.records.remove(index))
    }

    pub fn view(&self) -> DirectoryView {
        DirectoryView {
            records: filter_records(&self.records, &self.query),
            total_pages: self.total_pages,
            current_page: self.current_page,
            loading: self.loading,
            pagination_loading: self.pagination_loading,
            query: self.query.clone(),
            has_previous: self.has_previous(),
            has_next: self.has_next(),
        }
    }
}

/// What the presentation layer renders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryView {
    /// Displayed sequence: the current page after the search filter
    pub records: Vec<User>,
    pub total_pages: u32,
    pub current_page: u32,
    /// Full-skeleton loading (first load or refresh of the shown page)
    pub loading: bool,
    /// Overlay loading while moving to another page
    pub pagination_loading: bool,
    pub query: String,
    pub has_previous: bool,
    pub has_next: bool,
}
