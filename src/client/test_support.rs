//! Scripted in-process [`DirectoryApi`] for unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::oneshot;

use crate::client::api::DirectoryApi;
use crate::shared::error::ApiError;
use crate::shared::user::{User, UserId, UserPage, UserPatch, UserUpdate};

pub(crate) fn user(id: UserId, first: &str, last: &str) -> User {
    User {
        id,
        email: format!("{}.{}@reqres.in", first.to_lowercase(), last.to_lowercase()),
        first_name: first.to_string(),
        last_name: last.to_string(),
        avatar: format!("https://reqres.in/img/faces/{}-image.jpg", id),
    }
}

/// The two pages the public reqres service serves
pub(crate) fn page_one() -> UserPage {
    UserPage {
        records: vec![
            user(1, "George", "Bluth"),
            user(2, "Janet", "Weaver"),
            user(3, "Emma", "Wong"),
            user(4, "Eve", "Holt"),
            user(5, "Charles", "Morris"),
            user(6, "Tracey", "Ramos"),
        ],
        total_pages: 2,
    }
}

pub(crate) fn page_two() -> UserPage {
    UserPage {
        records: vec![
            user(7, "Michael", "Lawson"),
            user(8, "Lindsay", "Ferguson"),
            user(9, "Tobias", "Funke"),
            user(10, "Byron", "Fields"),
            user(11, "George", "Edwards"),
            user(12, "Rachel", "Howell"),
        ],
        total_pages: 2,
    }
}

enum LoginScript {
    Reject,
    Token(String),
    Error(ApiError),
    Gated(String, Option<oneshot::Receiver<()>>),
}

pub(crate) struct ScriptedApi {
    login: Mutex<LoginScript>,
    pages: Mutex<HashMap<u32, Result<UserPage, ApiError>>>,
    gates: Mutex<HashMap<u32, oneshot::Receiver<Result<UserPage, ApiError>>>>,
    update_error: Mutex<Option<ApiError>>,
    delete_error: Mutex<Option<ApiError>>,
    list_calls: AtomicUsize,
    pub(crate) updates: Mutex<Vec<(UserId, UserPatch)>>,
    pub(crate) deletes: Mutex<Vec<UserId>>,
}

impl ScriptedApi {
    pub(crate) fn new() -> Self {
        Self {
            login: Mutex::new(LoginScript::Reject),
            pages: Mutex::new(HashMap::new()),
            gates: Mutex::new(HashMap::new()),
            update_error: Mutex::new(None),
            delete_error: Mutex::new(None),
            list_calls: AtomicUsize::new(0),
            updates: Mutex::new(Vec::new()),
            deletes: Mutex::new(Vec::new()),
        }
    }

    /// Serve the two reqres pages
    pub(crate) fn reqres() -> Self {
        Self::new().with_page(1, page_one()).with_page(2, page_two())
    }

    pub(crate) fn with_login_token(self, token: &str) -> Self {
        *self.login.lock() = LoginScript::Token(token.to_string());
        self
    }

    pub(crate) fn with_login_error(self, error: ApiError) -> Self {
        *self.login.lock() = LoginScript::Error(error);
        self
    }

    /// Login resolves with `token` once the returned sender fires
    pub(crate) fn with_gated_login(self, token: &str) -> (Self, oneshot::Sender<()>) {
        let (tx, rx) = oneshot::channel();
        *self.login.lock() = LoginScript::Gated(token.to_string(), Some(rx));
        (self, tx)
    }

    pub(crate) fn with_page(self, page: u32, contents: UserPage) -> Self {
        self.pages.lock().insert(page, Ok(contents));
        self
    }

    pub(crate) fn fail_page(&self, page: u32, error: ApiError) {
        self.pages.lock().insert(page, Err(error));
    }

    /// The next fetch of `page` waits for the returned sender
    pub(crate) fn gate_page(&self, page: u32) -> oneshot::Sender<Result<UserPage, ApiError>> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().insert(page, rx);
        tx
    }

    pub(crate) fn fail_updates(&self, error: ApiError) {
        *self.update_error.lock() = Some(error);
    }

    pub(crate) fn fail_deletes(&self, error: ApiError) {
        *self.delete_error.lock() = Some(error);
    }

    pub(crate) fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DirectoryApi for ScriptedApi {
    async fn login(&self, _email: &str, _password: &str) -> Result<String, ApiError> {
        let gated = {
            let mut script = self.login.lock();
            match &mut *script {
                LoginScript::Reject => return Err(ApiError::auth("user not found")),
                LoginScript::Token(token) => return Ok(token.clone()),
                LoginScript::Error(error) => return Err(error.clone()),
                LoginScript::Gated(token, gate) => (token.clone(), gate.take()),
            }
        };

        let (token, gate) = gated;
        if let Some(gate) = gate {
            gate.await
                .map_err(|_| ApiError::transport("login gate dropped"))?;
        }
        Ok(token)
    }

    async fn list_users(&self, page: u32) -> Result<UserPage, ApiError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);

        let gate = self.gates.lock().remove(&page);
        if let Some(gate) = gate {
            return gate
                .await
                .unwrap_or_else(|_| Err(ApiError::transport("page gate dropped")));
        }

        self.pages
            .lock()
            .get(&page)
            .cloned()
            .unwrap_or_else(|| Err(ApiError::status(404, format!("no page {}", page))))
    }

    async fn get_user(&self, id: UserId) -> Result<User, ApiError> {
        self.pages
            .lock()
            .values()
            .filter_map(|page| page.as_ref().ok())
            .flat_map(|page| page.records.iter())
            .find(|user| user.id == id)
            .cloned()
            .ok_or(ApiError::not_found(id))
    }

    async fn update_user(&self, id: UserId, patch: &UserPatch) -> Result<UserUpdate, ApiError> {
        if let Some(error) = self.update_error.lock().clone() {
            return Err(error);
        }
        self.updates.lock().push((id, patch.clone()));
        Ok(UserUpdate {
            first_name: patch.first_name.clone(),
            last_name: patch.last_name.clone(),
            email: patch.email.clone(),
            updated_at: Some(chrono::Utc::now().to_rfc3339()),
        })
    }

    async fn delete_user(&self, id: UserId) -> Result<(), ApiError> {
        if let Some(error) = self.delete_error.lock().clone() {
            return Err(error);
        }
        self.deletes.lock().push(id);
        Ok(())
    }
}
