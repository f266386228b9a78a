//! Directory record types
//!
//! `User` mirrors one record of the remote directory. The wire DTOs at the
//! bottom of this file match the service's JSON envelopes and never leave
//! the API client.

use serde::{Deserialize, Serialize};

/// Identifier of a directory record
pub type UserId = u64;

/// One record of the remote user directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Avatar image URL
    #[serde(default)]
    pub avatar: String,
}

impl User {
    /// "First Last", as shown on cards and matched by the search filter
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Overwrite the editable fields with `patch`
    pub fn apply(&mut self, patch: &UserPatch) {
        self.first_name = patch.first_name.clone();
        self.last_name = patch.last_name.clone();
        self.email = patch.email.clone();
    }
}

/// Editable fields sent with an update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPatch {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// One page of directory records
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UserPage {
    pub records: Vec<User>,
    pub total_pages: u32,
}

/// Confirmation echoed by the service after an update
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Body of `POST /login`
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Success body of `POST /login`
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
}

/// Failure body the service returns alongside 4xx statuses
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceErrorBody {
    pub error: String,
}

/// Body of `GET /users?page=N`
#[derive(Debug, Clone, Deserialize)]
pub struct ListUsersResponse {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
    #[serde(default)]
    pub total: Option<u32>,
    pub total_pages: u32,
    pub data: Vec<User>,
}

impl From<ListUsersResponse> for UserPage {
    fn from(value: ListUsersResponse) -> Self {
        Self {
            records: value.data,
            total_pages: value.total_pages,
        }
    }
}

/// Body of `GET /users/{id}`
#[derive(Debug, Clone, Deserialize)]
pub struct SingleUserResponse {
    pub data: User,
}
