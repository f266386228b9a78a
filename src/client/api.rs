//! Directory service API client
//!
//! [`DirectoryApi`] is the seam between the client core and the remote
//! service; [`HttpDirectoryApi`] is the reqwest implementation. Every
//! request reads the session token from the shared [`TokenStore`] at send
//! time and attaches it as a bearer credential when present.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::client::config::Config;
use crate::client::storage::TokenStore;
use crate::shared::error::ApiError;
use crate::shared::user::{
    ListUsersResponse, LoginRequest, LoginResponse, ServiceErrorBody, SingleUserResponse, User,
    UserId, UserPage, UserPatch, UserUpdate,
};

/// Operations offered by the directory service
#[async_trait]
pub trait DirectoryApi: Send + Sync {
    /// Exchange credentials for a session token
    async fn login(&self, email: &str, password: &str) -> Result<String, ApiError>;

    /// Fetch one 1-indexed page of records
    async fn list_users(&self, page: u32) -> Result<UserPage, ApiError>;

    /// Fetch a single record
    async fn get_user(&self, id: UserId) -> Result<User, ApiError>;

    /// Overwrite the editable fields of a record
    async fn update_user(&self, id: UserId, patch: &UserPatch) -> Result<UserUpdate, ApiError>;

    /// Remove a record
    async fn delete_user(&self, id: UserId) -> Result<(), ApiError>;
}

/// reqwest-backed directory client
pub struct HttpDirectoryApi {
    config: Config,
    client: Client,
    tokens: Arc<dyn TokenStore>,
}

impl HttpDirectoryApi {
    pub fn new(config: Config, tokens: Arc<dyn TokenStore>) -> Result<Self, ApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            config,
            client,
            tokens,
        })
    }

    /// Attach the persisted token, if any
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.tokens.load() {
            Ok(Some(token)) => request.bearer_auth(token),
            Ok(None) => request,
            Err(e) => {
                tracing::warn!(error = %e, "could not read session token; sending request anonymously");
                request
            }
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = self.authorize(request).send().await?;
        tracing::debug!(status = %response.status(), url = %response.url(), "directory response");
        Ok(response)
    }
}

/// Best-effort message from an error response body
async fn error_message(response: Response) -> String {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    match serde_json::from_str::<ServiceErrorBody>(&text) {
        Ok(body) => body.error,
        Err(_) if text.trim().is_empty() => status.to_string(),
        Err(_) => format!("{} - {}", status, text),
    }
}

async fn unexpected_status(response: Response) -> ApiError {
    let status = response.status().as_u16();
    ApiError::status(status, error_message(response).await)
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status().as_u16();
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes)
        .map_err(|e| ApiError::status(status, format!("Malformed response: {}", e)))
}

#[async_trait]
impl DirectoryApi for HttpDirectoryApi {
    async fn login(&self, email: &str, password: &str) -> Result<String, ApiError> {
        let url = self.config.api_url("/login");
        let response = self
            .send(self.client.post(&url).json(&LoginRequest { email, password }))
            .await?;

        match response.status() {
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(ApiError::auth(error_message(response).await))
            }
            status if status.is_success() => {
                let body: LoginResponse = decode(response).await?;
                body.token
                    .filter(|token| !token.is_empty())
                    .ok_or_else(|| ApiError::status(status.as_u16(), "Malformed response: login succeeded without a token"))
            }
            _ => Err(unexpected_status(response).await),
        }
    }

    async fn list_users(&self, page: u32) -> Result<UserPage, ApiError> {
        let url = self.config.api_url("/users");
        let response = self
            .send(self.client.get(&url).query(&[("page", page)]))
            .await?;

        if !response.status().is_success() {
            return Err(unexpected_status(response).await);
        }
        let body: ListUsersResponse = decode(response).await?;
        Ok(body.into())
    }

    async fn get_user(&self, id: UserId) -> Result<User, ApiError> {
        let url = self.config.api_url(&format!("/users/{}", id));
        let response = self.send(self.client.get(&url)).await?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(ApiError::not_found(id)),
            status if status.is_success() => {
                let body: SingleUserResponse = decode(response).await?;
                Ok(body.data)
            }
            _ => Err(unexpected_status(response).await),
        }
    }

    async fn update_user(&self, id: UserId, patch: &UserPatch) -> Result<UserUpdate, ApiError> {
        let url = self.config.api_url(&format!("/users/{}", id));
        let response = self.send(self.client.put(&url).json(patch)).await?;

        match response.status() {
            StatusCode::NOT_FOUND => Err(ApiError::not_found(id)),
            status if status.is_success() => decode(response).await,
            _ => Err(unexpected_status(response).await),
        }
    }

    async fn delete_user(&self, id: UserId) -> Result<(), ApiError> {
        let url = self.config.api_url(&format!("/users/{}", id));
        let response = self.send(self.client.delete(&url)).await?;

        if !response.status().is_success() {
            return Err(unexpected_status(response).await);
        }
        Ok(())
    }
}
