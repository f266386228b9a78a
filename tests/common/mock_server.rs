//! Mock directory service for integration tests
//!
//! Wraps a wiremock server mounted under `/api`, plus the client core wired
//! against it with in-memory token storage.

use std::sync::Arc;

use serde_json::json;
use userdesk::client::{Config, HttpDirectoryApi, MemoryTokenStore};
use userdesk::shared::AppConfig;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use super::fixtures::{page_body, page_one_users, page_two_users, SESSION_TOKEN, VALID_EMAIL, VALID_PASSWORD};

/// A running mock service and a client pointed at it
pub struct MockDirectory {
    pub server: MockServer,
    pub tokens: Arc<MemoryTokenStore>,
    pub api: Arc<HttpDirectoryApi>,
}

impl MockDirectory {
    /// Start with no token persisted
    pub async fn start() -> Self {
        Self::start_with(MemoryTokenStore::new()).await
    }

    pub async fn start_with(tokens: MemoryTokenStore) -> Self {
        let server = MockServer::start().await;
        let tokens = Arc::new(tokens);
        let api = Arc::new(client_for(&server.uri(), tokens.clone()));
        Self { server, tokens, api }
    }

    /// Accept `eve.holt@reqres.in` / `cityslicka`, reject everything else
    pub async fn mount_login(&self) {
        Mock::given(method("POST"))
            .and(path("/api/login"))
            .and(body_json(json!({ "email": VALID_EMAIL, "password": VALID_PASSWORD })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "token": SESSION_TOKEN })))
            .with_priority(1)
            .mount(&self.server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/login"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({ "error": "user not found" })))
            .with_priority(2)
            .mount(&self.server)
            .await;
    }

    /// Serve both reqres pages
    pub async fn mount_pages(&self) {
        self.mount_page(1, ResponseTemplate::new(200).set_body_json(page_body(1, 2, &page_one_users())))
            .await;
        self.mount_page(2, ResponseTemplate::new(200).set_body_json(page_body(2, 2, &page_two_users())))
            .await;
    }

    pub async fn mount_page(&self, page: u32, response: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path("/api/users"))
            .and(query_param("page", page.to_string()))
            .respond_with(response)
            .mount(&self.server)
            .await;
    }

    /// Requests received so far, oldest first
    pub async fn requests(&self) -> Vec<Request> {
        self.server.received_requests().await.unwrap_or_default()
    }
}

/// HTTP client against `base` (the mock's root URI) using `tokens`
pub fn client_for(base: &str, tokens: Arc<MemoryTokenStore>) -> HttpDirectoryApi {
    let config = Config::with_builder(AppConfig::builder().server_url(format!("{}/api", base)))
        .expect("mock URL is valid");
    HttpDirectoryApi::new(config, tokens).expect("client builds")
}

/// Value of the Authorization header of `request`, if any
pub fn authorization(request: &Request) -> Option<String> {
    request
        .headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}
