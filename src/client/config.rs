use std::path::PathBuf;
use std::time::Duration;

use crate::shared::config::{AppConfig, AppConfigBuilder, ConfigError};

/// Default directory service
pub const DEFAULT_SERVER_URL: &str = "https://reqres.in/api";

/// File under the storage directory that holds the persisted session
pub const SESSION_FILE: &str = "session.json";

/// Resolved client configuration.
///
/// Environment overrides: `USERDESK_API_URL`, `USERDESK_DATA_DIR`.
#[derive(Debug, Clone)]
pub struct Config {
    app: AppConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app: AppConfig {
                server_url: Some(DEFAULT_SERVER_URL.to_string()),
                ..AppConfig::default()
            },
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builder(builder: AppConfigBuilder) -> Result<Self, ConfigError> {
        Ok(Self { app: builder.build()? })
    }

    /// Layer environment overrides over `file`, then built-in defaults.
    pub fn resolve(file: Option<AppConfig>) -> Result<Self, ConfigError> {
        let mut env = AppConfig::builder();
        if let Ok(url) = std::env::var("USERDESK_API_URL") {
            env = env.server_url(url);
        }
        if let Ok(dir) = std::env::var("USERDESK_DATA_DIR") {
            env = env.storage_dir(dir);
        }

        let app = env.build()?.or(file.unwrap_or_default());
        app.validate()?;
        Ok(Self { app })
    }

    /// Get the full URL for an API endpoint
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.server_url().trim_end_matches('/'), path)
    }

    pub fn server_url(&self) -> &str {
        self.app.server_url.as_deref().unwrap_or(DEFAULT_SERVER_URL)
    }

    /// Directory holding persisted client state
    pub fn storage_dir(&self) -> PathBuf {
        self.app.storage_dir.clone().unwrap_or_else(|| {
            let mut path = dirs::data_dir().unwrap_or_else(std::env::temp_dir);
            path.push("userdesk");
            path
        })
    }

    /// Path of the persisted session file
    pub fn session_path(&self) -> PathBuf {
        self.storage_dir().join(SESSION_FILE)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.app.request_timeout_secs.map(Duration::from_secs)
    }
}
