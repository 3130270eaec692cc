//! Client and HTTP adapter configuration.
//!
//! Values are supplied by the embedding application; only
//! [`HttpApiConfig::from_env`] reads the process environment.

use std::time::Duration;
use thiserror::Error;
use todosync_runtime::StoreConfig;

/// Environment variable holding the backend base URL.
pub const BASE_URL_VAR: &str = "TODOSYNC_BASE_URL";
/// Environment variable holding the optional API key.
pub const API_KEY_VAR: &str = "TODOSYNC_API_KEY";
/// Environment variable holding the optional bearer token.
pub const TOKEN_VAR: &str = "TODOSYNC_TOKEN";

/// Configuration errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required environment variable is not set
    #[error("Environment variable {0} is not set")]
    MissingVar(&'static str),
}

/// [`TodoClient`](crate::client::TodoClient) configuration.
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// How long a caller waits for an operation's outcome.
    ///
    /// Default: `None` (wait until the call resolves). When the timeout
    /// fires only the caller stops waiting; the operation still completes
    /// and merges into state.
    pub outcome_timeout: Option<Duration>,

    /// Configuration of the underlying store.
    pub store: StoreConfig,
}

impl ClientConfig {
    /// Set the outcome timeout.
    #[must_use]
    pub const fn with_outcome_timeout(mut self, timeout: Duration) -> Self {
        self.outcome_timeout = Some(timeout);
        self
    }

    /// Set the store configuration.
    #[must_use]
    pub const fn with_store_config(mut self, store: StoreConfig) -> Self {
        self.store = store;
        self
    }
}

/// [`HttpRemoteApi`](crate::http::HttpRemoteApi) configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpApiConfig {
    /// Backend base URL, without trailing slash (e.g. `https://api.example.com/v1`)
    pub base_url: String,

    /// Sent as the `API-KEY` header when set.
    pub api_key: Option<String>,

    /// Sent as `Authorization: Bearer <token>` when set.
    pub token: Option<String>,
}

impl HttpApiConfig {
    /// Create a configuration for `base_url` with no credentials.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: None,
            token: None,
        }
    }

    /// Read the configuration from `TODOSYNC_BASE_URL`, `TODOSYNC_API_KEY`
    /// and `TODOSYNC_TOKEN`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingVar`] if `TODOSYNC_BASE_URL` is not set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url =
            std::env::var(BASE_URL_VAR).map_err(|_| ConfigError::MissingVar(BASE_URL_VAR))?;

        let mut config = Self::new(base_url);
        config.api_key = std::env::var(API_KEY_VAR).ok();
        config.token = std::env::var(TOKEN_VAR).ok();
        Ok(config)
    }

    /// Set the API key.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the bearer token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_drops_trailing_slash() {
        let config = HttpApiConfig::new("http://localhost:8080/api/");
        assert_eq!(config.base_url, "http://localhost:8080/api");
    }

    #[test]
    fn client_defaults_wait_forever() {
        let config = ClientConfig::default();
        assert!(config.outcome_timeout.is_none());
        assert_eq!(config.store.broadcast_capacity, 256);
    }
}
