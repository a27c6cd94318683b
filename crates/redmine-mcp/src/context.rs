//! Shared connection state for the MCP server.
//!
//! A single [`Context`] is created at startup and shared by every tool behind
//! `Arc<RwLock<Context>>`. Query tools only read it; the `initialize` tool is
//! the only writer.
//!
//! # Lock Ordering
//!
//! Never hold the context lock across a network call. Take a snapshot with
//! [`Context::credentials`] and drop the guard before awaiting the request.

use crate::config::ServerConfig;
use crate::error::{Error, Result};
use tracing::debug;

/// Validated credentials captured from the context for a single request.
#[derive(Clone)]
pub struct Credentials {
    /// Base URL without a trailing slash.
    pub base_url: String,
    /// API key for the `X-Redmine-API-Key` header.
    pub api_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Process-wide connection state.
#[derive(Debug, Default)]
pub struct Context {
    config: ServerConfig,
}

impl Context {
    /// Create a context seeded with the given startup configuration.
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    /// The current configuration.
    #[must_use]
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Whether tools may reach the Redmine API.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    /// Snapshot the credentials for one request.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotConfigured` if either the base URL or the API key is missing.
    pub fn credentials(&self) -> Result<Credentials> {
        let (base_url, api_key) = self.config.credentials().ok_or(Error::NotConfigured)?;
        Ok(Credentials {
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Replace the configuration. There is no merge: both values are overwritten.
    pub fn set(&mut self, base_url: String, api_key: String) {
        debug!(base_url = %base_url, "Replacing Redmine connection settings");
        self.config = ServerConfig {
            base_url: Some(base_url),
            api_key: Some(api_key),
        };
    }
}
