//! MCP tool implementations.
//!
//! Every query tool follows the same contract: check that the connection is
//! configured, build the query, issue one GET, and hand back either the
//! pretty-printed JSON body or a typed [`Error`]. Conversion into the MCP
//! envelope happens in [`crate::server`].

use crate::config::{validate_api_key, validate_base_url};
use crate::context::Context;
use crate::error::{Error, Result};
use crate::http::{build_url, HttpBackend};
use crate::models::{GetIssueParams, ListIssuesParams, ListProjectsParams};
use crate::probe::{probe, CURRENT_USER_PATH};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Resource path for issue listings.
pub const ISSUES_PATH: &str = "/issues.json";

/// Resource path for project listings.
pub const PROJECTS_PATH: &str = "/projects.json";

/// Resource path for issue statuses.
pub const ISSUE_STATUSES_PATH: &str = "/issue_statuses.json";

/// Tool implementations for the Redmine MCP server.
pub struct Tools {
    context: Arc<RwLock<Context>>,
    backend: Arc<dyn HttpBackend>,
}

impl Tools {
    /// Create a new Tools instance over the shared context and HTTP backend.
    pub fn new(context: Arc<RwLock<Context>>, backend: Arc<dyn HttpBackend>) -> Self {
        Self { context, backend }
    }

    /// The shared context.
    #[must_use]
    pub fn context(&self) -> &Arc<RwLock<Context>> {
        &self.context
    }

    /// List issues.
    ///
    /// # Errors
    ///
    /// Returns an error if the server is not configured or the request fails.
    pub async fn list_issues(&self, params: &ListIssuesParams) -> Result<String> {
        self.fetch(ISSUES_PATH, &params.query()).await
    }

    /// Fetch one issue by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the server is not configured or the request fails.
    pub async fn get_issue(&self, params: &GetIssueParams) -> Result<String> {
        self.fetch(&params.path(), &params.query()).await
    }

    /// List projects.
    ///
    /// # Errors
    ///
    /// Returns an error if the server is not configured or the request fails.
    pub async fn list_projects(&self, params: &ListProjectsParams) -> Result<String> {
        self.fetch(PROJECTS_PATH, &params.query()).await
    }

    /// List the issue statuses defined on the server.
    ///
    /// # Errors
    ///
    /// Returns an error if the server is not configured or the request fails.
    pub async fn list_issue_statuses(&self) -> Result<String> {
        self.fetch(ISSUE_STATUSES_PATH, &[]).await
    }

    /// Show the user the API key belongs to.
    ///
    /// # Errors
    ///
    /// Returns an error if the server is not configured or the request fails.
    pub async fn current_user(&self) -> Result<String> {
        self.fetch(CURRENT_USER_PATH, &[]).await
    }

    /// Probe the supplied connection settings and store them on success.
    ///
    /// The context is only written after the probe succeeds. Calling this
    /// again with other settings re-probes and overwrites.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidUrl` for a malformed base URL and
    /// `Error::MissingApiKey` for a blank key (no request is made in either
    /// case), and `Error::ConnectionFailed` when the probe fails.
    pub async fn initialize(&self, base_url: &str, api_key: &str) -> Result<String> {
        let base_url = validate_base_url(base_url)?;
        let api_key = validate_api_key(api_key)?;

        let result = probe(self.backend.as_ref(), &base_url, &api_key).await;
        if !result.ok {
            return Err(Error::ConnectionFailed(
                result.error_detail.unwrap_or_default(),
            ));
        }

        self.context
            .write()
            .await
            .set(base_url.clone(), api_key);
        info!(base_url = %base_url, "Redmine connection initialized");

        Ok(format!(
            "Successfully connected to Redmine server ({base_url})."
        ))
    }

    /// Issue one GET against `path` and pretty-print the JSON body.
    async fn fetch(&self, path: &str, query: &[(&str, String)]) -> Result<String> {
        // Snapshot credentials so the lock is not held across the request.
        let creds = self.context.read().await.credentials()?;

        let url = build_url(&creds.base_url, path, query)?;
        debug!(path, "Fetching from Redmine");

        let value = self.backend.get(&url, &creds.api_key).await?.into_json()?;
        Ok(serde_json::to_string_pretty(&value)?)
    }
}
