//! HTTP backend abstraction for the Redmine REST API.
//!
//! Tools and the connectivity probe never talk to `reqwest` directly. They go
//! through [`HttpBackend`], which keeps the single outbound GET swappable in
//! tests.

use crate::error::{Error, Result};
use async_trait::async_trait;
use tracing::debug;
use url::Url;

/// Header Redmine reads the API key from.
pub const API_KEY_HEADER: &str = "X-Redmine-API-Key";

/// A completed HTTP exchange, successful or not.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Numeric status code.
    pub status: u16,
    /// Canonical reason phrase (empty when the status has none).
    pub status_text: String,
    /// Raw response body.
    pub body: String,
}

impl HttpResponse {
    /// Whether the status is in the 2xx range.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Parse the body as JSON, mapping non-2xx statuses to [`Error::Upstream`].
    ///
    /// # Errors
    ///
    /// Returns `Error::Upstream` for non-success statuses and `Error::Json`
    /// when the body is not valid JSON.
    pub fn into_json(self) -> Result<serde_json::Value> {
        if !self.is_success() {
            return Err(Error::Upstream {
                status: self.status,
                status_text: self.status_text,
            });
        }
        Ok(serde_json::from_str(&self.body)?)
    }
}

/// Trait for HTTP backends that can issue an authenticated GET.
///
/// Implementations return `Ok` for any response that arrived, whatever its
/// status, and `Err` only when no response was received.
#[async_trait]
pub trait HttpBackend: Send + Sync {
    /// GET `url` with the API key attached.
    async fn get(&self, url: &Url, api_key: &str) -> Result<HttpResponse>;
}

/// Production backend built on a shared `reqwest::Client`.
///
/// No timeout or retry policy is layered on top of the client defaults.
#[derive(Debug, Clone)]
pub struct ReqwestBackend {
    client: reqwest::Client,
}

impl ReqwestBackend {
    /// Create a backend with a fresh client.
    ///
    /// # Errors
    ///
    /// Returns `Error::Transport` if the TLS backend cannot be initialized.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("redmine-mcp/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpBackend for ReqwestBackend {
    async fn get(&self, url: &Url, api_key: &str) -> Result<HttpResponse> {
        debug!(url = %url, "GET");
        let response = self
            .client
            .get(url.as_str())
            .header(API_KEY_HEADER, api_key)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(url = %url, status = status.as_u16(), "Response received");

        Ok(HttpResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            body,
        })
    }
}

/// Join `base_url` and `path` and append `query` pairs in order.
///
/// No `?` is added when `query` is empty.
///
/// # Errors
///
/// Returns `Error::InvalidUrl` if the joined string is not a valid URL.
pub fn build_url(base_url: &str, path: &str, query: &[(&str, String)]) -> Result<Url> {
    let raw = format!("{base_url}{path}");
    let mut url = Url::parse(&raw).map_err(|e| Error::InvalidUrl {
        url: raw.clone(),
        reason: e.to_string(),
    })?;

    if !query.is_empty() {
        url.query_pairs_mut()
            .extend_pairs(query.iter().map(|(k, v)| (*k, v.as_str())));
    }
    Ok(url)
}
