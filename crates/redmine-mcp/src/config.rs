//! Connection settings for the Redmine API.
//!
//! Settings come from `REDMINE_BASE_URL` / `REDMINE_API_KEY` (or the matching
//! command-line flags) at startup and may later be replaced by the
//! `initialize` tool.

use crate::error::{Error, Result};
use url::Url;

/// Environment variable holding the Redmine base URL.
pub const BASE_URL_ENV: &str = "REDMINE_BASE_URL";

/// Environment variable holding the Redmine API key.
pub const API_KEY_ENV: &str = "REDMINE_API_KEY";

/// Base URL and API key for a Redmine instance.
///
/// Either field may be missing. The pair only counts as configured when both
/// are present and non-empty.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ServerConfig {
    /// Base URL without a trailing slash, e.g. `https://redmine.example.com`.
    pub base_url: Option<String>,
    /// Secret sent in the `X-Redmine-API-Key` header.
    pub api_key: Option<String>,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Which half of the configuration is missing, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completeness {
    /// Both values are present.
    Complete,
    /// Neither value is present.
    Empty,
    /// Only the API key is present.
    MissingBaseUrl,
    /// Only the base URL is present.
    MissingApiKey,
}

impl ServerConfig {
    /// Build a configuration from raw startup values.
    ///
    /// Blank values are dropped and the base URL is normalized with
    /// [`normalize_base_url`].
    #[must_use]
    pub fn from_values(base_url: Option<String>, api_key: Option<String>) -> Self {
        Self {
            base_url: non_blank(base_url).map(|url| normalize_base_url(&url)),
            api_key: non_blank(api_key),
        }
    }

    /// Read the configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::from_values(lookup(BASE_URL_ENV), lookup(API_KEY_ENV))
    }

    /// Whether both the base URL and the API key are set.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.completeness() == Completeness::Complete
    }

    /// Report which values are present.
    #[must_use]
    pub fn completeness(&self) -> Completeness {
        let has_url = self.base_url.as_deref().is_some_and(|s| !s.is_empty());
        let has_key = self.api_key.as_deref().is_some_and(|s| !s.is_empty());
        match (has_url, has_key) {
            (true, true) => Completeness::Complete,
            (false, false) => Completeness::Empty,
            (false, true) => Completeness::MissingBaseUrl,
            (true, false) => Completeness::MissingApiKey,
        }
    }

    /// The base URL and API key, if both are set.
    #[must_use]
    pub fn credentials(&self) -> Option<(&str, &str)> {
        if !self.is_configured() {
            return None;
        }
        Some((self.base_url.as_deref()?, self.api_key.as_deref()?))
    }
}

/// Normalize a base URL taken from the environment.
///
/// Bare hostnames are assumed to be served over HTTPS, so
/// `redmine.example.com` becomes `https://redmine.example.com`. Surrounding
/// whitespace and trailing slashes are removed.
#[must_use]
pub fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if has_http_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

/// Validate a base URL supplied at runtime through `initialize`.
///
/// Unlike [`normalize_base_url`] no scheme is added: the value must already
/// be an absolute `http` or `https` URL.
///
/// # Errors
///
/// Returns [`Error::InvalidUrl`] if the value does not parse or uses another scheme.
pub fn validate_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    let parsed = Url::parse(trimmed).map_err(|e| Error::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(Error::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}'", parsed.scheme()),
        });
    }

    Ok(trimmed.trim_end_matches('/').to_string())
}

/// Validate an API key supplied at runtime through `initialize`.
///
/// # Errors
///
/// Returns [`Error::MissingApiKey`] if the key is empty or only whitespace.
pub fn validate_api_key(raw: &str) -> Result<String> {
    non_blank(Some(raw.trim().to_string())).ok_or(Error::MissingApiKey)
}

fn has_http_scheme(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
