//! Connectivity check against the Redmine "current user" endpoint.

use crate::config::ServerConfig;
use crate::http::{build_url, HttpBackend};
use tracing::{info, warn};

/// Endpoint used to verify the base URL and API key.
pub const CURRENT_USER_PATH: &str = "/users/current.json";

/// Outcome of a single probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    /// Whether the endpoint answered with a 2xx status.
    pub ok: bool,
    /// Status line or error message when `ok` is false.
    pub error_detail: Option<String>,
}

impl ProbeResult {
    fn success() -> Self {
        Self {
            ok: true,
            error_detail: None,
        }
    }

    fn failure(detail: impl Into<String>) -> Self {
        Self {
            ok: false,
            error_detail: Some(detail.into()),
        }
    }
}

/// Issue one authenticated GET to `{base_url}/users/current.json`.
///
/// Never fails: every problem is folded into the returned [`ProbeResult`].
pub async fn probe(backend: &dyn HttpBackend, base_url: &str, api_key: &str) -> ProbeResult {
    let url = match build_url(base_url, CURRENT_USER_PATH, &[]) {
        Ok(url) => url,
        Err(e) => {
            warn!(base_url, error = %e, "Cannot build probe URL");
            return ProbeResult::failure(e.to_string());
        }
    };

    match backend.get(&url, api_key).await {
        Ok(response) if response.is_success() => {
            info!(base_url, "Connected to Redmine server");
            ProbeResult::success()
        }
        Ok(response) => {
            let detail = format!("{} {}", response.status, response.status_text);
            warn!(base_url, status = response.status, "Redmine rejected the probe");
            ProbeResult::failure(detail.trim_end().to_string())
        }
        Err(e) => {
            warn!(base_url, error = %e, "Redmine probe failed");
            ProbeResult::failure(e.to_string())
        }
    }
}

/// Probe the pair stored in `config`.
///
/// An incomplete configuration fails immediately without a network call.
pub async fn probe_config(backend: &dyn HttpBackend, config: &ServerConfig) -> ProbeResult {
    match config.credentials() {
        Some((base_url, api_key)) => probe(backend, base_url, api_key).await,
        None => ProbeResult::failure("base URL or API key is not configured"),
    }
}
