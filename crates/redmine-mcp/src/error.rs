//! Error types for the Redmine MCP server.

use thiserror::Error;

/// Guidance returned by every query tool while no connection is configured.
pub const NOT_CONFIGURED_MESSAGE: &str = "The server is not initialized. Call the 'initialize' tool with your Redmine base URL and API key first.";

/// Errors that can occur in the Redmine MCP server.
#[derive(Debug, Error)]
pub enum Error {
    /// No validated base URL / API key pair is available.
    #[error("{}", NOT_CONFIGURED_MESSAGE)]
    NotConfigured,

    /// Redmine answered with a non-success HTTP status.
    #[error("{status} {status_text}")]
    Upstream {
        /// Numeric HTTP status code.
        status: u16,
        /// Canonical reason phrase for the status.
        status_text: String,
    },

    /// The request never produced an HTTP response (DNS, connect, TLS, body read).
    #[error("{0}")]
    Transport(String),

    /// The response body was not valid JSON.
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),

    /// A base URL could not be parsed or uses an unsupported scheme.
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The URL as supplied.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// An API key supplied to `initialize` was empty or whitespace.
    #[error("API key must not be empty")]
    MissingApiKey,

    /// The connectivity probe run by `initialize` failed.
    #[error("Failed to connect to Redmine server: {0}")]
    ConnectionFailed(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl Error {
    /// Render this error as the text shown to the calling agent.
    ///
    /// `resource` names what the tool was fetching ("issues", "projects", ...).
    #[must_use]
    pub fn describe(&self, resource: &str) -> String {
        match self {
            Self::NotConfigured | Self::ConnectionFailed(_) => self.to_string(),
            Self::Upstream { .. } => format!("Failed to fetch {resource}: {self}"),
            _ => format!("Error while fetching {resource}: {self}"),
        }
    }
}

/// Result type for Redmine MCP operations.
pub type Result<T> = std::result::Result<T, Error>;
