//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use redmine_mcp::config::ServerConfig;
use redmine_mcp::context::Context;
use redmine_mcp::error::{Error, Result};
use redmine_mcp::http::{HttpBackend, HttpResponse};
use redmine_mcp::tools::Tools;
use std::sync::{Arc, Mutex};
use tokio::sync::RwLock;
use url::Url;

/// A request seen by [`FakeBackend`].
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub url: Url,
    pub api_key: String,
}

#[derive(Clone)]
enum Canned {
    Response(HttpResponse),
    Fail(String),
}

/// A fake HTTP backend that returns canned responses and records every call.
///
/// Routes match when the request path ends with the registered suffix.
/// Unmatched requests get a 404.
#[derive(Default)]
pub struct FakeBackend {
    routes: Mutex<Vec<(String, Canned)>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Answer requests whose path ends with `path` with a JSON body.
    pub fn with_json(self: Arc<Self>, path: &str, body: serde_json::Value) -> Arc<Self> {
        self.with_status(path, 200, "OK", &body.to_string())
    }

    /// Answer requests whose path ends with `path` with a fixed status and body.
    pub fn with_status(
        self: Arc<Self>,
        path: &str,
        status: u16,
        status_text: &str,
        body: &str,
    ) -> Arc<Self> {
        self.routes.lock().unwrap().push((
            path.to_string(),
            Canned::Response(HttpResponse {
                status,
                status_text: status_text.to_string(),
                body: body.to_string(),
            }),
        ));
        self
    }

    /// Fail requests whose path ends with `path` as if the network were down.
    pub fn with_failure(self: Arc<Self>, path: &str, message: &str) -> Arc<Self> {
        self.routes
            .lock()
            .unwrap()
            .push((path.to_string(), Canned::Fail(message.to_string())));
        self
    }

    /// All requests seen so far.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Number of requests seen so far.
    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// The most recent request.
    pub fn last_request(&self) -> RecordedRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was made")
    }
}

#[async_trait]
impl HttpBackend for FakeBackend {
    async fn get(&self, url: &Url, api_key: &str) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push(RecordedRequest {
            url: url.clone(),
            api_key: api_key.to_string(),
        });

        let canned = self
            .routes
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(path, _)| url.path().ends_with(path.as_str()))
            .map(|(_, canned)| canned.clone());

        match canned {
            Some(Canned::Response(response)) => Ok(response),
            Some(Canned::Fail(message)) => Err(Error::Transport(message)),
            None => Ok(HttpResponse {
                status: 404,
                status_text: "Not Found".to_string(),
                body: String::new(),
            }),
        }
    }
}

/// Build `Tools` over a context seeded with `config`.
pub fn create_tools(config: ServerConfig, backend: Arc<FakeBackend>) -> Tools {
    let context = Arc::new(RwLock::new(Context::new(config)));
    Tools::new(context, backend)
}

/// A fully configured startup configuration.
pub fn configured() -> ServerConfig {
    ServerConfig::from_values(
        Some("https://redmine.example.com".to_string()),
        Some("test-key".to_string()),
    )
}

/// Serialize a tool result into its wire form.
pub fn wire(result: &rmcp::model::CallToolResult) -> serde_json::Value {
    serde_json::to_value(result).expect("CallToolResult serializes")
}

/// The text of the first content item of a wire envelope.
pub fn text(envelope: &serde_json::Value) -> String {
    envelope["content"][0]["text"]
        .as_str()
        .expect("text content")
        .to_string()
}
