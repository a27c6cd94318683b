//! MCP server implementation.
//!
//! This module contains the rmcp server setup. Tool results from
//! [`Tools`] are converted into MCP `CallToolResult` envelopes here, and the
//! `initialize` tool is only registered when the startup probe failed.

use crate::config::ServerConfig;
use crate::context::Context;
use crate::error::Error;
use crate::http::HttpBackend;
use crate::models::{GetIssueParams, InitializeParams, ListIssuesParams, ListProjectsParams};
use crate::probe::{probe_config, ProbeResult};
use crate::tools::Tools;
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::transport::stdio;
use rmcp::{
    handler::server::ServerHandler, tool, tool_handler, tool_router, ErrorData as McpError,
    ServiceExt,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// The Redmine MCP server.
///
/// Provides MCP protocol handling over stdio transport.
#[derive(Clone)]
pub struct RedmineMcpServer {
    /// Tool implementations.
    tools: Arc<Tools>,
    /// Whether the `initialize` tool is registered.
    initialize_exposed: bool,
    /// Tool router for MCP dispatch.
    tool_router: ToolRouter<Self>,
}

#[tool_router(router = query_router)]
impl RedmineMcpServer {
    /// List issues with optional filters.
    #[tool(
        name = "getIssues",
        description = "Retrieves a list of issues from Redmine. Supports filtering by project, status, assignee, and more, as well as sorting and pagination. Returns basic information for each issue, including ID, subject, description, status, priority, assignee, author, creation date, and update date. Parameters: project_id, status_id, assigned_to_id, tracker_id, sort, limit, offset."
    )]
    pub async fn get_issues(
        &self,
        Parameters(params): Parameters<ListIssuesParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(envelope(self.tools.list_issues(&params).await, "issues"))
    }

    /// Fetch a single issue by ID.
    #[tool(
        name = "getIssue",
        description = "Fetches detailed information for a specific issue by ID. In addition to basic fields, it can include related data such as journals, attachments, relations, changesets, watchers, and child issues. Parameters: id, include (for related entities)."
    )]
    pub async fn get_issue(
        &self,
        Parameters(params): Parameters<GetIssueParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(envelope(self.tools.get_issue(&params).await, "issue"))
    }

    /// List accessible projects.
    #[tool(
        name = "getProjects",
        description = "Lists all accessible projects with basic information like ID, name, identifier, description, status, created and updated dates. Parameters: limit, offset."
    )]
    pub async fn get_projects(
        &self,
        Parameters(params): Parameters<ListProjectsParams>,
    ) -> Result<CallToolResult, McpError> {
        Ok(envelope(self.tools.list_projects(&params).await, "projects"))
    }

    /// List issue statuses.
    #[tool(
        name = "getIssueStatuses",
        description = "Lists all issue statuses defined in Redmine with their ID, name, and whether the status closes the issue. Use the IDs as status_id when filtering issues."
    )]
    pub async fn get_issue_statuses(&self) -> Result<CallToolResult, McpError> {
        Ok(envelope(
            self.tools.list_issue_statuses().await,
            "issue statuses",
        ))
    }

    /// Show the account behind the API key.
    #[tool(
        name = "getCurrentUser",
        description = "Returns the Redmine account the configured API key belongs to, including ID, login, name, and email. Useful for resolving 'me' in assignee filters."
    )]
    pub async fn get_current_user(&self) -> Result<CallToolResult, McpError> {
        Ok(envelope(self.tools.current_user().await, "user information"))
    }
}

#[tool_router(router = setup_router)]
impl RedmineMcpServer {
    /// Configure the Redmine connection at runtime.
    #[tool(
        name = "initialize",
        description = "Connects the server to a Redmine instance. Only needed when REDMINE_BASE_URL and REDMINE_API_KEY were not set or could not be verified at startup. Parameters: baseUrl (full URL including https://), apiKey."
    )]
    pub async fn initialize_connection(
        &self,
        Parameters(params): Parameters<InitializeParams>,
    ) -> Result<CallToolResult, McpError> {
        let result = self
            .tools
            .initialize(&params.base_url, &params.api_key)
            .await
            .map_err(|e| match e {
                Error::ConnectionFailed(_) => e,
                other => Error::ConnectionFailed(other.to_string()),
            });
        Ok(envelope(result, "connection"))
    }
}

impl RedmineMcpServer {
    /// Create a server over `tools`.
    ///
    /// `startup` is the probe run against the startup configuration; the
    /// `initialize` tool is registered only if it failed.
    #[must_use]
    pub fn new(tools: Tools, startup: &ProbeResult) -> Self {
        let initialize_exposed = !startup.ok;
        let tool_router = if initialize_exposed {
            Self::query_router() + Self::setup_router()
        } else {
            Self::query_router()
        };

        Self {
            tools: Arc::new(tools),
            initialize_exposed,
            tool_router,
        }
    }

    /// Seed the context from `config`, probe it once, and build the server.
    pub async fn start(config: ServerConfig, backend: Arc<dyn HttpBackend>) -> Self {
        let startup = probe_config(backend.as_ref(), &config).await;
        if !startup.ok {
            warn!(
                detail = startup.error_detail.as_deref().unwrap_or_default(),
                "Startup configuration not usable; exposing the initialize tool"
            );
        }

        let context = Arc::new(RwLock::new(Context::new(config)));
        Self::new(Tools::new(context, backend), &startup)
    }

    /// Whether the `initialize` tool is registered.
    #[must_use]
    pub fn initialize_exposed(&self) -> bool {
        self.initialize_exposed
    }

    /// Names of all registered tools.
    #[must_use]
    pub fn tool_names(&self) -> Vec<String> {
        self.tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect()
    }

    /// Get a reference to the shared context.
    #[must_use]
    pub fn context(&self) -> &Arc<RwLock<Context>> {
        self.tools.context()
    }

    /// Serve MCP over stdio until the client disconnects or ctrl-c is received.
    ///
    /// # Errors
    ///
    /// Returns an error if the stdio transport cannot be started or the
    /// service task panics.
    pub async fn run(self) -> anyhow::Result<()> {
        let service = self.serve(stdio()).await?;
        info!("Redmine MCP server connected; waiting for requests on stdio");

        let cancel = service.cancellation_token();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Interrupt received, shutting down");
                cancel.cancel();
            }
        });

        let reason = service.waiting().await?;
        info!(?reason, "Redmine MCP server stopped");
        Ok(())
    }
}

/// Convert a tool result into the MCP envelope.
///
/// Success carries the text with no `isError` flag; failures carry the
/// rendered error with `isError: true`.
fn envelope(result: crate::Result<String>, resource: &str) -> CallToolResult {
    match result {
        Ok(text) => {
            let mut result = CallToolResult::success(vec![Content::text(text)]);
            result.is_error = None;
            result
        }
        Err(e) => CallToolResult::error(vec![Content::text(e.describe(resource))]),
    }
}

#[tool_handler]
impl ServerHandler for RedmineMcpServer {
    fn get_info(&self) -> ServerInfo {
        let instructions = if self.initialize_exposed {
            "Read-only access to a Redmine issue tracker. The connection is not configured yet: call initialize with baseUrl and apiKey before using the other tools."
        } else {
            "Read-only access to a Redmine issue tracker. Use getProjects and getIssues to browse, getIssue for details."
        };

        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "redmine-mcp".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                title: None,
                icons: None,
                website_url: None,
            },
            instructions: Some(instructions.into()),
        }
    }
}
