//! MCP server for read-only Redmine access.
//!
//! This crate provides an MCP (Model Context Protocol) server that lets AI
//! assistants query a Redmine issue tracker without speaking its REST API.
//!
//! # Architecture
//!
//! The server uses the `rmcp` crate for MCP protocol handling. Each tool maps
//! to one authenticated GET against Redmine through the [`http::HttpBackend`]
//! trait, and the JSON body is returned as pretty-printed text.
//!
//! The connection (base URL + API key) comes from `REDMINE_BASE_URL` and
//! `REDMINE_API_KEY`. It is verified once at startup; if that fails, an
//! `initialize` tool is registered so the client can supply working settings.
//!
//! # Tools
//!
//! ## Queries
//! - `getIssues` - List issues with filters and pagination
//! - `getIssue` - Show one issue, optionally with related data
//! - `getProjects` - List accessible projects
//! - `getIssueStatuses` - List issue statuses
//! - `getCurrentUser` - Show the account behind the API key
//!
//! ## Setup
//! - `initialize` - Configure the connection (only when startup verification failed)

pub mod config;
pub mod context;
pub mod error;
pub mod http;
pub mod models;
pub mod probe;
pub mod server;
pub mod tools;

pub use error::{Error, Result};
pub use server::RedmineMcpServer;
