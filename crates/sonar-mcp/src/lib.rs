//! # SonarQube MCP Server
//!
//! This crate provides an MCP (Model Context Protocol) server that exposes
//! SonarQube Server and SonarQube Cloud capabilities as tools, backed by the
//! `sonar-serverapi` client crate.
//!
//! ## Overview
//!
//! The sonar-mcp crate handles:
//! - **Tools**: Tool definitions and execution against the SonarQube Web API
//! - **JSON-RPC**: MCP protocol implementation over stdio
//! - **Configuration**: Environment-driven server and credential setup
//! - **Analyzers**: Synchronization of analyzer plugins to local storage
//! - **IDE bridge**: Optional integration with a running SonarQube for IDE
//!
//! ## MCP Protocol
//!
//! This implementation follows the Model Context Protocol specification,
//! enabling AI assistants to interact with SonarQube instances.
//!
//! Supported methods:
//! - `initialize`: Initialize the MCP session
//! - `tools/list`: List available tools
//! - `tools/call`: Execute a tool
//! - `ping`: Liveness check
//!
//! ## Available Tools
//!
//! The tool set depends on the deployment flavor (Server or Cloud) and on
//! whether a SonarQube for IDE instance is reachable. Common tools cover
//! issues, projects, measures, metrics, quality gates, rules, languages,
//! sources, webhooks and portfolios; Server adds system administration
//! tools and dependency risk search, Cloud adds enterprise listing.

pub mod app;
pub mod bridge;
pub mod config;
pub mod plugins;
pub mod server;
pub mod tools;
pub mod types;
pub mod version_checker;

pub use app::SonarQubeMcpServer;
pub use config::McpServerConfig;
pub use server::McpServer;
