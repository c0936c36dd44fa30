//! Binary entry point: stdio transport for the MCP server.
//!
//! Requests arrive as newline-delimited JSON-RPC on stdin and responses are
//! written to stdout. All logging goes to stderr since stdout carries the
//! protocol.

use sonar_mcp::app::SonarQubeMcpServer;
use sonar_mcp::config::McpServerConfig;
use sonar_mcp::server::McpServer;
use sonar_mcp::types::{McpError, McpRequest, McpResponse, RequestId};
use std::collections::HashMap;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let env: HashMap<String, String> = std::env::vars().collect();
    let config = match McpServerConfig::from_environment(&env) {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    let server = match SonarQubeMcpServer::new(config) {
        Ok(server) => server,
        Err(e) => {
            error!("Failed to initialize the MCP server: {e}");
            std::process::exit(1);
        }
    };
    if let Err(e) = server.start().await {
        error!("Failed to start the MCP server: {e}");
        std::process::exit(1);
    }
    info!(
        version = server.config().app_version(),
        "SonarQube MCP server is ready, waiting for requests on stdio"
    );

    if let Err(e) = serve_stdio(server.mcp_server()).await {
        error!("stdio transport failed: {e}");
        std::process::exit(1);
    }
}

/// Read newline-delimited JSON-RPC from stdin until EOF.
async fn serve_stdio(server: &McpServer) -> io::Result<()> {
    let mut lines = BufReader::new(io::stdin()).lines();
    let mut stdout = io::stdout();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let Some(response) = dispatch_line(server, line).await else {
            continue;
        };
        match serde_json::to_string(&response) {
            Ok(payload) => {
                stdout.write_all(payload.as_bytes()).await?;
                stdout.write_all(b"\n").await?;
                stdout.flush().await?;
            }
            Err(e) => error!("Failed to serialize response: {e}"),
        }
    }
    debug!("stdin closed, shutting down");
    Ok(())
}

/// Turn one input line into a response. Notifications (requests without an
/// `id`) produce no response per the JSON-RPC specification.
async fn dispatch_line(server: &McpServer, line: &str) -> Option<McpResponse> {
    let value: serde_json::Value = match serde_json::from_str(line) {
        Ok(value) => value,
        Err(e) => {
            warn!("Received a line that is not valid JSON: {e}");
            return Some(McpResponse::error(RequestId::Null, McpError::parse_error()));
        }
    };
    if value.get("id").is_none() {
        debug!(
            method = value.get("method").and_then(|m| m.as_str()).unwrap_or(""),
            "ignoring notification"
        );
        return None;
    }
    match serde_json::from_value::<McpRequest>(value) {
        Ok(request) => Some(server.handle_request(request).await),
        Err(e) => {
            warn!("Received an invalid JSON-RPC request: {e}");
            Some(McpResponse::error(
                RequestId::Null,
                McpError::invalid_request(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dispatch_parse_error() {
        let server = McpServer::new("test", "0.0.0");
        let response = dispatch_line(&server, "{not json").await.unwrap();
        let error = response.error.unwrap();
        assert_eq!(error.code, McpError::PARSE_ERROR);
    }

    #[tokio::test]
    async fn test_dispatch_drops_notifications() {
        let server = McpServer::new("test", "0.0.0");
        let response = dispatch_line(
            &server,
            r#"{"jsonrpc": "2.0", "method": "notifications/initialized"}"#,
        )
        .await;
        assert!(response.is_none());
    }

    #[tokio::test]
    async fn test_dispatch_handles_ping() {
        let server = McpServer::new("test", "0.0.0");
        let response = dispatch_line(&server, r#"{"jsonrpc": "2.0", "id": 1, "method": "ping"}"#)
            .await
            .unwrap();
        assert_eq!(response.id, RequestId::Number(1));
        assert!(response.error.is_none());
    }
}
