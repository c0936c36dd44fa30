//! MCP server and tool dispatch.
//!
//! Tools never surface a raw error to the MCP client: anything a tool
//! fails to handle itself is caught at the dispatch boundary and rendered
//! as an error result with a generic prefix.

use crate::types::*;
use async_trait::async_trait;
use sonar_serverapi::ServerApiError;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::error;

/// Errors a tool can propagate to the dispatcher.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Missing required argument: {0}")]
    MissingArgument(String),

    #[error("Invalid value for argument '{name}': {message}")]
    InvalidArgument { name: String, message: String },

    #[error(transparent)]
    Api(#[from] ServerApiError),

    #[error("{0}")]
    Internal(String),
}

pub type ToolResultOrError = Result<ToolResult, ToolError>;

/// Trait for tool implementations.
#[async_trait]
pub trait Tool: Send + Sync {
    fn definition(&self) -> ToolDefinition;

    async fn execute(&self, args: ToolArgs) -> ToolResultOrError;
}

/// Validated-extraction bag over the `tools/call` arguments object.
///
/// Required accessors fail with [`ToolError::MissingArgument`] before any
/// network call happens; numeric and boolean accessors also accept string
/// renderings since MCP clients are loose about argument typing.
#[derive(Debug, Clone)]
pub struct ToolArgs {
    arguments: serde_json::Map<String, serde_json::Value>,
}

impl ToolArgs {
    pub fn new(arguments: serde_json::Value) -> Self {
        let arguments = match arguments {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };
        Self { arguments }
    }

    pub fn get_string(&self, name: &str) -> Result<String, ToolError> {
        match self.arguments.get(name) {
            Some(serde_json::Value::String(s)) => Ok(s.clone()),
            Some(serde_json::Value::Null) | None => {
                Err(ToolError::MissingArgument(name.to_string()))
            }
            Some(other) => Ok(other.to_string()),
        }
    }

    pub fn get_optional_string(&self, name: &str) -> Option<String> {
        match self.arguments.get(name) {
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            _ => None,
        }
    }

    pub fn get_bool(&self, name: &str) -> Result<bool, ToolError> {
        self.get_optional_bool(name)
            .ok_or_else(|| ToolError::MissingArgument(name.to_string()))
    }

    pub fn get_optional_bool(&self, name: &str) -> Option<bool> {
        match self.arguments.get(name) {
            Some(serde_json::Value::Bool(b)) => Some(*b),
            Some(serde_json::Value::String(s)) => Some(s.eq_ignore_ascii_case("true")),
            _ => None,
        }
    }

    pub fn get_optional_int(&self, name: &str) -> Option<i64> {
        match self.arguments.get(name) {
            Some(serde_json::Value::Number(n)) => n.as_i64(),
            Some(serde_json::Value::String(s)) => s.parse().ok(),
            _ => None,
        }
    }

    pub fn get_int_or_default(&self, name: &str, default: i64) -> i64 {
        self.get_optional_int(name).unwrap_or(default)
    }

    pub fn get_string_list(&self, name: &str) -> Result<Vec<String>, ToolError> {
        self.get_optional_string_list(name)
            .ok_or_else(|| ToolError::MissingArgument(name.to_string()))
    }

    pub fn get_optional_string_list(&self, name: &str) -> Option<Vec<String>> {
        match self.arguments.get(name) {
            Some(serde_json::Value::Array(items)) => Some(
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect(),
            ),
            _ => None,
        }
    }
}

/// MCP server holding the registered tools.
pub struct McpServer {
    info: ServerInfo,
    capabilities: ServerCapabilities,
    tools: Arc<RwLock<HashMap<String, Arc<dyn Tool>>>>,
}

impl McpServer {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            info: ServerInfo {
                name: name.into(),
                version: version.into(),
            },
            capabilities: ServerCapabilities {
                tools: Some(ToolCapabilities {
                    list_changed: false,
                }),
                logging: Some(serde_json::json!({})),
            },
            tools: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn register_tool(&self, tool: Arc<dyn Tool>) {
        let name = tool.definition().name;
        let mut tools = self.tools.write().await;
        tools.insert(name, tool);
    }

    pub async fn register_tools(&self, tools: Vec<Arc<dyn Tool>>) {
        for tool in tools {
            self.register_tool(tool).await;
        }
    }

    pub async fn list_tools(&self) -> Vec<ToolDefinition> {
        let tools = self.tools.read().await;
        let mut definitions: Vec<ToolDefinition> =
            tools.values().map(|t| t.definition()).collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        definitions
    }

    /// Execute a tool, converting any propagated error into an error
    /// result rather than a protocol-level failure.
    pub async fn call_tool(&self, name: &str, arguments: serde_json::Value) -> Option<ToolResult> {
        let tool = {
            let tools = self.tools.read().await;
            tools.get(name).cloned()
        };
        let tool = tool?;
        let result = match tool.execute(ToolArgs::new(arguments)).await {
            Ok(result) => result,
            Err(e) => {
                error!(tool = name, error = %e, "tool execution failed");
                ToolResult::failure(format!("An error occurred during the tool execution: {}", e))
            }
        };
        Some(result)
    }

    pub async fn handle_request(&self, request: McpRequest) -> McpResponse {
        match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id),
            "tools/list" => self.handle_tools_list(request.id).await,
            "tools/call" => self.handle_tools_call(request.id, request.params).await,
            "ping" => McpResponse::success(request.id, serde_json::json!({})),
            _ => McpResponse::error(request.id, McpError::method_not_found(&request.method)),
        }
    }

    fn handle_initialize(&self, id: RequestId) -> McpResponse {
        McpResponse::success(
            id,
            serde_json::json!({
                "protocolVersion": "2024-11-05",
                "capabilities": self.capabilities,
                "serverInfo": self.info
            }),
        )
    }

    async fn handle_tools_list(&self, id: RequestId) -> McpResponse {
        let tools = self.list_tools().await;
        McpResponse::success(id, serde_json::json!({ "tools": tools }))
    }

    async fn handle_tools_call(
        &self,
        id: RequestId,
        params: Option<serde_json::Value>,
    ) -> McpResponse {
        let params = match params {
            Some(p) => p,
            None => return McpResponse::error(id, McpError::invalid_params("Missing params")),
        };

        let call: ToolCall = match serde_json::from_value(params) {
            Ok(c) => c,
            Err(e) => return McpResponse::error(id, McpError::invalid_params(e.to_string())),
        };

        match self.call_tool(&call.name, call.arguments).await {
            Some(result) => match serde_json::to_value(result) {
                Ok(value) => McpResponse::success(id, value),
                Err(e) => McpResponse::error(id, McpError::internal_error(e.to_string())),
            },
            None => McpResponse::error(
                id,
                McpError::invalid_params(format!("Unknown tool: {}", call.name)),
            ),
        }
    }

    pub fn info(&self) -> &ServerInfo {
        &self.info
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn definition(&self) -> ToolDefinition {
            ToolDefinition::new("echo", "Echoes the message argument back")
                .with_required_string_property("message", "The message to echo")
        }

        async fn execute(&self, args: ToolArgs) -> ToolResultOrError {
            let message = args.get_string("message")?;
            Ok(ToolResult::success(message))
        }
    }

    #[tokio::test]
    async fn test_register_and_list() {
        let server = McpServer::new("sonarqube-mcp-server", "0.1.0");
        server.register_tool(Arc::new(EchoTool)).await;

        let tools = server.list_tools().await;
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0].name, "echo");
    }

    #[tokio::test]
    async fn test_initialize_response() {
        let server = McpServer::new("sonarqube-mcp-server", "0.1.0");
        let resp = server
            .handle_request(McpRequest::new(1, "initialize"))
            .await;
        let result = resp.result.unwrap();
        assert_eq!(result["serverInfo"]["name"], "sonarqube-mcp-server");
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let server = McpServer::new("sonarqube-mcp-server", "0.1.0");
        let resp = server
            .handle_request(McpRequest::new(1, "resources/list"))
            .await;
        assert_eq!(resp.error.unwrap().code, McpError::METHOD_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_missing_argument_is_caught_at_dispatch() {
        let server = McpServer::new("sonarqube-mcp-server", "0.1.0");
        server.register_tool(Arc::new(EchoTool)).await;

        let result = server
            .call_tool("echo", serde_json::json!({}))
            .await
            .unwrap();
        assert!(result.is_error);
        assert_eq!(
            result.first_text(),
            Some("An error occurred during the tool execution: Missing required argument: message")
        );
    }

    #[tokio::test]
    async fn test_unknown_tool_is_protocol_error() {
        let server = McpServer::new("sonarqube-mcp-server", "0.1.0");
        let resp = server
            .handle_request(
                McpRequest::new(1, "tools/call")
                    .with_params(serde_json::json!({"name": "nope", "arguments": {}})),
            )
            .await;
        assert_eq!(resp.error.unwrap().code, McpError::INVALID_PARAMS);
    }

    #[test]
    fn test_args_accept_string_renderings() {
        let args = ToolArgs::new(serde_json::json!({
            "page": "3",
            "flag": "true",
            "names": ["a", "b"]
        }));
        assert_eq!(args.get_optional_int("page"), Some(3));
        assert_eq!(args.get_optional_bool("flag"), Some(true));
        assert_eq!(args.get_string_list("names").unwrap(), vec!["a", "b"]);
        assert_eq!(args.get_int_or_default("missing", 1), 1);
    }
}
