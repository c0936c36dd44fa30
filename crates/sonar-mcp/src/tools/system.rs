//! Monitoring tools for the self-hosted server.

use crate::server::{Tool, ToolArgs, ToolResultOrError};
use crate::types::{ToolDefinition, ToolResult};
use async_trait::async_trait;
use sonar_serverapi::api::system::{HealthResponse, InfoResponse, InfoSection, StatusResponse};
use sonar_serverapi::ServerApi;
use serde_json::Value;
use std::fmt::Write;
use std::sync::Arc;

pub const SYSTEM_HEALTH_TOOL_NAME: &str = "get_system_health";
pub const SYSTEM_INFO_TOOL_NAME: &str = "get_system_info";
pub const SYSTEM_LOGS_TOOL_NAME: &str = "get_system_logs";
pub const SYSTEM_PING_TOOL_NAME: &str = "ping_system";
pub const SYSTEM_STATUS_TOOL_NAME: &str = "get_system_status";

const NOT_CONNECTED_MESSAGE: &str =
    "Not connected to SonarQube Server, please provide valid credentials";

pub struct SystemHealthTool {
    server_api: Arc<ServerApi>,
}

impl SystemHealthTool {
    pub fn new(server_api: Arc<ServerApi>) -> Self {
        Self { server_api }
    }
}

#[async_trait]
impl Tool for SystemHealthTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            SYSTEM_HEALTH_TOOL_NAME,
            "Get the health status of SonarQube Server instance. Returns GREEN (fully operational), \
             YELLOW (usable but needs attention), or RED (not operational).",
        )
    }

    async fn execute(&self, _args: ToolArgs) -> ToolResultOrError {
        if !self.server_api.is_authentication_set() {
            return Ok(ToolResult::failure(NOT_CONNECTED_MESSAGE));
        }
        let response = self.server_api.system_api().get_health().await?;
        Ok(ToolResult::success(render_health(&response)))
    }
}

fn render_health(response: &HealthResponse) -> String {
    let mut out = format!("SonarQube Server Health Status: {}\n", response.health);
    if !response.causes.is_empty() {
        out.push_str("\nCauses:\n");
        for cause in &response.causes {
            let _ = writeln!(out, "- {}", cause.message);
        }
    }
    if !response.nodes.is_empty() {
        out.push_str("\nNodes:\n");
        for node in &response.nodes {
            let _ = writeln!(out, "\n{} ({}) - {}", node.name, node.node_type, node.health);
            let _ = writeln!(out, "  Host: {}:{}", node.host, node.port);
            let _ = writeln!(out, "  Started: {}", node.started_at);
            if !node.causes.is_empty() {
                out.push_str("  Causes:\n");
                for cause in &node.causes {
                    let _ = writeln!(out, "  - {}", cause.message);
                }
            }
        }
    }
    out.trim().to_string()
}

pub struct SystemInfoTool {
    server_api: Arc<ServerApi>,
}

impl SystemInfoTool {
    pub fn new(server_api: Arc<ServerApi>) -> Self {
        Self { server_api }
    }
}

#[async_trait]
impl Tool for SystemInfoTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            SYSTEM_INFO_TOOL_NAME,
            "Get detailed information about system configuration including JVM state, database, \
             search indexes, and settings. Requires 'Administer' permissions.",
        )
    }

    async fn execute(&self, _args: ToolArgs) -> ToolResultOrError {
        if !self.server_api.is_authentication_set() {
            return Ok(ToolResult::failure(NOT_CONNECTED_MESSAGE));
        }
        let response = self.server_api.system_api().get_info().await?;
        Ok(ToolResult::success(render_info(&response)))
    }
}

fn render_info(response: &InfoResponse) -> String {
    let mut out = String::from("SonarQube Server System Information\n===========================\n\n");
    if let Some(health) = &response.health {
        let _ = write!(out, "Health: {health}\n\n");
    }
    append_section(&mut out, "System", response.system.as_ref());
    append_section(&mut out, "Database", response.database.as_ref());
    append_section(&mut out, "Bundled Plugins", response.bundled.as_ref());
    append_section(&mut out, "Installed Plugins", response.plugins.as_ref());
    append_section(&mut out, "Web JVM State", response.web_jvm_state.as_ref());
    append_section(
        &mut out,
        "Web Database Connection",
        response.web_database_connection.as_ref(),
    );
    append_section(&mut out, "Web Logging", response.web_logging.as_ref());
    append_section(
        &mut out,
        "Compute Engine Tasks",
        response.compute_engine_tasks.as_ref(),
    );
    append_section(
        &mut out,
        "Compute Engine JVM State",
        response.compute_engine_jvm_state.as_ref(),
    );
    append_section(
        &mut out,
        "Compute Engine Database Connection",
        response.compute_engine_database_connection.as_ref(),
    );
    append_section(
        &mut out,
        "Compute Engine Logging",
        response.compute_engine_logging.as_ref(),
    );
    append_section(&mut out, "Search State", response.search_state.as_ref());
    append_section(&mut out, "Search Indexes", response.search_indexes.as_ref());
    append_section(&mut out, "ALMs", response.alms.as_ref());
    append_section(
        &mut out,
        "Server Push Connections",
        response.server_push_connections.as_ref(),
    );
    // The settings section can be huge, only a summary is shown.
    if let Some(settings) = &response.settings {
        if !settings.is_empty() {
            out.push_str("Settings\n--------\n");
            let _ = writeln!(out, "Total settings: {}", settings.len());
            out.push_str("(Use SonarQube Server Web UI to view detailed settings)\n\n");
        }
    }
    out.trim().to_string()
}

fn append_section(out: &mut String, name: &str, section: Option<&InfoSection>) {
    let Some(section) = section else {
        return;
    };
    if section.is_empty() {
        return;
    }
    let _ = writeln!(out, "{name}");
    let _ = writeln!(out, "{}", "-".repeat(name.len()));
    for (key, value) in section {
        let _ = writeln!(out, "- {key}: {}", value_to_string(value));
    }
    out.push('\n');
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub struct SystemLogsTool {
    server_api: Arc<ServerApi>,
}

impl SystemLogsTool {
    pub fn new(server_api: Arc<ServerApi>) -> Self {
        Self { server_api }
    }
}

const VALID_LOG_NAMES: &[&str] = &["access", "app", "ce", "deprecation", "es", "web"];

#[async_trait]
impl Tool for SystemLogsTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            SYSTEM_LOGS_TOOL_NAME,
            "Get system logs in plain-text format. Requires system administration permission.",
        )
        .with_string_property(
            "name",
            "Name of the logs to get. Possible values: access, app, ce, deprecation, es, web. Default: app",
        )
    }

    async fn execute(&self, args: ToolArgs) -> ToolResultOrError {
        let name = args.get_optional_string("name");
        if let Some(name) = &name {
            if !VALID_LOG_NAMES.contains(&name.as_str()) {
                return Ok(ToolResult::failure(
                    "Invalid log name. Possible values: access, app, ce, deprecation, es, web",
                ));
            }
        }
        let logs = self.server_api.system_api().get_logs(name.as_deref()).await?;
        Ok(ToolResult::success(render_logs(&logs, name.as_deref())))
    }
}

fn render_logs(logs: &str, name: Option<&str>) -> String {
    let log_type = name.unwrap_or("app");
    let title = format!("SonarQube Server {} Logs", log_type.to_uppercase());
    let header = format!("{title}\n{}\n\n", "=".repeat(title.len()));
    if logs.trim().is_empty() {
        return format!("{header}No logs available.");
    }
    format!("{header}{logs}")
}

pub struct SystemPingTool {
    server_api: Arc<ServerApi>,
}

impl SystemPingTool {
    pub fn new(server_api: Arc<ServerApi>) -> Self {
        Self { server_api }
    }
}

#[async_trait]
impl Tool for SystemPingTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            SYSTEM_PING_TOOL_NAME,
            "Ping the SonarQube Server system to check if it's alive. Returns 'pong' as plain text.",
        )
    }

    async fn execute(&self, _args: ToolArgs) -> ToolResultOrError {
        let response = self.server_api.system_api().get_ping().await?;
        Ok(ToolResult::success(response.trim()))
    }
}

pub struct SystemStatusTool {
    server_api: Arc<ServerApi>,
}

impl SystemStatusTool {
    pub fn new(server_api: Arc<ServerApi>) -> Self {
        Self { server_api }
    }
}

#[async_trait]
impl Tool for SystemStatusTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            SYSTEM_STATUS_TOOL_NAME,
            "Get state information about SonarQube Server. Returns status (STARTING, UP, DOWN, \
             RESTARTING, DB_MIGRATION_NEEDED, DB_MIGRATION_RUNNING), version, and id.",
        )
    }

    async fn execute(&self, _args: ToolArgs) -> ToolResultOrError {
        let response = self.server_api.system_api().get_status().await?;
        Ok(ToolResult::success(render_status(&response)))
    }
}

fn render_status(response: &StatusResponse) -> String {
    let mut out = String::from("SonarQube Server System Status\n=======================\n\n");
    if let Some(status) = &response.status {
        let _ = writeln!(out, "Status: {status}");
        let _ = write!(out, "Description: {}\n\n", status_description(status));
    }
    if let Some(id) = &response.id {
        let _ = writeln!(out, "ID: {id}");
    }
    if let Some(version) = &response.version {
        let _ = writeln!(out, "Version: {version}");
    }
    out.trim().to_string()
}

fn status_description(status: &str) -> &'static str {
    match status {
        "STARTING" => {
            "SonarQube Server Web Server is up and serving some Web Services \
             but initialization is still ongoing"
        }
        "UP" => "SonarQube Server instance is up and running",
        "DOWN" => {
            "SonarQube Server instance is up but not running because migration \
             has failed or some other reason"
        }
        "RESTARTING" => "SonarQube Server instance is still up but a restart has been requested",
        "DB_MIGRATION_NEEDED" => "Database migration is required",
        "DB_MIGRATION_RUNNING" => "DB migration is running",
        _ => "Unknown status",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::server_api;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_health_with_nodes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/system/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "health": "YELLOW",
                "causes": [{"message": "Elasticsearch status is YELLOW"}],
                "nodes": [{
                    "name": "node-1",
                    "type": "APPLICATION",
                    "host": "192.168.1.1",
                    "port": 999,
                    "startedAt": "2025-01-01T10:00:00+0000",
                    "health": "GREEN",
                    "causes": []
                }]
            })))
            .mount(&server)
            .await;

        let tool = SystemHealthTool::new(server_api(&server.uri(), None, Some("t")));
        let result = tool.execute(ToolArgs::new(serde_json::json!({}))).await.unwrap();
        let text = result.first_text().unwrap();
        assert!(text.starts_with("SonarQube Server Health Status: YELLOW\n"));
        assert!(text.contains("\nCauses:\n- Elasticsearch status is YELLOW\n"));
        assert!(text.contains("\nnode-1 (APPLICATION) - GREEN\n  Host: 192.168.1.1:999\n"));
        assert!(text.ends_with("Started: 2025-01-01T10:00:00+0000"));
    }

    #[tokio::test]
    async fn test_health_gated_without_credentials() {
        let server = MockServer::start().await;
        let tool = SystemHealthTool::new(server_api(&server.uri(), None, None));
        let result = tool.execute(ToolArgs::new(serde_json::json!({}))).await.unwrap();
        assert!(result.is_error);
        assert_eq!(result.first_text(), Some(NOT_CONNECTED_MESSAGE));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_info_renders_sections_and_settings_summary() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/system/info"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "Health": "GREEN",
                "System": {"Version": "2025.1", "High Availability": true},
                "Web JVM State": {"Heap Max (MB)": 512},
                "Settings": {"sonar.core.id": "x", "sonar.forceAuthentication": "true"}
            })))
            .mount(&server)
            .await;

        let tool = SystemInfoTool::new(server_api(&server.uri(), None, Some("t")));
        let result = tool.execute(ToolArgs::new(serde_json::json!({}))).await.unwrap();
        let text = result.first_text().unwrap();
        assert!(text.starts_with("SonarQube Server System Information\n===========================\n\nHealth: GREEN\n\n"));
        assert!(text.contains("System\n------\n"));
        assert!(text.contains("- Version: 2025.1\n"));
        assert!(text.contains("- High Availability: true\n"));
        assert!(text.contains("Web JVM State\n-------------\n- Heap Max (MB): 512\n"));
        assert!(text.ends_with(
            "Settings\n--------\nTotal settings: 2\n(Use SonarQube Server Web UI to view detailed settings)"
        ));
    }

    #[tokio::test]
    async fn test_logs_default_name() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/system/logs"))
            .respond_with(ResponseTemplate::new(200).set_body_string("2025.01.01 INFO app started"))
            .mount(&server)
            .await;

        let tool = SystemLogsTool::new(server_api(&server.uri(), None, Some("t")));
        let result = tool.execute(ToolArgs::new(serde_json::json!({}))).await.unwrap();
        assert_eq!(
            result.first_text(),
            Some(
                "SonarQube Server APP Logs\n=========================\n\n\
                 2025.01.01 INFO app started"
            )
        );
    }

    #[tokio::test]
    async fn test_logs_invalid_name() {
        let server = MockServer::start().await;
        let tool = SystemLogsTool::new(server_api(&server.uri(), None, Some("t")));
        let result = tool
            .execute(ToolArgs::new(serde_json::json!({"name": "nope"})))
            .await
            .unwrap();
        assert!(result.is_error);
        assert_eq!(
            result.first_text(),
            Some("Invalid log name. Possible values: access, app, ce, deprecation, es, web")
        );
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_logs_empty_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/system/logs"))
            .and(query_param("name", "ce"))
            .respond_with(ResponseTemplate::new(200).set_body_string(""))
            .mount(&server)
            .await;

        let tool = SystemLogsTool::new(server_api(&server.uri(), None, Some("t")));
        let result = tool
            .execute(ToolArgs::new(serde_json::json!({"name": "ce"})))
            .await
            .unwrap();
        assert!(result.first_text().unwrap().ends_with("No logs available."));
    }

    #[tokio::test]
    async fn test_ping() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/system/ping"))
            .respond_with(ResponseTemplate::new(200).set_body_string("pong\n"))
            .mount(&server)
            .await;

        let tool = SystemPingTool::new(server_api(&server.uri(), None, Some("t")));
        let result = tool.execute(ToolArgs::new(serde_json::json!({}))).await.unwrap();
        assert_eq!(result.first_text(), Some("pong"));
    }

    #[tokio::test]
    async fn test_status_with_description() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/system/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "20150504120436",
                "version": "2025.1.0.102418",
                "status": "UP"
            })))
            .mount(&server)
            .await;

        let tool = SystemStatusTool::new(server_api(&server.uri(), None, Some("t")));
        let result = tool.execute(ToolArgs::new(serde_json::json!({}))).await.unwrap();
        assert_eq!(
            result.first_text(),
            Some(
                "SonarQube Server System Status\n=======================\n\n\
                 Status: UP\nDescription: SonarQube Server instance is up and running\n\n\
                 ID: 20150504120436\nVersion: 2025.1.0.102418"
            )
        );
    }
}
