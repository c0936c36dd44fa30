//! Tools backed by the local SonarQube for IDE companion process.

use crate::bridge::{AnalyzeListFilesResponse, BridgeFinding, SonarQubeIdeBridgeClient};
use crate::server::{Tool, ToolArgs, ToolResultOrError};
use crate::types::{ToolDefinition, ToolResult};
use async_trait::async_trait;
use std::fmt::Write;
use std::sync::Arc;
use tracing::info;

pub const ANALYZE_LIST_FILES_TOOL_NAME: &str = "analyze_list_files";
pub const TOGGLE_AUTOMATIC_ANALYSIS_TOOL_NAME: &str = "toggle_automatic_analysis";

const IDE_NOT_AVAILABLE_MESSAGE: &str =
    "SonarQube for IDE is not available. Please ensure SonarQube for IDE is running.";

const MAX_DISPLAYED_ISSUES: usize = 100;

pub struct AnalyzeListFilesTool {
    bridge_client: Arc<SonarQubeIdeBridgeClient>,
}

impl AnalyzeListFilesTool {
    pub fn new(bridge_client: Arc<SonarQubeIdeBridgeClient>) -> Self {
        Self { bridge_client }
    }
}

#[async_trait]
impl Tool for AnalyzeListFilesTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            ANALYZE_LIST_FILES_TOOL_NAME,
            "Analyze files in the current working directory using SonarQube for IDE. This tool \
             connects to a running SonarQube for IDE instance to perform code quality analysis \
             on a list of files.",
        )
        .with_array_property("list_files", "string", "List of absolute file paths to analyze")
    }

    async fn execute(&self, args: ToolArgs) -> ToolResultOrError {
        if !self.bridge_client.is_available().await {
            return Ok(ToolResult::failure(IDE_NOT_AVAILABLE_MESSAGE));
        }
        let list_files = args.get_optional_string_list("list_files");
        let Some(list_files) = list_files.filter(|files| !files.is_empty()) else {
            return Ok(ToolResult::failure(
                "No files provided to analyze. Please provide a list of file paths using the \
                 'list_files' property.",
            ));
        };
        info!("Starting SonarQube for IDE analysis");
        let Some(results) = self.bridge_client.request_analyze_list_files(list_files).await else {
            return Ok(ToolResult::failure(
                "Failed to request analysis of the list of files. Check logs for details.",
            ));
        };
        Ok(ToolResult::success(render_analysis_results(&results)))
    }
}

fn render_analysis_results(results: &AnalyzeListFilesResponse) -> String {
    let mut out = String::from("SonarQube for IDE Analysis Completed!\n\nAnalysis Summary:\n");
    if results.findings.is_empty() {
        out.push_str("No findings found! Your code looks good.\n\n");
    } else {
        let _ = writeln!(out, "Issues Found ({}):", results.findings.len());
        for (i, finding) in results.findings.iter().take(MAX_DISPLAYED_ISSUES).enumerate() {
            let _ = writeln!(out, "  {}. {}", i + 1, render_finding(finding));
        }
        if results.findings.len() > MAX_DISPLAYED_ISSUES {
            let _ = writeln!(
                out,
                "  ... and {} more issues",
                results.findings.len() - MAX_DISPLAYED_ISSUES
            );
        }
    }
    out.push_str("Next Steps:\n");
    out.push_str("Check SonarQube for IDE - issues are now displayed in your extension\n");
    out.push_str("Ask the agent to fix the issues.");
    out
}

fn render_finding(finding: &BridgeFinding) -> String {
    let severity = finding.severity.as_deref().unwrap_or("");
    let message = finding.message.as_deref().unwrap_or("");
    let file_path = finding.file_path.as_deref().unwrap_or("");
    match &finding.text_range {
        Some(range) => format!(
            "[{severity}] {message} (file: {file_path} [Lines: {} to {}])",
            range.start_line.unwrap_or(0),
            range.end_line.unwrap_or(0)
        ),
        None => format!("[{severity}] {message} (file: {file_path})"),
    }
}

pub struct ToggleAutomaticAnalysisTool {
    bridge_client: Arc<SonarQubeIdeBridgeClient>,
}

impl ToggleAutomaticAnalysisTool {
    pub fn new(bridge_client: Arc<SonarQubeIdeBridgeClient>) -> Self {
        Self { bridge_client }
    }
}

#[async_trait]
impl Tool for ToggleAutomaticAnalysisTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            TOGGLE_AUTOMATIC_ANALYSIS_TOOL_NAME,
            "Enable or disable SonarQube for IDE automatic analysis. When enabled, SonarQube for \
             IDE will automatically analyze files as they are modified in the working directory. \
             When disabled, automatic analysis is turned off.",
        )
        .with_bool_property("enabled", "Enable or disable the automatic analysis")
    }

    async fn execute(&self, args: ToolArgs) -> ToolResultOrError {
        if !self.bridge_client.is_available().await {
            return Ok(ToolResult::failure(IDE_NOT_AVAILABLE_MESSAGE));
        }
        let enabled = args.get_bool("enabled")?;
        let response = self
            .bridge_client
            .request_automatic_analysis_enablement(enabled)
            .await;
        if !response.is_successful {
            let message = response.error_message.unwrap_or_else(|| {
                "Failed to toggle automatic analysis. Check logs for details.".to_string()
            });
            return Ok(ToolResult::failure(message));
        }
        Ok(ToolResult::success(format!(
            "Successfully toggled automatic analysis to {enabled}."
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sonar_serverapi::HttpClient;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn bridge_for(server: &MockServer) -> Arc<SonarQubeIdeBridgeClient> {
        let port = server.address().port();
        Arc::new(SonarQubeIdeBridgeClient::new(
            HttpClient::without_token("test-agent").unwrap(),
            port,
        ))
    }

    async fn mock_status(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/sonarlint/api/status"))
            .respond_with(ResponseTemplate::new(200))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_analyze_unavailable_bridge() {
        let server = MockServer::start().await;
        let tool = AnalyzeListFilesTool::new(bridge_for(&server));
        let result = tool
            .execute(ToolArgs::new(serde_json::json!({"list_files": ["/a.rs"]})))
            .await
            .unwrap();
        assert!(result.is_error);
        assert_eq!(result.first_text(), Some(IDE_NOT_AVAILABLE_MESSAGE));
    }

    #[tokio::test]
    async fn test_analyze_requires_files() {
        let server = MockServer::start().await;
        mock_status(&server).await;
        let tool = AnalyzeListFilesTool::new(bridge_for(&server));
        let result = tool.execute(ToolArgs::new(serde_json::json!({}))).await.unwrap();
        assert!(result.is_error);
        assert_eq!(
            result.first_text(),
            Some(
                "No files provided to analyze. Please provide a list of file paths using the \
                 'list_files' property."
            )
        );
    }

    #[tokio::test]
    async fn test_analyze_renders_findings() {
        let server = MockServer::start().await;
        mock_status(&server).await;
        Mock::given(method("POST"))
            .and(path("/sonarlint/api/analysis/files"))
            .and(body_json(serde_json::json!({
                "fileAbsolutePaths": ["/work/src/main.rs"]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "findings": [
                    {"ruleKey": "rust:S1000", "message": "Fix this", "severity": "MAJOR",
                     "filePath": "/work/src/main.rs",
                     "textRange": {"startLine": 3, "endLine": 5}},
                    {"ruleKey": "rust:S2000", "message": "And this", "severity": "MINOR",
                     "filePath": "/work/src/lib.rs"}
                ]
            })))
            .mount(&server)
            .await;

        let tool = AnalyzeListFilesTool::new(bridge_for(&server));
        let result = tool
            .execute(ToolArgs::new(
                serde_json::json!({"list_files": ["/work/src/main.rs"]}),
            ))
            .await
            .unwrap();
        let text = result.first_text().unwrap();
        assert!(text.starts_with("SonarQube for IDE Analysis Completed!\n\nAnalysis Summary:\n"));
        assert!(text.contains("Issues Found (2):\n"));
        assert!(text.contains("  1. [MAJOR] Fix this (file: /work/src/main.rs [Lines: 3 to 5])\n"));
        assert!(text.contains("  2. [MINOR] And this (file: /work/src/lib.rs)\n"));
        assert!(text.ends_with(
            "Next Steps:\nCheck SonarQube for IDE - issues are now displayed in your extension\n\
             Ask the agent to fix the issues."
        ));
    }

    #[tokio::test]
    async fn test_analyze_no_findings() {
        let server = MockServer::start().await;
        mock_status(&server).await;
        Mock::given(method("POST"))
            .and(path("/sonarlint/api/analysis/files"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"findings": []})),
            )
            .mount(&server)
            .await;

        let tool = AnalyzeListFilesTool::new(bridge_for(&server));
        let result = tool
            .execute(ToolArgs::new(serde_json::json!({"list_files": ["/a.rs"]})))
            .await
            .unwrap();
        assert!(result
            .first_text()
            .unwrap()
            .contains("No findings found! Your code looks good.\n\n"));
    }

    #[tokio::test]
    async fn test_toggle_success() {
        let server = MockServer::start().await;
        mock_status(&server).await;
        Mock::given(method("POST"))
            .and(path("/sonarlint/api/analysis/automatic/config"))
            .and(query_param("enabled", "false"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let tool = ToggleAutomaticAnalysisTool::new(bridge_for(&server));
        let result = tool
            .execute(ToolArgs::new(serde_json::json!({"enabled": false})))
            .await
            .unwrap();
        assert!(!result.is_error);
        assert_eq!(
            result.first_text(),
            Some("Successfully toggled automatic analysis to false.")
        );
    }

    #[tokio::test]
    async fn test_toggle_failure_uses_fallback_message() {
        let server = MockServer::start().await;
        mock_status(&server).await;
        Mock::given(method("POST"))
            .and(path("/sonarlint/api/analysis/automatic/config"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let tool = ToggleAutomaticAnalysisTool::new(bridge_for(&server));
        let result = tool
            .execute(ToolArgs::new(serde_json::json!({"enabled": true})))
            .await
            .unwrap();
        assert!(result.is_error);
        assert_eq!(
            result.first_text(),
            Some("Failed to toggle automatic analysis. Check logs for details.")
        );
    }
}
