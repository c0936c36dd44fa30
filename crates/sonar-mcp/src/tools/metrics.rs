//! Metric catalog search.

use crate::server::{Tool, ToolArgs, ToolResultOrError};
use crate::types::{ToolDefinition, ToolResult};
use async_trait::async_trait;
use sonar_serverapi::api::metrics::MetricsSearchResponse;
use sonar_serverapi::ServerApi;
use std::fmt::Write;
use std::sync::Arc;

pub const TOOL_NAME: &str = "search_metrics";

pub struct SearchMetricsTool {
    server_api: Arc<ServerApi>,
}

impl SearchMetricsTool {
    pub fn new(server_api: Arc<ServerApi>) -> Self {
        Self { server_api }
    }
}

#[async_trait]
impl Tool for SearchMetricsTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(TOOL_NAME, "Search for SonarQube metrics")
            .with_number_property("p", "1-based page number (default: 1)")
            .with_number_property(
                "ps",
                "Page size. Must be greater than 0 and less than or equal to 500 (default: 100)",
            )
    }

    async fn execute(&self, args: ToolArgs) -> ToolResultOrError {
        let page = args.get_optional_int("p");
        let page_size = args.get_optional_int("ps");
        let response = self
            .server_api
            .metrics_api()
            .search_metrics(page, page_size)
            .await?;
        Ok(ToolResult::success(render(&response)))
    }
}

fn render(response: &MetricsSearchResponse) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Search Results: {} total metrics", response.total);
    let _ = writeln!(out, "Page: {} | Page Size: {}", response.p, response.ps);
    out.push('\n');
    if response.metrics.is_empty() {
        out.push_str("No metrics found.");
        return out;
    }
    out.push_str("Metrics:\n");
    for metric in &response.metrics {
        let _ = writeln!(out, "  - {} ({})", metric.name, metric.key);
        let _ = writeln!(out, "    ID: {}", metric.id.as_deref().unwrap_or(""));
        let _ = writeln!(
            out,
            "    Description: {}",
            metric.description.as_deref().unwrap_or("")
        );
        let _ = writeln!(out, "    Domain: {}", metric.domain.as_deref().unwrap_or(""));
        let _ = writeln!(
            out,
            "    Type: {}",
            metric.metric_type.as_deref().unwrap_or("")
        );
        let _ = writeln!(out, "    Direction: {}", direction_description(metric.direction));
        let _ = writeln!(out, "    Qualitative: {}", metric.qualitative);
        let _ = writeln!(out, "    Hidden: {}", metric.hidden);
        let _ = writeln!(out, "    Custom: {}", metric.custom);
        out.push('\n');
    }
    out.trim_end().to_string()
}

fn direction_description(direction: i64) -> String {
    match direction {
        -1 => "-1 (lower values are better)".to_string(),
        0 => "0 (no direction)".to_string(),
        1 => "1 (higher values are better)".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::server_api;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_renders_metric_details() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/metrics/search"))
            .and(query_param("p", "2"))
            .and(query_param("ps", "50"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "metrics": [
                    {"id": "23", "key": "ncloc", "name": "Lines of Code",
                     "description": "Non commenting lines of code", "domain": "Size",
                     "type": "INT", "direction": -1, "qualitative": false,
                     "hidden": false, "custom": false}
                ],
                "total": 120, "p": 2, "ps": 50
            })))
            .mount(&server)
            .await;

        let tool = SearchMetricsTool::new(server_api(&server.uri(), None, Some("t")));
        let result = tool
            .execute(ToolArgs::new(serde_json::json!({"p": 2, "ps": 50})))
            .await
            .unwrap();
        let text = result.first_text().unwrap();
        assert!(text.starts_with("Search Results: 120 total metrics\nPage: 2 | Page Size: 50\n\n"));
        assert!(text.contains("  - Lines of Code (ncloc)"));
        assert!(text.contains("    Direction: -1 (lower values are better)"));
    }

    #[tokio::test]
    async fn test_empty_result() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/metrics/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "metrics": [], "total": 0, "p": 1, "ps": 100
            })))
            .mount(&server)
            .await;

        let tool = SearchMetricsTool::new(server_api(&server.uri(), None, Some("t")));
        let result = tool.execute(ToolArgs::new(serde_json::json!({}))).await.unwrap();
        assert!(result.first_text().unwrap().ends_with("No metrics found."));
    }
}
