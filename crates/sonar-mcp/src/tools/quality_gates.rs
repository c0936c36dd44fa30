//! Quality gate listing and project gate status.

use crate::server::{Tool, ToolArgs, ToolResultOrError};
use crate::types::{ToolDefinition, ToolResult};
use async_trait::async_trait;
use sonar_serverapi::api::quality_gates::{ProjectStatusResponse, QualityGate, QualityGateListResponse};
use sonar_serverapi::ServerApi;
use std::fmt::Write;
use std::sync::Arc;

pub const LIST_QUALITY_GATES_TOOL_NAME: &str = "list_quality_gates";
pub const PROJECT_STATUS_TOOL_NAME: &str = "get_project_quality_gate_status";

pub struct ListQualityGatesTool {
    server_api: Arc<ServerApi>,
}

impl ListQualityGatesTool {
    pub fn new(server_api: Arc<ServerApi>) -> Self {
        Self { server_api }
    }
}

#[async_trait]
impl Tool for ListQualityGatesTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(LIST_QUALITY_GATES_TOOL_NAME, "List all quality gates in my SonarQube.")
    }

    async fn execute(&self, _args: ToolArgs) -> ToolResultOrError {
        let response = self.server_api.quality_gates_api().list().await?;
        Ok(ToolResult::success(render_list(&response)))
    }
}

fn render_list(response: &QualityGateListResponse) -> String {
    let mut out = String::from("Quality Gates:\n");
    for gate in &response.qualitygates {
        let _ = write!(out, "\n{}", gate.name.as_deref().unwrap_or("Unnamed"));
        if gate.is_default {
            out.push_str(" [Default]");
        }
        if gate.is_built_in {
            out.push_str(" [Built-in]");
        }
        if let Some(id) = gate.id {
            let _ = write!(out, " (ID: {id})");
        }
        out.push('\n');
        append_conditions(&mut out, gate);
        append_cloud_fields(&mut out, gate);
    }
    out.trim().to_string()
}

fn append_conditions(out: &mut String, gate: &QualityGate) {
    let Some(conditions) = &gate.conditions else {
        return;
    };
    if conditions.is_empty() {
        out.push_str("No conditions\n");
        return;
    }
    out.push_str("Conditions:\n");
    for condition in conditions {
        let _ = writeln!(
            out,
            "- {} {} {}",
            condition.metric,
            condition.op.as_deref().unwrap_or(""),
            condition.error.as_deref().unwrap_or("")
        );
    }
}

fn append_cloud_fields(out: &mut String, gate: &QualityGate) {
    if let Some(cayc_status) = &gate.cayc_status {
        let _ = writeln!(out, "Status: {cayc_status}");
    }
    if let Some(standard) = gate.has_standard_conditions {
        let _ = writeln!(out, "Standard Conditions: {standard}");
    }
    if let Some(mqr) = gate.has_mqr_conditions {
        let _ = writeln!(out, "MQR Conditions: {mqr}");
    }
    if let Some(ai) = gate.is_ai_code_supported {
        let _ = writeln!(out, "AI Code Supported: {ai}");
    }
}

pub struct ProjectStatusTool {
    server_api: Arc<ServerApi>,
}

impl ProjectStatusTool {
    pub fn new(server_api: Arc<ServerApi>) -> Self {
        Self { server_api }
    }
}

#[async_trait]
impl Tool for ProjectStatusTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            PROJECT_STATUS_TOOL_NAME,
            "Get the Quality Gate Status for the project. Either 'analysisId', 'projectId' or \
             'projectKey' must be provided.",
        )
        .with_string_property(
            "analysisId",
            "The optional analysis ID to get the status for, for example 'AU-TpxcA-iU5OvuD2FL1'",
        )
        .with_string_property(
            "branch",
            "The optional branch key to get the status for, for example 'feature/my_branch'",
        )
        .with_string_property(
            "projectId",
            "The optional project ID to get the status for, for example 'AU-Tpxb--iU5OvuD2FLy'. \
             Doesn't work with branches or pull requests.",
        )
        .with_string_property(
            "projectKey",
            "The optional project key to get the status for, for example 'my_project'",
        )
        .with_string_property(
            "pullRequest",
            "The optional pull request ID to get the status for, for example '5461'",
        )
    }

    async fn execute(&self, args: ToolArgs) -> ToolResultOrError {
        if !self.server_api.is_authentication_set() {
            return Ok(ToolResult::failure(
                "Not connected to SonarQube, please provide valid credentials",
            ));
        }
        let analysis_id = args.get_optional_string("analysisId");
        let branch = args.get_optional_string("branch");
        let project_id = args.get_optional_string("projectId");
        let project_key = args.get_optional_string("projectKey");
        let pull_request = args.get_optional_string("pullRequest");
        if analysis_id.is_none() && project_id.is_none() && project_key.is_none() {
            return Ok(ToolResult::failure(
                "Either 'analysisId', 'projectId' or 'projectKey' must be provided",
            ));
        }
        if project_id.is_some() && (branch.is_some() || pull_request.is_some()) {
            return Ok(ToolResult::failure(
                "Project ID doesn't work with branches or pull requests",
            ));
        }
        let response = self
            .server_api
            .quality_gates_api()
            .get_project_quality_gate_status(
                analysis_id.as_deref(),
                branch.as_deref(),
                project_id.as_deref(),
                project_key.as_deref(),
                pull_request.as_deref(),
            )
            .await?;
        Ok(ToolResult::success(render_project_status(&response)))
    }
}

fn render_project_status(response: &ProjectStatusResponse) -> String {
    let status = &response.project_status;
    let mut out = format!(
        "The Quality Gate status is {}. Here are the following conditions:\n",
        status.status
    );
    for condition in &status.conditions {
        let _ = writeln!(
            out,
            "{} is {}, the threshold is {} and the actual value is {}",
            condition.metric_key,
            condition.status,
            condition.error_threshold.as_deref().unwrap_or(""),
            condition.actual_value.as_deref().unwrap_or("")
        );
    }
    out.trim().to_string()
}
