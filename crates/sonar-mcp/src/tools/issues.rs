//! Issue search and status transitions.

use crate::server::{Tool, ToolArgs, ToolResultOrError};
use crate::types::{ToolDefinition, ToolResult};
use async_trait::async_trait;
use sonar_serverapi::api::issues::{Issue, IssueSearchParams, IssueTransition};
use sonar_serverapi::ServerApi;
use std::fmt::Write;
use std::sync::Arc;

pub const SEARCH_ISSUES_TOOL_NAME: &str = "search_sonar_issues_in_projects";
pub const CHANGE_ISSUE_STATUS_TOOL_NAME: &str = "change_sonar_issue_status";

pub struct SearchIssuesTool {
    server_api: Arc<ServerApi>,
}

impl SearchIssuesTool {
    pub fn new(server_api: Arc<ServerApi>) -> Self {
        Self { server_api }
    }
}

#[async_trait]
impl Tool for SearchIssuesTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            SEARCH_ISSUES_TOOL_NAME,
            "Search for Sonar issues in my organization's projects.",
        )
        .with_array_property(
            "projects",
            "string",
            "An optional list of Sonar projects to look in",
        )
        .with_string_property(
            "pullRequestId",
            "The identifier of the Pull Request to look in",
        )
    }

    async fn execute(&self, args: ToolArgs) -> ToolResultOrError {
        let params = IssueSearchParams {
            projects: args.get_optional_string_list("projects"),
            pull_request_id: args.get_optional_string("pullRequestId"),
            ..IssueSearchParams::default()
        };
        let response = self.server_api.issues_api().search(params).await?;
        Ok(ToolResult::success(render_issues(&response.issues)))
    }
}

fn render_issues(issues: &[Issue]) -> String {
    if issues.is_empty() {
        return "No issues were found.".to_string();
    }
    let mut out = String::new();
    let _ = writeln!(out, "Found {} issues.", issues.len());
    for issue in issues {
        let _ = write!(
            out,
            "Issue key: {} | Rule: {} | Project: {} | Component: {} | Severity: {} \
             | Status: {} | Message: {} | Attribute: {} | Category: {} | Author: {}",
            issue.key,
            issue.rule.as_deref().unwrap_or(""),
            issue.project.as_deref().unwrap_or(""),
            issue.component.as_deref().unwrap_or(""),
            issue.severity.as_deref().unwrap_or(""),
            issue.status.as_deref().unwrap_or(""),
            issue.message.as_deref().unwrap_or(""),
            issue.clean_code_attribute.as_deref().unwrap_or(""),
            issue.clean_code_attribute_category.as_deref().unwrap_or(""),
            issue.author.as_deref().unwrap_or(""),
        );
        if let Some(range) = &issue.text_range {
            let _ = write!(
                out,
                " | Start Line: {} | End Line: {}",
                range.start_line.unwrap_or(0),
                range.end_line.unwrap_or(0)
            );
        }
        if let Some(created) = &issue.creation_date {
            let _ = write!(out, " | Created: {created}");
        }
        out.push('\n');
    }
    out.trim_end().to_string()
}

pub struct ChangeIssueStatusTool {
    server_api: Arc<ServerApi>,
}

impl ChangeIssueStatusTool {
    pub fn new(server_api: Arc<ServerApi>) -> Self {
        Self { server_api }
    }
}

#[async_trait]
impl Tool for ChangeIssueStatusTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            CHANGE_ISSUE_STATUS_TOOL_NAME,
            "Change the status of a Sonar issue. This tool can be used to change the status \
             of an issue to \"accept\", \"falsepositive\" or to \"reopen\" an issue.",
        )
        .with_required_string_property("key", "The key of the issue which status should be changed")
        .with_required_enum_property(
            "status",
            &["accept", "falsepositive", "reopen"],
            "The new status of the issue",
        )
    }

    async fn execute(&self, args: ToolArgs) -> ToolResultOrError {
        let key = args.get_string("key")?;
        let statuses = args.get_string_list("status")?;
        let Some(status) = statuses.first() else {
            return Ok(ToolResult::failure("Status is unknown: "));
        };
        let Some(transition) = IssueTransition::from_str(status) else {
            return Ok(ToolResult::failure(format!("Status is unknown: {status}")));
        };
        match self.server_api.issues_api().do_transition(&key, transition).await {
            Ok(()) => Ok(ToolResult::success(
                "The issue status was successfully changed.",
            )),
            Err(e) => Ok(ToolResult::failure(format!(
                "Failed to change the issue status: {e}"
            ))),
        }
    }
}
