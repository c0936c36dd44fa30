//! Software composition analysis (dependency risk) search.

use crate::server::{Tool, ToolArgs, ToolResultOrError};
use crate::types::{ToolDefinition, ToolResult};
use async_trait::async_trait;
use sonar_serverapi::api::sca::{DependencyRisksResponse, IssueRelease, RiskPage};
use sonar_serverapi::ServerApi;
use std::fmt::Write;
use std::sync::Arc;

pub const TOOL_NAME: &str = "search_sonar_dependency_risks";

pub struct SearchDependencyRisksTool {
    server_api: Arc<ServerApi>,
}

impl SearchDependencyRisksTool {
    pub fn new(server_api: Arc<ServerApi>) -> Self {
        Self { server_api }
    }
}

#[async_trait]
impl Tool for SearchDependencyRisksTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            TOOL_NAME,
            "Search for software composition analysis issues (dependency risks) of a SonarQube \
             project, paired with releases that appear in the analyzed project, application, or \
             portfolio.",
        )
        .with_required_string_property("projectKey", "The project key")
        .with_string_property("branchKey", "The branch key")
        .with_string_property("pullRequestKey", "The pull request key")
    }

    async fn execute(&self, args: ToolArgs) -> ToolResultOrError {
        let project_key = args.get_string("projectKey")?;
        let branch_key = args.get_optional_string("branchKey");
        let pull_request_key = args.get_optional_string("pullRequestKey");
        let response = self
            .server_api
            .sca_api()
            .get_dependency_risks(&project_key, branch_key.as_deref(), pull_request_key.as_deref())
            .await?;
        Ok(ToolResult::success(render(&response)))
    }
}

fn render(response: &DependencyRisksResponse) -> String {
    if response.issues_releases.is_empty() {
        return "No dependency risks were found.".to_string();
    }
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Found {} dependency risks.",
        response.issues_releases.len()
    );
    if let Some(page) = &response.page {
        append_pagination(&mut out, page);
    }
    for risk in &response.issues_releases {
        append_risk(&mut out, risk);
    }
    out.trim().to_string()
}

fn append_pagination(out: &mut String, page: &RiskPage) {
    let total_pages = if page.page_size > 0 {
        (page.total + page.page_size - 1) / page.page_size
    } else {
        0
    };
    let _ = writeln!(
        out,
        "This response is paginated and this is the page {} out of {} total pages. \
         There is a maximum of {} items per page.",
        page.page_index, total_pages, page.page_size
    );
}

fn append_risk(out: &mut String, risk: &IssueRelease) {
    let _ = write!(
        out,
        "Issue key: {} | Severity: {} | Type: {} | Quality: {} | Status: {}",
        risk.key,
        risk.severity.as_deref().unwrap_or(""),
        risk.risk_type.as_deref().unwrap_or(""),
        risk.quality.as_deref().unwrap_or(""),
        risk.status.as_deref().unwrap_or("")
    );
    if let Some(vulnerability_id) = &risk.vulnerability_id {
        let _ = write!(out, " | Vulnerability ID: {vulnerability_id}");
    }
    if let Some(cvss_score) = &risk.cvss_score {
        let _ = write!(out, " | CVSS Score: {cvss_score}");
    }
    if let Some(release) = &risk.release {
        let _ = write!(
            out,
            " | Package: {} | Version: {} | Package Manager: {}",
            release.package_name.as_deref().unwrap_or(""),
            release.version.as_deref().unwrap_or(""),
            release.package_manager.as_deref().unwrap_or("")
        );
        if release.newly_introduced == Some(true) {
            out.push_str(" | Newly Introduced: Yes");
        }
        if release.direct_summary == Some(true) {
            out.push_str(" | Direct Dependency: Yes");
        }
        if release.production_scope_summary == Some(true) {
            out.push_str(" | Production Scope: Yes");
        }
    }
    if let Some(assignee) = &risk.assignee {
        let _ = write!(out, " | Assignee: {}", assignee.name.as_deref().unwrap_or(""));
    }
    let _ = writeln!(out, " | Created: {}", risk.created_at.as_deref().unwrap_or(""));
}
