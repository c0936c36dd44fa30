//! Software composition analysis (dependency risk) lookups.

use crate::error::ServerApiError;
use crate::helper::ServerApiHelper;
use crate::url::UrlBuilder;
use serde::Deserialize;
use std::sync::Arc;

pub const DEPENDENCY_RISKS_PATH: &str = "/api/v2/sca/issues-releases";

pub struct ScaApi {
    helper: Arc<ServerApiHelper>,
}

impl ScaApi {
    pub fn new(helper: Arc<ServerApiHelper>) -> Self {
        Self { helper }
    }

    pub async fn get_dependency_risks(
        &self,
        project_key: &str,
        branch_key: Option<&str>,
        pull_request_key: Option<&str>,
    ) -> Result<DependencyRisksResponse, ServerApiError> {
        let url = UrlBuilder::new(DEPENDENCY_RISKS_PATH)
            .param("projectKey", Some(project_key))
            .param("branchKey", branch_key)
            .param("pullRequestKey", pull_request_key)
            .build();
        self.helper.get(&url).await?.json()
    }
}

#[derive(Debug, Deserialize)]
pub struct DependencyRisksResponse {
    #[serde(rename = "issuesReleases", default)]
    pub issues_releases: Vec<IssueRelease>,
    #[serde(default)]
    pub page: Option<RiskPage>,
}

#[derive(Debug, Deserialize)]
pub struct IssueRelease {
    pub key: String,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(rename = "type", default)]
    pub risk_type: Option<String>,
    #[serde(default)]
    pub quality: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<String>,
    #[serde(rename = "vulnerabilityId", default)]
    pub vulnerability_id: Option<String>,
    #[serde(rename = "cvssScore", default)]
    pub cvss_score: Option<String>,
    #[serde(default)]
    pub release: Option<Release>,
    #[serde(default)]
    pub assignee: Option<Assignee>,
}

#[derive(Debug, Deserialize)]
pub struct Release {
    #[serde(rename = "packageName", default)]
    pub package_name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(rename = "packageManager", default)]
    pub package_manager: Option<String>,
    #[serde(rename = "newlyIntroduced", default)]
    pub newly_introduced: Option<bool>,
    #[serde(rename = "directSummary", default)]
    pub direct_summary: Option<bool>,
    #[serde(rename = "productionScopeSummary", default)]
    pub production_scope_summary: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct Assignee {
    #[serde(default)]
    pub login: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RiskPage {
    #[serde(rename = "pageIndex")]
    pub page_index: i64,
    #[serde(rename = "pageSize")]
    pub page_size: i64,
    pub total: i64,
}
