//! Projects of the current user on a self-hosted server.

use crate::error::ServerApiError;
use crate::helper::ServerApiHelper;
use crate::paging::Paging;
use crate::url::UrlBuilder;
use serde::Deserialize;
use std::sync::Arc;

pub const SEARCH_MY_PROJECTS_PATH: &str = "/api/projects/search_my_projects";

pub struct ProjectsApi {
    helper: Arc<ServerApiHelper>,
}

impl ProjectsApi {
    pub fn new(helper: Arc<ServerApiHelper>) -> Self {
        Self { helper }
    }

    pub async fn search_my_projects(
        &self,
        page: Option<i64>,
    ) -> Result<MyProjectsResponse, ServerApiError> {
        let url = UrlBuilder::new(SEARCH_MY_PROJECTS_PATH)
            .int_param("p", page)
            .build();
        self.helper.get(&url).await?.json()
    }
}

#[derive(Debug, Deserialize)]
pub struct MyProjectsResponse {
    pub paging: Paging,
    #[serde(default)]
    pub projects: Vec<MyProject>,
}

#[derive(Debug, Deserialize)]
pub struct MyProject {
    pub key: String,
    pub name: String,
    #[serde(rename = "lastAnalysisDate", default)]
    pub last_analysis_date: Option<String>,
    #[serde(rename = "qualityGate", default)]
    pub quality_gate: Option<String>,
    #[serde(default)]
    pub links: Vec<ProjectLink>,
}

#[derive(Debug, Deserialize)]
pub struct ProjectLink {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub link_type: Option<String>,
    #[serde(default)]
    pub href: Option<String>,
}
