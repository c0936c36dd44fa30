//! Listing the projects visible to the configured credentials.

use crate::server::{Tool, ToolArgs, ToolResultOrError};
use crate::tools::append_pagination;
use crate::types::{ToolDefinition, ToolResult};
use async_trait::async_trait;
use sonar_serverapi::{Paging, ServerApi, ServerApiError};
use std::fmt::Write;
use std::sync::Arc;

pub const TOOL_NAME: &str = "search_my_sonarqube_cloud_projects";

const NOT_CONNECTED_MESSAGE: &str =
    "Not connected to SonarQube Cloud, please provide 'SONARQUBE_CLOUD_TOKEN' and 'SONARQUBE_CLOUD_ORG'";

pub struct SearchMyProjectsTool {
    server_api: Arc<ServerApi>,
}

impl SearchMyProjectsTool {
    pub fn new(server_api: Arc<ServerApi>) -> Self {
        Self { server_api }
    }

    async fn fetch(&self, page: i64) -> Result<(Paging, Vec<(String, String)>), ServerApiError> {
        // The two deployment flavors list projects through different
        // endpoints; both reduce to key/name pairs here.
        if self.server_api.is_sonar_qube_cloud() {
            let response = self
                .server_api
                .components_api()
                .search_projects_in_my_org(page)
                .await?;
            let projects = response
                .components
                .into_iter()
                .map(|c| (c.key, c.name))
                .collect();
            Ok((response.paging, projects))
        } else {
            let response = self
                .server_api
                .projects_api()
                .search_my_projects(Some(page))
                .await?;
            let projects = response
                .projects
                .into_iter()
                .map(|p| (p.key, p.name))
                .collect();
            Ok((response.paging, projects))
        }
    }
}

#[async_trait]
impl Tool for SearchMyProjectsTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            TOOL_NAME,
            "Find Sonar projects in my organization. The response is paginated.",
        )
        .with_string_property("page", "An optional page number. Defaults to 1.")
    }

    async fn execute(&self, args: ToolArgs) -> ToolResultOrError {
        if !self.server_api.is_authentication_set() {
            return Ok(ToolResult::failure(NOT_CONNECTED_MESSAGE));
        }
        let page = args.get_int_or_default("page", 1);
        match self.fetch(page).await {
            Ok((paging, projects)) => Ok(ToolResult::success(render(&paging, &projects))),
            Err(ServerApiError::NotFound(_)) => Ok(ToolResult::failure(
                "Failed to fetch all projects: Make sure your token is valid.",
            )),
            Err(e) => Ok(ToolResult::failure(format!(
                "Failed to fetch all projects: {e}"
            ))),
        }
    }
}

fn render(paging: &Paging, projects: &[(String, String)]) -> String {
    if projects.is_empty() {
        return "No projects were found.".to_string();
    }
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Found {} Sonar projects in your organization.",
        projects.len()
    );
    append_pagination(&mut out, paging, "projects");
    for (key, name) in projects {
        let _ = writeln!(out, "Project key: {key} | Project name: {name}");
    }
    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::server_api;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_unauthenticated_makes_no_network_call() {
        let server = MockServer::start().await;
        let tool = SearchMyProjectsTool::new(server_api(&server.uri(), Some("my-org"), None));
        let result = tool.execute(ToolArgs::new(serde_json::json!({}))).await.unwrap();
        assert!(result.is_error);
        assert_eq!(result.first_text(), Some(NOT_CONNECTED_MESSAGE));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cloud_lists_via_components() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/components/search"))
            .and(query_param("organization", "my-org"))
            .and(query_param("p", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "paging": {"pageIndex": 2, "pageSize": 100, "total": 101},
                "components": [
                    {"key": "proj-a", "name": "Project A", "qualifier": "TRK"}
                ]
            })))
            .mount(&server)
            .await;

        let tool = SearchMyProjectsTool::new(server_api(&server.uri(), Some("my-org"), Some("t")));
        let result = tool
            .execute(ToolArgs::new(serde_json::json!({"page": "2"})))
            .await
            .unwrap();
        let text = result.first_text().unwrap();
        assert!(text.starts_with("Found 1 Sonar projects in your organization.\n"));
        assert!(text.contains(
            "This response is paginated and this is the page 2 out of 2 total pages. \
             There is a maximum of 100 projects per page."
        ));
        assert!(text.ends_with("Project key: proj-a | Project name: Project A"));
    }

    #[tokio::test]
    async fn test_server_lists_via_my_projects() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/projects/search_my_projects"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "paging": {"pageIndex": 1, "pageSize": 100, "total": 1},
                "projects": [{"key": "srv", "name": "Server Project"}]
            })))
            .mount(&server)
            .await;

        let tool = SearchMyProjectsTool::new(server_api(&server.uri(), None, Some("t")));
        let result = tool.execute(ToolArgs::new(serde_json::json!({}))).await.unwrap();
        assert!(result
            .first_text()
            .unwrap()
            .contains("Project key: srv | Project name: Server Project"));
    }

    #[tokio::test]
    async fn test_not_found_maps_to_token_hint() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/components/search"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let tool = SearchMyProjectsTool::new(server_api(&server.uri(), Some("my-org"), Some("t")));
        let result = tool.execute(ToolArgs::new(serde_json::json!({}))).await.unwrap();
        assert!(result.is_error);
        assert_eq!(
            result.first_text(),
            Some("Failed to fetch all projects: Make sure your token is valid.")
        );
    }

    #[tokio::test]
    async fn test_empty_page() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/components/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "paging": {"pageIndex": 1, "pageSize": 100, "total": 0},
                "components": []
            })))
            .mount(&server)
            .await;

        let tool = SearchMyProjectsTool::new(server_api(&server.uri(), Some("my-org"), Some("t")));
        let result = tool.execute(ToolArgs::new(serde_json::json!({}))).await.unwrap();
        assert_eq!(result.first_text(), Some("No projects were found."));
    }
}
