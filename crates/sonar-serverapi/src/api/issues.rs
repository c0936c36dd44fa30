//! Issues search and lifecycle transitions.

use crate::error::ServerApiError;
use crate::helper::ServerApiHelper;
use crate::http::FORM_URL_ENCODED_CONTENT_TYPE;
use crate::paging::Paging;
use crate::url::{url_encode, UrlBuilder};
use serde::Deserialize;
use std::sync::Arc;

pub const SEARCH_PATH: &str = "/api/issues/search";
pub const DO_TRANSITION_PATH: &str = "/api/issues/do_transition";

pub struct IssuesApi {
    helper: Arc<ServerApiHelper>,
}

/// Filters for the issue search endpoint. All fields are optional and
/// omitted from the query when absent.
#[derive(Debug, Default, Clone)]
pub struct IssueSearchParams {
    pub projects: Option<Vec<String>>,
    pub pull_request_id: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

/// Workflow transitions accepted by the issue transition endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueTransition {
    Accept,
    FalsePositive,
    Reopen,
}

impl IssueTransition {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueTransition::Accept => "accept",
            IssueTransition::FalsePositive => "falsepositive",
            IssueTransition::Reopen => "reopen",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "accept" => Some(IssueTransition::Accept),
            "falsepositive" => Some(IssueTransition::FalsePositive),
            "reopen" => Some(IssueTransition::Reopen),
            _ => None,
        }
    }
}

impl IssuesApi {
    pub fn new(helper: Arc<ServerApiHelper>) -> Self {
        Self { helper }
    }

    pub async fn search(
        &self,
        params: IssueSearchParams,
    ) -> Result<IssueSearchResponse, ServerApiError> {
        let url = UrlBuilder::new(SEARCH_PATH)
            .list_param("projects", params.projects.as_deref())
            .param("pullRequest", params.pull_request_id.as_deref())
            .param("organization", self.helper.organization())
            .int_param("p", params.page)
            .int_param("ps", params.page_size)
            .build();
        self.helper.get(&url).await?.json()
    }

    /// Apply a workflow transition to an issue. The response body carries
    /// the updated issue but only success matters here.
    pub async fn do_transition(
        &self,
        issue_key: &str,
        transition: IssueTransition,
    ) -> Result<(), ServerApiError> {
        let body = format!(
            "issue={}&transition={}",
            url_encode(issue_key),
            url_encode(transition.as_str())
        );
        self.helper
            .post(DO_TRANSITION_PATH, FORM_URL_ENCODED_CONTENT_TYPE, body)
            .await?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
pub struct IssueSearchResponse {
    #[serde(default)]
    pub paging: Option<Paging>,
    #[serde(default)]
    pub issues: Vec<Issue>,
}

#[derive(Debug, Deserialize)]
pub struct Issue {
    pub key: String,
    #[serde(default)]
    pub rule: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub component: Option<String>,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(rename = "cleanCodeAttribute", default)]
    pub clean_code_attribute: Option<String>,
    #[serde(rename = "cleanCodeAttributeCategory", default)]
    pub clean_code_attribute_category: Option<String>,
    #[serde(rename = "textRange", default)]
    pub text_range: Option<TextRange>,
    #[serde(rename = "creationDate", default)]
    pub creation_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TextRange {
    #[serde(rename = "startLine", default)]
    pub start_line: Option<i64>,
    #[serde(rename = "endLine", default)]
    pub end_line: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helper::EndpointParams;
    use crate::http::HttpClient;
    use wiremock::matchers::{body_string, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn api_for(uri: &str, organization: Option<&str>) -> IssuesApi {
        let helper = ServerApiHelper::new(
            EndpointParams::new(uri, organization.map(str::to_string)),
            HttpClient::new("test-agent", Some("token".to_string())).unwrap(),
        );
        IssuesApi::new(Arc::new(helper))
    }

    #[tokio::test]
    async fn test_search_builds_query_and_parses() {
        let server = MockServer::start().await;
        let body = serde_json::json!({
            "paging": {"pageIndex": 1, "pageSize": 100, "total": 1},
            "issues": [{
                "key": "AX123",
                "rule": "java:S100",
                "severity": "MAJOR",
                "component": "proj:src/Foo.java",
                "project": "proj",
                "status": "OPEN",
                "message": "Rename this method",
                "textRange": {"startLine": 3, "endLine": 3},
                "creationDate": "2025-01-01T00:00:00+0000"
            }]
        });
        Mock::given(method("GET"))
            .and(path("/api/issues/search"))
            .and(query_param("projects", "proj"))
            .and(query_param("organization", "my-org"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let api = api_for(&server.uri(), Some("my-org"));
        let response = api
            .search(IssueSearchParams {
                projects: Some(vec!["proj".to_string()]),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(response.issues.len(), 1);
        let issue = &response.issues[0];
        assert_eq!(issue.key, "AX123");
        assert_eq!(issue.text_range.as_ref().unwrap().start_line, Some(3));
    }

    #[tokio::test]
    async fn test_do_transition_sends_form_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/issues/do_transition"))
            .and(body_string("issue=AX%3A123&transition=accept"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .expect(1)
            .mount(&server)
            .await;

        let api = api_for(&server.uri(), None);
        api.do_transition("AX:123", IssueTransition::Accept)
            .await
            .unwrap();
    }

    #[test]
    fn test_transition_round_trip() {
        for name in ["accept", "falsepositive", "reopen"] {
            assert_eq!(IssueTransition::from_str(name).unwrap().as_str(), name);
        }
        assert!(IssueTransition::from_str("wontfix").is_none());
    }
}
