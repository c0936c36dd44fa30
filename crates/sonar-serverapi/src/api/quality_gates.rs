//! Quality gates listing and project quality gate status.

use crate::error::ServerApiError;
use crate::helper::ServerApiHelper;
use crate::url::UrlBuilder;
use serde::Deserialize;
use std::sync::Arc;

pub const LIST_PATH: &str = "/api/qualitygates/list";
pub const PROJECT_STATUS_PATH: &str = "/api/qualitygates/project_status";

pub struct QualityGatesApi {
    helper: Arc<ServerApiHelper>,
}

impl QualityGatesApi {
    pub fn new(helper: Arc<ServerApiHelper>) -> Self {
        Self { helper }
    }

    pub async fn list(&self) -> Result<QualityGateListResponse, ServerApiError> {
        let url = UrlBuilder::new(LIST_PATH)
            .param("organization", self.helper.organization())
            .build();
        self.helper.get(&url).await?.json()
    }

    pub async fn get_project_quality_gate_status(
        &self,
        analysis_id: Option<&str>,
        branch_key: Option<&str>,
        project_id: Option<&str>,
        project_key: Option<&str>,
        pull_request: Option<&str>,
    ) -> Result<ProjectStatusResponse, ServerApiError> {
        let url = UrlBuilder::new(PROJECT_STATUS_PATH)
            .param("analysisId", analysis_id)
            .param("branchKey", branch_key)
            .param("projectId", project_id)
            .param("projectKey", project_key)
            .param("pullRequest", pull_request)
            .build();
        self.helper.get(&url).await?.json()
    }
}

#[derive(Debug, Deserialize)]
pub struct QualityGateListResponse {
    #[serde(default)]
    pub qualitygates: Vec<QualityGate>,
}

/// One quality gate. The self-hosted and multi-tenant deployments return
/// different extra fields; all of them are optional here and the tool
/// renders whichever are present.
#[derive(Debug, Deserialize)]
pub struct QualityGate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "isDefault", default)]
    pub is_default: bool,
    #[serde(rename = "isBuiltIn", default)]
    pub is_built_in: bool,
    // Self-hosted only
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub conditions: Option<Vec<GateCondition>>,
    // Multi-tenant only
    #[serde(rename = "caycStatus", default)]
    pub cayc_status: Option<String>,
    #[serde(rename = "hasStandardConditions", default)]
    pub has_standard_conditions: Option<bool>,
    #[serde(rename = "hasMQRConditions", default)]
    pub has_mqr_conditions: Option<bool>,
    #[serde(rename = "isAiCodeSupported", default)]
    pub is_ai_code_supported: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct GateCondition {
    #[serde(default)]
    pub id: Option<i64>,
    pub metric: String,
    #[serde(default)]
    pub op: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProjectStatusResponse {
    #[serde(rename = "projectStatus")]
    pub project_status: ProjectStatus,
}

#[derive(Debug, Deserialize)]
pub struct ProjectStatus {
    pub status: String,
    #[serde(rename = "ignoredConditions", default)]
    pub ignored_conditions: bool,
    #[serde(default)]
    pub conditions: Vec<StatusCondition>,
}

#[derive(Debug, Deserialize)]
pub struct StatusCondition {
    pub status: String,
    #[serde(rename = "metricKey")]
    pub metric_key: String,
    #[serde(default)]
    pub comparator: Option<String>,
    #[serde(rename = "periodIndex", default)]
    pub period_index: Option<i64>,
    #[serde(rename = "errorThreshold", default)]
    pub error_threshold: Option<String>,
    #[serde(rename = "actualValue", default)]
    pub actual_value: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helper::EndpointParams;
    use crate::http::HttpClient;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn api_for(uri: &str) -> QualityGatesApi {
        let helper = ServerApiHelper::new(
            EndpointParams::new(uri, None),
            HttpClient::new("test-agent", Some("token".to_string())).unwrap(),
        );
        QualityGatesApi::new(Arc::new(helper))
    }

    #[tokio::test]
    async fn test_list_parses_both_flavors() {
        let server = MockServer::start().await;
        let body = serde_json::json!({
            "qualitygates": [
                {
                    "id": 1,
                    "name": "Sonar way",
                    "isDefault": true,
                    "isBuiltIn": true,
                    "conditions": [{"id": 3, "metric": "coverage", "op": "LT", "error": "80"}]
                },
                {
                    "name": "Cloud gate",
                    "isDefault": false,
                    "isBuiltIn": false,
                    "caycStatus": "compliant",
                    "hasStandardConditions": false,
                    "hasMQRConditions": true,
                    "isAiCodeSupported": false
                }
            ]
        });
        Mock::given(method("GET"))
            .and(path("/api/qualitygates/list"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let response = api_for(&server.uri()).list().await.unwrap();
        assert_eq!(response.qualitygates.len(), 2);
        assert_eq!(response.qualitygates[0].id, Some(1));
        assert_eq!(
            response.qualitygates[1].cayc_status.as_deref(),
            Some("compliant")
        );
    }

    #[tokio::test]
    async fn test_project_status_query() {
        let server = MockServer::start().await;
        let body = serde_json::json!({
            "projectStatus": {
                "status": "ERROR",
                "ignoredConditions": false,
                "conditions": [{
                    "status": "ERROR",
                    "metricKey": "new_coverage",
                    "comparator": "LT",
                    "errorThreshold": "85",
                    "actualValue": "82.5"
                }]
            }
        });
        Mock::given(method("GET"))
            .and(path("/api/qualitygates/project_status"))
            .and(query_param("projectKey", "my_project"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let response = api_for(&server.uri())
            .get_project_quality_gate_status(None, None, None, Some("my_project"), None)
            .await
            .unwrap();
        assert_eq!(response.project_status.status, "ERROR");
        assert_eq!(response.project_status.conditions[0].metric_key, "new_coverage");
    }
}
