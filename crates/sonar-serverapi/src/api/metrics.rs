//! Metrics catalog search.

use crate::error::ServerApiError;
use crate::helper::ServerApiHelper;
use crate::url::UrlBuilder;
use serde::Deserialize;
use std::sync::Arc;

pub const SEARCH_PATH: &str = "/api/metrics/search";

pub struct MetricsApi {
    helper: Arc<ServerApiHelper>,
}

impl MetricsApi {
    pub fn new(helper: Arc<ServerApiHelper>) -> Self {
        Self { helper }
    }

    pub async fn search_metrics(
        &self,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> Result<MetricsSearchResponse, ServerApiError> {
        let url = UrlBuilder::new(SEARCH_PATH)
            .int_param("p", page)
            .int_param("ps", page_size)
            .build();
        self.helper.get(&url).await?.json()
    }
}

#[derive(Debug, Deserialize)]
pub struct MetricsSearchResponse {
    #[serde(default)]
    pub metrics: Vec<Metric>,
    #[serde(default)]
    pub total: i64,
    #[serde(default)]
    pub p: i64,
    #[serde(default)]
    pub ps: i64,
}

#[derive(Debug, Deserialize)]
pub struct Metric {
    #[serde(default)]
    pub id: Option<String>,
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(rename = "type", default)]
    pub metric_type: Option<String>,
    /// -1 lower is better, 1 higher is better, 0 no direction.
    #[serde(default)]
    pub direction: i64,
    #[serde(default)]
    pub qualitative: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub custom: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helper::EndpointParams;
    use crate::http::HttpClient;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_search_metrics_pagination_params() {
        let server = MockServer::start().await;
        let body = serde_json::json!({
            "metrics": [{
                "id": "23",
                "key": "ncloc",
                "name": "Lines of Code",
                "description": "Non commenting lines of code",
                "domain": "Size",
                "type": "INT",
                "direction": -1,
                "qualitative": false,
                "hidden": false,
                "custom": false
            }],
            "total": 1,
            "p": 2,
            "ps": 50
        });
        Mock::given(method("GET"))
            .and(path("/api/metrics/search"))
            .and(query_param("p", "2"))
            .and(query_param("ps", "50"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let helper = ServerApiHelper::new(
            EndpointParams::new(server.uri(), None),
            HttpClient::new("test-agent", Some("token".to_string())).unwrap(),
        );
        let api = MetricsApi::new(Arc::new(helper));
        let response = api.search_metrics(Some(2), Some(50)).await.unwrap();
        assert_eq!(response.total, 1);
        assert_eq!(response.metrics[0].direction, -1);
    }
}
