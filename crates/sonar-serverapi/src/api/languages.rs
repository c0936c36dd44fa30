//! Supported languages listing.

use crate::error::ServerApiError;
use crate::helper::ServerApiHelper;
use crate::url::UrlBuilder;
use serde::Deserialize;
use std::sync::Arc;

pub const LIST_PATH: &str = "/api/languages/list";

pub struct LanguagesApi {
    helper: Arc<ServerApiHelper>,
}

impl LanguagesApi {
    pub fn new(helper: Arc<ServerApiHelper>) -> Self {
        Self { helper }
    }

    pub async fn list(&self, query: Option<&str>) -> Result<LanguageListResponse, ServerApiError> {
        let url = UrlBuilder::new(LIST_PATH).param("q", query).build();
        self.helper.get(&url).await?.json()
    }
}

#[derive(Debug, Deserialize)]
pub struct LanguageListResponse {
    #[serde(default)]
    pub languages: Vec<Language>,
}

#[derive(Debug, Deserialize)]
pub struct Language {
    pub key: String,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helper::EndpointParams;
    use crate::http::HttpClient;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_list_with_query() {
        let server = MockServer::start().await;
        let body = serde_json::json!({
            "languages": [
                {"key": "java", "name": "Java"},
                {"key": "js", "name": "JavaScript"}
            ]
        });
        Mock::given(method("GET"))
            .and(path("/api/languages/list"))
            .and(query_param("q", "ja"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let helper = ServerApiHelper::new(
            EndpointParams::new(server.uri(), None),
            HttpClient::new("test-agent", Some("token".to_string())).unwrap(),
        );
        let api = LanguagesApi::new(Arc::new(helper));
        let response = api.list(Some("ja")).await.unwrap();
        assert_eq!(response.languages.len(), 2);
        assert_eq!(response.languages[0].name, "Java");
    }
}
