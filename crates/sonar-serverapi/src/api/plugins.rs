//! Installed analyzer plugins and plugin downloads.

use crate::error::ServerApiError;
use crate::helper::ServerApiHelper;
use crate::http::Response;
use crate::url::UrlBuilder;
use serde::Deserialize;
use std::sync::Arc;

pub const INSTALLED_PLUGINS_PATH: &str = "/api/plugins/installed";
pub const DOWNLOAD_PLUGINS_PATH: &str = "/api/plugins/download";

pub struct PluginsApi {
    helper: Arc<ServerApiHelper>,
}

impl PluginsApi {
    pub fn new(helper: Arc<ServerApiHelper>) -> Self {
        Self { helper }
    }

    pub async fn get_installed(&self) -> Result<InstalledPluginsResponse, ServerApiError> {
        self.helper.get(INSTALLED_PLUGINS_PATH).await?.json()
    }

    /// Download a plugin jar. The raw envelope is returned so the caller
    /// can stream the body to disk and decide how to treat failures.
    pub async fn download_plugin(&self, plugin_key: &str) -> Result<Response, ServerApiError> {
        let url = UrlBuilder::new(DOWNLOAD_PLUGINS_PATH)
            .param("plugin", Some(plugin_key))
            .build();
        self.helper.raw_get(&url).await
    }
}

#[derive(Debug, Deserialize)]
pub struct InstalledPluginsResponse {
    #[serde(default)]
    pub plugins: Vec<InstalledPlugin>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InstalledPlugin {
    pub key: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(rename = "sonarLintSupported", default)]
    pub sonarlint_supported: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helper::EndpointParams;
    use crate::http::HttpClient;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn api_for(uri: &str) -> PluginsApi {
        let helper = ServerApiHelper::new(
            EndpointParams::new(uri, None),
            HttpClient::new("test-agent", Some("token".to_string())).unwrap(),
        );
        PluginsApi::new(Arc::new(helper))
    }

    #[tokio::test]
    async fn test_get_installed() {
        let server = MockServer::start().await;
        let body = serde_json::json!({
            "plugins": [
                {"key": "java", "name": "Java Code Quality and Security",
                 "filename": "sonar-java-plugin-8.9.jar", "sonarLintSupported": true},
                {"key": "scmgit", "filename": "sonar-scm-git-plugin-1.0.jar",
                 "sonarLintSupported": false}
            ]
        });
        Mock::given(method("GET"))
            .and(path("/api/plugins/installed"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let response = api_for(&server.uri()).get_installed().await.unwrap();
        assert_eq!(response.plugins.len(), 2);
        assert!(response.plugins[0].sonarlint_supported);
        assert!(!response.plugins[1].sonarlint_supported);
    }

    #[tokio::test]
    async fn test_download_returns_raw_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/plugins/download"))
            .and(query_param("plugin", "java"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0x50, 0x4b, 0x03, 0x04]))
            .mount(&server)
            .await;

        let response = api_for(&server.uri()).download_plugin("java").await.unwrap();
        assert!(response.is_successful());
        assert_eq!(response.into_body(), vec![0x50, 0x4b, 0x03, 0x04]);
    }
}
