//! Request helper binding the transport to a configured endpoint.

use crate::error::ServerApiError;
use crate::http::{HttpClient, Response};

/// Resolved endpoint context, immutable for the process lifetime.
#[derive(Debug, Clone)]
pub struct EndpointParams {
    base_url: String,
    organization: Option<String>,
}

impl EndpointParams {
    pub fn new(base_url: impl Into<String>, organization: Option<String>) -> Self {
        Self {
            base_url: base_url.into(),
            organization,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn organization(&self) -> Option<&str> {
        self.organization.as_deref()
    }
}

/// Executes requests against the configured endpoint and classifies
/// non-2xx answers into [`ServerApiError`] kinds.
#[derive(Debug)]
pub struct ServerApiHelper {
    client: HttpClient,
    endpoint: EndpointParams,
}

impl ServerApiHelper {
    pub fn new(endpoint: EndpointParams, client: HttpClient) -> Self {
        Self { client, endpoint }
    }

    pub fn organization(&self) -> Option<&str> {
        self.endpoint.organization()
    }

    /// Authenticated GET with error classification.
    pub async fn get(&self, path: &str) -> Result<Response, ServerApiError> {
        check_response(self.raw_get(path).await?)
    }

    /// Anonymous GET with error classification.
    pub async fn get_anonymous(&self, path: &str) -> Result<Response, ServerApiError> {
        check_response(self.raw_get_anonymous(path).await?)
    }

    /// Authenticated POST with error classification.
    pub async fn post(
        &self,
        path: &str,
        content_type: &str,
        body: String,
    ) -> Result<Response, ServerApiError> {
        let url = self.endpoint_url(path);
        check_response(self.client.post(&url, content_type, body).await?)
    }

    /// GET without status classification, for availability probes and
    /// binary downloads where the caller inspects the envelope itself.
    pub async fn raw_get(&self, path: &str) -> Result<Response, ServerApiError> {
        self.client.get(&self.endpoint_url(path)).await
    }

    pub async fn raw_get_anonymous(&self, path: &str) -> Result<Response, ServerApiError> {
        self.client.get_anonymous(&self.endpoint_url(path)).await
    }

    /// GET against the API subdomain host, with error classification.
    ///
    /// Some multi-tenant business APIs (enterprises, portfolios) live on
    /// `api.sonarcloud.io` rather than the main host.
    pub async fn get_api_subdomain(&self, path: &str) -> Result<Response, ServerApiError> {
        let url = self.api_subdomain_url(path);
        check_response(self.client.get(&url).await?)
    }

    fn endpoint_url(&self, relative_path: &str) -> String {
        concat(self.endpoint.base_url(), relative_path)
    }

    /// The alternate host is derived from the base URL rather than being a
    /// second configured endpoint. Self-hosted servers have no subdomain
    /// split, so without an organization the base URL is used as-is.
    fn api_subdomain_url(&self, relative_path: &str) -> String {
        if self.endpoint.organization().is_none() {
            return self.endpoint_url(relative_path);
        }
        let base_url = self
            .endpoint
            .base_url()
            .replace("://sonarcloud.io", "://api.sonarcloud.io");
        concat(&base_url, relative_path)
    }
}

/// Join a base URL and a relative path with exactly one `/` between them.
pub fn concat(base_url: &str, relative_path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        relative_path.trim_start_matches('/')
    )
}

fn check_response(response: Response) -> Result<Response, ServerApiError> {
    if response.is_successful() {
        Ok(response)
    } else {
        Err(ServerApiError::from_failed_response(&response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn helper_for(uri: &str, organization: Option<&str>) -> ServerApiHelper {
        ServerApiHelper::new(
            EndpointParams::new(uri, organization.map(str::to_string)),
            HttpClient::new("test-agent", Some("token".to_string())).unwrap(),
        )
    }

    #[test]
    fn test_concat() {
        assert_eq!(concat("https://s", "/api/x"), "https://s/api/x");
        assert_eq!(concat("https://s/", "api/x"), "https://s/api/x");
        assert_eq!(concat("https://s/", "/api/x"), "https://s/api/x");
    }

    #[test]
    fn test_api_subdomain_requires_organization() {
        let helper = helper_for("https://sonarcloud.io", None);
        assert_eq!(
            helper.api_subdomain_url("/enterprises/enterprises"),
            "https://sonarcloud.io/enterprises/enterprises"
        );

        let helper = helper_for("https://sonarcloud.io", Some("my-org"));
        assert_eq!(
            helper.api_subdomain_url("/enterprises/enterprises"),
            "https://api.sonarcloud.io/enterprises/enterprises"
        );
    }

    #[test]
    fn test_api_subdomain_leaves_other_hosts_alone() {
        let helper = helper_for("https://sonar.example.com", Some("my-org"));
        assert_eq!(
            helper.api_subdomain_url("/enterprises/enterprises"),
            "https://sonar.example.com/enterprises/enterprises"
        );
    }

    #[tokio::test]
    async fn test_get_classifies_failures() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/fail"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let helper = helper_for(&server.uri(), None);
        let err = helper.get("/api/fail").await.unwrap_err();
        assert!(matches!(err, ServerApiError::Unauthorized));
    }

    #[tokio::test]
    async fn test_raw_get_skips_classification() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/fail"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let helper = helper_for(&server.uri(), None);
        let response = helper.raw_get("/api/fail").await.unwrap();
        assert_eq!(response.code(), 404);
    }

    #[tokio::test]
    async fn test_get_returns_body_on_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/ok"))
            .respond_with(ResponseTemplate::new(200).set_body_string("body"))
            .mount(&server)
            .await;

        let helper = helper_for(&server.uri(), None);
        let response = helper.get("/api/ok").await.unwrap();
        assert_eq!(response.body_as_string(), "body");
    }
}
