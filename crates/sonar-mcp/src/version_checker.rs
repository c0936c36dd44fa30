//! Startup gate on the minimal supported server version.

use sonar_serverapi::{ServerApi, Version};
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

const MIN_SUPPORTED_VERSION: &str = "10.9";
const SCA_ENABLED_SETTING: &str = "sonar.sca.enabled";

#[derive(Debug, Error)]
pub enum VersionCheckError {
    #[error("SonarQube server version is not supported, minimal version is SQS 2025.1 or SQCB 25.1")]
    UnsupportedVersion,

    #[error("Could not fetch the SonarQube server version: {0}")]
    Unavailable(String),
}

pub struct SonarQubeVersionChecker {
    server_api: Arc<ServerApi>,
}

impl SonarQubeVersionChecker {
    pub fn new(server_api: Arc<ServerApi>) -> Self {
        Self { server_api }
    }

    /// Cloud deployments are versionless from the client's point of view
    /// and always pass.
    pub async fn fail_if_unsupported(&self) -> Result<(), VersionCheckError> {
        if self.server_api.is_sonar_qube_cloud() {
            return Ok(());
        }
        let status = self
            .server_api
            .system_api()
            .get_status()
            .await
            .map_err(|e| VersionCheckError::Unavailable(e.to_string()))?;
        let version = status
            .version
            .ok_or_else(|| VersionCheckError::Unavailable("missing version field".to_string()))?;
        let min = Version::parse(MIN_SUPPORTED_VERSION);
        if Version::parse(&version).satisfies_min_requirement(&min) {
            Ok(())
        } else {
            Err(VersionCheckError::UnsupportedVersion)
        }
    }

    /// True when the self-hosted server reports a version at or above
    /// `min`. Always false on cloud, whose feature set is gated
    /// differently.
    pub async fn is_server_version_at_least(&self, min: &str) -> bool {
        if self.server_api.is_sonar_qube_cloud() {
            return false;
        }
        match self.server_api.system_api().get_status().await {
            Ok(status) => match status.version {
                Some(version) => {
                    Version::parse(&version).satisfies_min_requirement(&Version::parse(min))
                }
                None => false,
            },
            Err(e) => {
                warn!(error = %e, "could not determine server version");
                false
            }
        }
    }

    /// Whether software composition analysis is switched on. Any failure
    /// reads as disabled.
    pub async fn is_sca_enabled(&self) -> bool {
        match self.server_api.settings_api().get_settings().await {
            Ok(settings) => settings.is_boolean_setting_enabled(SCA_ENABLED_SETTING),
            Err(e) => {
                warn!(error = %e, "could not read settings to determine SCA availability");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sonar_serverapi::{EndpointParams, HttpClient, ServerApiHelper};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn checker_for(uri: &str, organization: Option<&str>) -> SonarQubeVersionChecker {
        let helper = ServerApiHelper::new(
            EndpointParams::new(uri, organization.map(str::to_string)),
            HttpClient::new("test-agent", Some("token".to_string())).unwrap(),
        );
        SonarQubeVersionChecker::new(Arc::new(ServerApi::new(helper, true)))
    }

    async fn mock_status(server: &MockServer, version: &str) {
        Mock::given(method("GET"))
            .and(path("/api/system/status"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "x", "version": version, "status": "UP"
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_supported_version_passes() {
        let server = MockServer::start().await;
        mock_status(&server, "2025.1.0.102418").await;
        assert!(checker_for(&server.uri(), None)
            .fail_if_unsupported()
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_old_version_fails_with_exact_message() {
        let server = MockServer::start().await;
        mock_status(&server, "10.8").await;
        let err = checker_for(&server.uri(), None)
            .fail_if_unsupported()
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "SonarQube server version is not supported, minimal version is SQS 2025.1 or SQCB 25.1"
        );
    }

    #[tokio::test]
    async fn test_cloud_is_exempt() {
        let server = MockServer::start().await;
        // No status mock mounted: the check must not hit the network.
        assert!(checker_for(&server.uri(), Some("my-org"))
            .fail_if_unsupported()
            .await
            .is_ok());
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_version_gate_for_sca() {
        let server = MockServer::start().await;
        mock_status(&server, "2025.4.1").await;
        let checker = checker_for(&server.uri(), None);
        assert!(checker.is_server_version_at_least("2025.4").await);
        assert!(!checker.is_server_version_at_least("2026.1").await);
    }

    #[tokio::test]
    async fn test_sca_enabled_setting() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/settings/values"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "settings": [{"key": "sonar.sca.enabled", "value": "true"}]
            })))
            .mount(&server)
            .await;
        assert!(checker_for(&server.uri(), None).is_sca_enabled().await);
    }

    #[tokio::test]
    async fn test_sca_check_failure_reads_disabled() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/settings/values"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        assert!(!checker_for(&server.uri(), None).is_sca_enabled().await);
    }
}
