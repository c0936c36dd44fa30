//! Client for a locally running SonarQube for IDE companion process.
//!
//! The bridge is purely advisory: every probe or request failure is
//! reported to the caller as "unavailable" instead of an error, since
//! the companion process may simply not be running.

use serde::{Deserialize, Serialize};
use sonar_serverapi::helper::concat;
use sonar_serverapi::url::UrlBuilder;
use sonar_serverapi::HttpClient;
use tracing::{error, info};

pub const STATUS_PATH: &str = "/sonarlint/api/status";
pub const ANALYZE_LIST_FILES_PATH: &str = "/sonarlint/api/analysis/files";
pub const AUTOMATIC_ANALYSIS_ENABLEMENT_PATH: &str = "/sonarlint/api/analysis/automatic/config";

const JSON_CONTENT_TYPE: &str = "application/json";

pub struct SonarQubeIdeBridgeClient {
    client: HttpClient,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct AnalyzeListFilesRequest {
    #[serde(rename = "fileAbsolutePaths")]
    file_absolute_paths: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeListFilesResponse {
    #[serde(default)]
    pub findings: Vec<BridgeFinding>,
}

#[derive(Debug, Deserialize)]
pub struct BridgeFinding {
    #[serde(rename = "ruleKey", default)]
    pub rule_key: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(rename = "filePath", default)]
    pub file_path: Option<String>,
    #[serde(rename = "textRange", default)]
    pub text_range: Option<BridgeTextRange>,
}

#[derive(Debug, Deserialize)]
pub struct BridgeTextRange {
    #[serde(rename = "startLine", default)]
    pub start_line: Option<i64>,
    #[serde(rename = "endLine", default)]
    pub end_line: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct EnablementError {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug)]
pub struct AutomaticAnalysisEnablementResponse {
    pub is_successful: bool,
    pub error_message: Option<String>,
}

impl SonarQubeIdeBridgeClient {
    pub fn new(client: HttpClient, port: u16) -> Self {
        Self {
            client,
            base_url: format!("http://localhost:{port}"),
        }
    }

    pub async fn is_available(&self) -> bool {
        let url = concat(&self.base_url, STATUS_PATH);
        match self.client.get_anonymous(&url).await {
            Ok(response) => response.is_successful(),
            Err(e) => {
                info!("SonarQube for IDE availability check failed, reason: {e}");
                false
            }
        }
    }

    pub async fn request_analyze_list_files(
        &self,
        file_paths: Vec<String>,
    ) -> Option<AnalyzeListFilesResponse> {
        let request = AnalyzeListFilesRequest {
            file_absolute_paths: file_paths,
        };
        let body = match serde_json::to_string(&request) {
            Ok(body) => body,
            Err(e) => {
                error!(error = %e, "could not serialize analysis request");
                return None;
            }
        };
        let url = concat(&self.base_url, ANALYZE_LIST_FILES_PATH);
        match self
            .client
            .post_anonymous(&url, JSON_CONTENT_TYPE, body)
            .await
        {
            Ok(response) => match response.json::<AnalyzeListFilesResponse>() {
                Ok(parsed) => Some(parsed),
                Err(e) => {
                    error!(error = %e, "could not parse analysis response");
                    None
                }
            },
            Err(e) => {
                error!(error = %e, "error requesting file analysis");
                None
            }
        }
    }

    pub async fn request_automatic_analysis_enablement(
        &self,
        enabled: bool,
    ) -> AutomaticAnalysisEnablementResponse {
        let path = UrlBuilder::new(AUTOMATIC_ANALYSIS_ENABLEMENT_PATH)
            .bool_param("enabled", Some(enabled))
            .build();
        let url = concat(&self.base_url, &path);
        match self
            .client
            .post_anonymous(&url, JSON_CONTENT_TYPE, String::new())
            .await
        {
            Ok(response) if response.is_successful() => AutomaticAnalysisEnablementResponse {
                is_successful: true,
                error_message: None,
            },
            Ok(response) => {
                let message = response
                    .json::<EnablementError>()
                    .ok()
                    .and_then(|e| e.message);
                AutomaticAnalysisEnablementResponse {
                    is_successful: false,
                    error_message: message,
                }
            }
            Err(e) => {
                error!(error = %e, "error updating automatic analysis enablement");
                AutomaticAnalysisEnablementResponse {
                    is_successful: false,
                    error_message: None,
                }
            }
        }
    }
}
