//! System monitoring endpoints of the self-hosted server.
//!
//! `ping` and `status` are served anonymously so they can be used as
//! connectivity probes before credentials are validated.

use crate::error::ServerApiError;
use crate::helper::ServerApiHelper;
use crate::url::UrlBuilder;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

pub const HEALTH_PATH: &str = "/api/system/health";
pub const INFO_PATH: &str = "/api/system/info";
pub const LOGS_PATH: &str = "/api/system/logs";
pub const PING_PATH: &str = "/api/system/ping";
pub const STATUS_PATH: &str = "/api/system/status";

pub struct SystemApi {
    helper: Arc<ServerApiHelper>,
}

impl SystemApi {
    pub fn new(helper: Arc<ServerApiHelper>) -> Self {
        Self { helper }
    }

    pub async fn get_health(&self) -> Result<HealthResponse, ServerApiError> {
        self.helper.get(HEALTH_PATH).await?.json()
    }

    pub async fn get_info(&self) -> Result<InfoResponse, ServerApiError> {
        self.helper.get(INFO_PATH).await?.json()
    }

    /// Logs are returned as plain text, not JSON.
    pub async fn get_logs(&self, name: Option<&str>) -> Result<String, ServerApiError> {
        let url = UrlBuilder::new(LOGS_PATH).param("name", name).build();
        Ok(self.helper.get(&url).await?.body_as_string())
    }

    pub async fn get_ping(&self) -> Result<String, ServerApiError> {
        Ok(self.helper.get_anonymous(PING_PATH).await?.body_as_string())
    }

    pub async fn get_status(&self) -> Result<StatusResponse, ServerApiError> {
        self.helper.get_anonymous(STATUS_PATH).await?.json()
    }
}

#[derive(Debug, Deserialize)]
pub struct HealthResponse {
    pub health: String,
    #[serde(default)]
    pub causes: Vec<HealthCause>,
    #[serde(default)]
    pub nodes: Vec<HealthNode>,
}

#[derive(Debug, Deserialize)]
pub struct HealthCause {
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct HealthNode {
    pub name: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub host: String,
    pub port: i64,
    #[serde(rename = "startedAt")]
    pub started_at: String,
    pub health: String,
    #[serde(default)]
    pub causes: Vec<HealthCause>,
}

pub type InfoSection = serde_json::Map<String, Value>;

/// The info endpoint returns top-level sections keyed by display name.
#[derive(Debug, Deserialize)]
pub struct InfoResponse {
    #[serde(rename = "Health", default)]
    pub health: Option<String>,
    #[serde(rename = "System", default)]
    pub system: Option<InfoSection>,
    #[serde(rename = "Database", default)]
    pub database: Option<InfoSection>,
    #[serde(rename = "Bundled", default)]
    pub bundled: Option<InfoSection>,
    #[serde(rename = "Plugins", default)]
    pub plugins: Option<InfoSection>,
    #[serde(rename = "Web JVM State", default)]
    pub web_jvm_state: Option<InfoSection>,
    #[serde(rename = "Web Database Connection", default)]
    pub web_database_connection: Option<InfoSection>,
    #[serde(rename = "Web Logging", default)]
    pub web_logging: Option<InfoSection>,
    #[serde(rename = "Compute Engine Tasks", default)]
    pub compute_engine_tasks: Option<InfoSection>,
    #[serde(rename = "Compute Engine JVM State", default)]
    pub compute_engine_jvm_state: Option<InfoSection>,
    #[serde(rename = "Compute Engine Database Connection", default)]
    pub compute_engine_database_connection: Option<InfoSection>,
    #[serde(rename = "Compute Engine Logging", default)]
    pub compute_engine_logging: Option<InfoSection>,
    #[serde(rename = "Search State", default)]
    pub search_state: Option<InfoSection>,
    #[serde(rename = "Search Indexes", default)]
    pub search_indexes: Option<InfoSection>,
    #[serde(rename = "ALMs", default)]
    pub alms: Option<InfoSection>,
    #[serde(rename = "Server Push Connections", default)]
    pub server_push_connections: Option<InfoSection>,
    #[serde(rename = "Settings", default)]
    pub settings: Option<InfoSection>,
}

#[derive(Debug, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}
