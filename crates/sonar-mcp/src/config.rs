//! Launch configuration resolved from environment variables.

use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

pub const DEFAULT_CLOUD_URL: &str = "https://sonarcloud.io";
pub const DEFAULT_IDE_PORT: u16 = 64120;

const STORAGE_PATH: &str = "STORAGE_PATH";
const SONARQUBE_CLOUD_URL: &str = "SONARQUBE_CLOUD_URL";
const SONARQUBE_URL: &str = "SONARQUBE_URL";
const SONARQUBE_ORG: &str = "SONARQUBE_ORG";
const SONARQUBE_TOKEN: &str = "SONARQUBE_TOKEN";
const TELEMETRY_DISABLED: &str = "TELEMETRY_DISABLED";
const SONARQUBE_IDE_PORT: &str = "SONARQUBE_IDE_PORT";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("STORAGE_PATH environment variable or property must be set")]
    MissingStoragePath,

    #[error("SONARQUBE_TOKEN environment variable or property must be set")]
    MissingToken,

    #[error("SONARQUBE_ORG environment variable must be set when using SonarQube Cloud")]
    MissingOrganization,

    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: String, value: String },
}

/// Resolved launch configuration.
#[derive(Debug, Clone)]
pub struct McpServerConfig {
    storage_path: PathBuf,
    sonarqube_url: String,
    organization: Option<String>,
    token: String,
    telemetry_disabled: bool,
    ide_port: u16,
    is_sonar_cloud: bool,
}

impl McpServerConfig {
    /// Resolve the configuration from an environment map. Blank values
    /// count as unset.
    pub fn from_environment(env: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let storage_path = read(env, STORAGE_PATH).ok_or(ConfigError::MissingStoragePath)?;
        let token = read(env, SONARQUBE_TOKEN).ok_or(ConfigError::MissingToken)?;

        let cloud_url =
            read(env, SONARQUBE_CLOUD_URL).unwrap_or_else(|| DEFAULT_CLOUD_URL.to_string());
        let sonarqube_url = read(env, SONARQUBE_URL).unwrap_or_else(|| cloud_url.clone());
        let is_sonar_cloud = sonarqube_url == cloud_url;

        let organization = read(env, SONARQUBE_ORG);
        if is_sonar_cloud && organization.is_none() {
            return Err(ConfigError::MissingOrganization);
        }

        let telemetry_disabled = read(env, TELEMETRY_DISABLED)
            .is_some_and(|value| value.eq_ignore_ascii_case("true"));

        let ide_port = match read(env, SONARQUBE_IDE_PORT) {
            Some(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
                name: SONARQUBE_IDE_PORT.to_string(),
                value,
            })?,
            None => DEFAULT_IDE_PORT,
        };

        Ok(Self {
            storage_path: PathBuf::from(storage_path),
            sonarqube_url,
            organization,
            token,
            telemetry_disabled,
            ide_port,
            is_sonar_cloud,
        })
    }

    pub fn storage_path(&self) -> &PathBuf {
        &self.storage_path
    }

    pub fn sonarqube_url(&self) -> &str {
        &self.sonarqube_url
    }

    pub fn organization(&self) -> Option<&str> {
        self.organization.as_deref()
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn is_sonar_cloud(&self) -> bool {
        self.is_sonar_cloud
    }

    pub fn is_telemetry_disabled(&self) -> bool {
        self.telemetry_disabled
    }

    pub fn ide_port(&self) -> u16 {
        self.ide_port
    }

    pub fn app_version(&self) -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    pub fn user_agent(&self) -> String {
        format!("SonarQube MCP Server {}", self.app_version())
    }
}

fn read(env: &HashMap<String, String>, name: &str) -> Option<String> {
    env.get(name)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}
