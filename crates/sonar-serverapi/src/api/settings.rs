//! Global settings values.

use crate::error::ServerApiError;
use crate::helper::ServerApiHelper;
use serde::Deserialize;
use std::sync::Arc;

pub const SETTINGS_PATH: &str = "/api/settings/values";

pub struct SettingsApi {
    helper: Arc<ServerApiHelper>,
}

impl SettingsApi {
    pub fn new(helper: Arc<ServerApiHelper>) -> Self {
        Self { helper }
    }

    pub async fn get_settings(&self) -> Result<SettingsValuesResponse, ServerApiError> {
        self.helper.get(SETTINGS_PATH).await?.json()
    }
}

#[derive(Debug, Deserialize)]
pub struct SettingsValuesResponse {
    #[serde(default)]
    pub settings: Vec<Setting>,
}

#[derive(Debug, Deserialize)]
pub struct Setting {
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub values: Vec<String>,
    #[serde(default)]
    pub inherited: bool,
}

impl SettingsValuesResponse {
    pub fn setting_value(&self, key: &str) -> Option<&str> {
        self.settings
            .iter()
            .find(|setting| setting.key == key)
            .and_then(|setting| setting.value.as_deref())
    }

    /// True when the setting exists and its value is `true`.
    pub fn is_boolean_setting_enabled(&self, key: &str) -> bool {
        self.setting_value(key)
            .is_some_and(|value| value.eq_ignore_ascii_case("true"))
    }
}
