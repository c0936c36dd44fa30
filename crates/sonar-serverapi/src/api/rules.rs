//! Rule details and rule repositories.

use crate::error::ServerApiError;
use crate::helper::ServerApiHelper;
use crate::url::UrlBuilder;
use serde::Deserialize;
use std::sync::Arc;

pub const SHOW_PATH: &str = "/api/rules/show";
pub const REPOSITORIES_PATH: &str = "/api/rules/repositories";

pub struct RulesApi {
    helper: Arc<ServerApiHelper>,
}

impl RulesApi {
    pub fn new(helper: Arc<ServerApiHelper>) -> Self {
        Self { helper }
    }

    pub async fn show_rule(&self, rule_key: &str) -> Result<RuleShowResponse, ServerApiError> {
        let url = UrlBuilder::new(SHOW_PATH)
            .param("key", Some(rule_key))
            .param("organization", self.helper.organization())
            .build();
        self.helper.get(&url).await?.json()
    }

    pub async fn get_repositories(
        &self,
        language: Option<&str>,
        query: Option<&str>,
    ) -> Result<RepositoriesResponse, ServerApiError> {
        let url = UrlBuilder::new(REPOSITORIES_PATH)
            .param("language", language)
            .param("q", query)
            .build();
        self.helper.get(&url).await?.json()
    }
}

#[derive(Debug, Deserialize)]
pub struct RuleShowResponse {
    pub rule: Rule,
}

#[derive(Debug, Deserialize)]
pub struct Rule {
    pub key: String,
    #[serde(default)]
    pub repo: Option<String>,
    pub name: String,
    #[serde(rename = "htmlDesc", default)]
    pub html_desc: Option<String>,
    #[serde(rename = "mdDesc", default)]
    pub md_desc: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(rename = "isTemplate", default)]
    pub is_template: bool,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(rename = "sysTags", default)]
    pub sys_tags: Vec<String>,
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(rename = "langName", default)]
    pub lang_name: Option<String>,
    #[serde(rename = "type", default)]
    pub rule_type: Option<String>,
    #[serde(rename = "cleanCodeAttribute", default)]
    pub clean_code_attribute: Option<String>,
    #[serde(rename = "cleanCodeAttributeCategory", default)]
    pub clean_code_attribute_category: Option<String>,
    #[serde(default)]
    pub impacts: Vec<RuleImpact>,
}

#[derive(Debug, Deserialize)]
pub struct RuleImpact {
    #[serde(rename = "softwareQuality")]
    pub software_quality: String,
    pub severity: String,
}

#[derive(Debug, Deserialize)]
pub struct RepositoriesResponse {
    #[serde(default)]
    pub repositories: Vec<RuleRepository>,
}

#[derive(Debug, Deserialize)]
pub struct RuleRepository {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub language: Option<String>,
}
