//! Component measures retrieval.

use crate::error::ServerApiError;
use crate::helper::ServerApiHelper;
use crate::url::UrlBuilder;
use serde::Deserialize;
use std::sync::Arc;

pub const COMPONENT_PATH: &str = "/api/measures/component";

pub struct MeasuresApi {
    helper: Arc<ServerApiHelper>,
}

impl MeasuresApi {
    pub fn new(helper: Arc<ServerApiHelper>) -> Self {
        Self { helper }
    }

    pub async fn get_component_measures(
        &self,
        component: Option<&str>,
        branch: Option<&str>,
        metric_keys: Option<&[String]>,
        pull_request: Option<&str>,
    ) -> Result<ComponentMeasuresResponse, ServerApiError> {
        let url = UrlBuilder::new(COMPONENT_PATH)
            .param("component", component)
            .param("branch", branch)
            .list_param("metricKeys", metric_keys)
            .param("pullRequest", pull_request)
            .param("additionalFields", Some("metrics"))
            .build();
        self.helper.get(&url).await?.json()
    }
}

#[derive(Debug, Deserialize)]
pub struct ComponentMeasuresResponse {
    #[serde(default)]
    pub component: Option<MeasuredComponent>,
    #[serde(default)]
    pub metrics: Vec<MeasureMetric>,
    #[serde(default)]
    pub periods: Vec<AnalysisPeriod>,
}

#[derive(Debug, Deserialize)]
pub struct MeasuredComponent {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub qualifier: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub measures: Vec<Measure>,
}

#[derive(Debug, Deserialize)]
pub struct Measure {
    pub metric: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub periods: Vec<MeasurePeriod>,
}

#[derive(Debug, Deserialize)]
pub struct MeasurePeriod {
    #[serde(default)]
    pub index: Option<i64>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(rename = "bestValue", default)]
    pub best_value: bool,
}

#[derive(Debug, Deserialize)]
pub struct MeasureMetric {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(rename = "type", default)]
    pub metric_type: Option<String>,
    #[serde(rename = "higherValuesAreBetter", default)]
    pub higher_values_are_better: bool,
    #[serde(default)]
    pub qualitative: bool,
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub custom: bool,
}

#[derive(Debug, Deserialize)]
pub struct AnalysisPeriod {
    #[serde(default)]
    pub index: Option<i64>,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub parameter: Option<String>,
}
