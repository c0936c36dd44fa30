//! Raw source code and SCM blame information.

use crate::error::ServerApiError;
use crate::helper::ServerApiHelper;
use crate::url::UrlBuilder;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

pub const SOURCES_RAW_PATH: &str = "/api/sources/raw";
pub const SOURCES_SCM_PATH: &str = "/api/sources/scm";

pub struct SourcesApi {
    helper: Arc<ServerApiHelper>,
}

impl SourcesApi {
    pub fn new(helper: Arc<ServerApiHelper>) -> Self {
        Self { helper }
    }

    /// Returns the file content verbatim.
    pub async fn get_raw_source(
        &self,
        key: &str,
        branch: Option<&str>,
        pull_request: Option<&str>,
    ) -> Result<String, ServerApiError> {
        let url = UrlBuilder::new(SOURCES_RAW_PATH)
            .param("key", Some(key))
            .param("branch", branch)
            .param("pullRequest", pull_request)
            .build();
        Ok(self.helper.get(&url).await?.body_as_string())
    }

    pub async fn get_scm_info(
        &self,
        key: &str,
        commits_by_line: Option<bool>,
        from: Option<i64>,
        to: Option<i64>,
    ) -> Result<ScmResponse, ServerApiError> {
        let url = UrlBuilder::new(SOURCES_SCM_PATH)
            .param("key", Some(key))
            .bool_param("commits_by_line", commits_by_line)
            .int_param("from", from)
            .int_param("to", to)
            .build();
        self.helper.get(&url).await?.json()
    }
}

/// SCM info comes back as positional arrays:
/// `[line number, author, datetime, revision]`.
#[derive(Debug, Deserialize)]
pub struct ScmResponse {
    #[serde(default)]
    pub scm: Vec<Vec<Value>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScmLine {
    pub line_number: i64,
    pub author: String,
    pub datetime: String,
    pub revision: String,
}

impl ScmResponse {
    pub fn scm_lines(&self) -> Vec<ScmLine> {
        self.scm
            .iter()
            .map(|row| ScmLine {
                line_number: row.first().and_then(Value::as_i64).unwrap_or(0),
                author: row.get(1).and_then(Value::as_str).unwrap_or("").to_string(),
                datetime: row.get(2).and_then(Value::as_str).unwrap_or("").to_string(),
                revision: row.get(3).and_then(Value::as_str).unwrap_or("").to_string(),
            })
            .collect()
    }
}
