//! Listing the languages supported by the SonarQube instance.

use crate::server::{Tool, ToolArgs, ToolResultOrError};
use crate::types::{ToolDefinition, ToolResult};
use async_trait::async_trait;
use sonar_serverapi::api::languages::Language;
use sonar_serverapi::ServerApi;
use std::fmt::Write;
use std::sync::Arc;

pub const TOOL_NAME: &str = "list_languages";

pub struct ListLanguagesTool {
    server_api: Arc<ServerApi>,
}

impl ListLanguagesTool {
    pub fn new(server_api: Arc<ServerApi>) -> Self {
        Self { server_api }
    }
}

#[async_trait]
impl Tool for ListLanguagesTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(TOOL_NAME, "List all programming languages supported in this instance.")
            .with_string_property("q", "Optional pattern to match language keys/names against")
    }

    async fn execute(&self, args: ToolArgs) -> ToolResultOrError {
        if !self.server_api.is_authentication_set() {
            return Ok(ToolResult::failure(
                "Not connected to SonarQube Cloud, please provide 'SONARQUBE_CLOUD_TOKEN' and 'SONARQUBE_CLOUD_ORG'",
            ));
        }
        let query = args.get_optional_string("q");
        let response = self
            .server_api
            .languages_api()
            .list(query.as_deref())
            .await?;
        Ok(ToolResult::success(render(&response.languages)))
    }
}

fn render(languages: &[Language]) -> String {
    let mut out = String::from("Supported Languages:\n\n");
    for language in languages {
        let _ = writeln!(out, "{} ({})", language.name, language.key);
    }
    out.trim_end().to_string()
}
