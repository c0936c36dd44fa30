//! Rule details and rule repository listing.

use crate::server::{Tool, ToolArgs, ToolResultOrError};
use crate::types::{ToolDefinition, ToolResult};
use async_trait::async_trait;
use sonar_serverapi::api::rules::{Rule, RuleRepository};
use sonar_serverapi::ServerApi;
use std::fmt::Write;
use std::sync::Arc;

pub const SHOW_RULE_TOOL_NAME: &str = "show_rule";
pub const LIST_RULE_REPOSITORIES_TOOL_NAME: &str = "list_rule_repositories";

pub struct ShowRuleTool {
    server_api: Arc<ServerApi>,
}

impl ShowRuleTool {
    pub fn new(server_api: Arc<ServerApi>) -> Self {
        Self { server_api }
    }
}

#[async_trait]
impl Tool for ShowRuleTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            SHOW_RULE_TOOL_NAME,
            "Shows detailed information about a SonarQube rule",
        )
        .with_required_string_property("key", "The rule key (e.g. javascript:EmptyBlock)")
    }

    async fn execute(&self, args: ToolArgs) -> ToolResultOrError {
        if !self.server_api.is_authentication_set() {
            return Ok(ToolResult::failure(
                "Not connected to SonarQube, please provide valid credentials",
            ));
        }
        let rule_key = args.get_string("key")?;
        let response = self.server_api.rules_api().show_rule(&rule_key).await?;
        Ok(ToolResult::success(render_rule(&response.rule)))
    }
}

fn render_rule(rule: &Rule) -> String {
    let mut out = String::from("Rule details:\n");
    let _ = writeln!(out, "Key: {}", rule.key);
    let _ = writeln!(out, "Name: {}", rule.name);
    let _ = writeln!(out, "Severity: {}", rule.severity.as_deref().unwrap_or(""));
    let _ = writeln!(out, "Type: {}", rule.rule_type.as_deref().unwrap_or(""));
    let _ = writeln!(
        out,
        "Language: {} ({})",
        rule.lang_name.as_deref().unwrap_or(""),
        rule.lang.as_deref().unwrap_or("")
    );
    if !rule.impacts.is_empty() {
        out.push_str("Impacts:\n");
        for impact in &rule.impacts {
            let _ = writeln!(out, "- {}: {}", impact.software_quality, impact.severity);
        }
    }
    let _ = write!(
        out,
        "\nDescription:\n{}",
        rule.html_desc.as_deref().unwrap_or("")
    );
    out
}

pub struct ListRuleRepositoriesTool {
    server_api: Arc<ServerApi>,
}

impl ListRuleRepositoriesTool {
    pub fn new(server_api: Arc<ServerApi>) -> Self {
        Self { server_api }
    }
}

#[async_trait]
impl Tool for ListRuleRepositoriesTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            LIST_RULE_REPOSITORIES_TOOL_NAME,
            "List rule repositories available in SonarQube",
        )
        .with_string_property(
            "language",
            "Optional language key to filter repositories (e.g. 'java')",
        )
        .with_string_property(
            "q",
            "Optional search query to filter repositories by name or key",
        )
    }

    async fn execute(&self, args: ToolArgs) -> ToolResultOrError {
        if !self.server_api.is_authentication_set() {
            return Ok(ToolResult::failure(
                "Not connected to SonarQube Cloud, please provide 'SONARQUBE_CLOUD_TOKEN' and 'SONARQUBE_CLOUD_ORG'",
            ));
        }
        let language = args.get_optional_string("language");
        let query = args.get_optional_string("q");
        let response = self
            .server_api
            .rules_api()
            .get_repositories(language.as_deref(), query.as_deref())
            .await?;
        Ok(ToolResult::success(render_repositories(
            &response.repositories,
        )))
    }
}

fn render_repositories(repositories: &[RuleRepository]) -> String {
    if repositories.is_empty() {
        return "No rule repositories found.".to_string();
    }
    let mut out = format!("Found {} rule repositories:\n\n", repositories.len());
    for repository in repositories {
        let _ = writeln!(out, "Key: {}", repository.key);
        let _ = writeln!(out, "Name: {}", repository.name);
        let _ = writeln!(
            out,
            "Language: {}\n",
            repository.language.as_deref().unwrap_or("")
        );
    }
    out.trim().to_string()
}
