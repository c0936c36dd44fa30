//! Webhook creation and listing.

use crate::server::{Tool, ToolArgs, ToolResultOrError};
use crate::types::{ToolDefinition, ToolResult};
use async_trait::async_trait;
use sonar_serverapi::api::webhooks::Webhook;
use sonar_serverapi::ServerApi;
use std::fmt::Write;
use std::sync::Arc;

pub const CREATE_WEBHOOK_TOOL_NAME: &str = "create_webhook";
pub const LIST_WEBHOOKS_TOOL_NAME: &str = "list_webhooks";

pub struct CreateWebhookTool {
    server_api: Arc<ServerApi>,
}

impl CreateWebhookTool {
    pub fn new(server_api: Arc<ServerApi>) -> Self {
        Self { server_api }
    }
}

#[async_trait]
impl Tool for CreateWebhookTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            CREATE_WEBHOOK_TOOL_NAME,
            "Create a new webhook. Requires 'Administer' permission on the specified project, \
             or global 'Administer' permission.",
        )
        .with_required_string_property(
            "name",
            "Name displayed in the administration console of webhooks (max 100 chars)",
        )
        .with_required_string_property(
            "url",
            "Server endpoint that will receive the webhook payload (max 512 chars)",
        )
        .with_string_property(
            "projectKey",
            "The key of the project that will own the webhook (max 400 chars)",
        )
        .with_string_property(
            "secret",
            "If provided, secret will be used as the key to generate the HMAC hex digest value \
             in the 'X-Sonar-Webhook-HMAC-SHA256' header (16-200 chars)",
        )
    }

    async fn execute(&self, args: ToolArgs) -> ToolResultOrError {
        let name = args.get_string("name")?;
        let url = args.get_string("url")?;
        let project = args.get_optional_string("projectKey");
        let secret = args.get_optional_string("secret");
        let response = self
            .server_api
            .webhooks_api()
            .create_webhook(&name, &url, project.as_deref(), secret.as_deref())
            .await?;
        let webhook = response.webhook;
        Ok(ToolResult::success(format!(
            "Webhook created successfully.\nKey: {}\nName: {}\nURL: {}\nHas Secret: {}",
            webhook.key,
            webhook.name,
            webhook.url,
            if webhook.has_secret { "Yes" } else { "No" }
        )))
    }
}

pub struct ListWebhooksTool {
    server_api: Arc<ServerApi>,
}

impl ListWebhooksTool {
    pub fn new(server_api: Arc<ServerApi>) -> Self {
        Self { server_api }
    }
}

#[async_trait]
impl Tool for ListWebhooksTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            LIST_WEBHOOKS_TOOL_NAME,
            "List all webhooks for the organization or project. Requires 'Administer' permission \
             on the specified project, or global 'Administer' permission.",
        )
        .with_string_property("projectKey", "Optional project key to list project-specific webhooks")
    }

    async fn execute(&self, args: ToolArgs) -> ToolResultOrError {
        let project = args.get_optional_string("projectKey");
        let response = self
            .server_api
            .webhooks_api()
            .list_webhooks(project.as_deref())
            .await?;
        Ok(ToolResult::success(render_webhooks(
            &response.webhooks,
            project.as_deref(),
        )))
    }
}

fn render_webhooks(webhooks: &[Webhook], project: Option<&str>) -> String {
    if webhooks.is_empty() {
        return match project {
            Some(project) => format!("No webhooks found for project '{project}'."),
            None => "No webhooks found.".to_string(),
        };
    }
    let mut out = match project {
        Some(project) => format!(
            "Found {} webhook(s) for project '{}':\n\n",
            webhooks.len(),
            project
        ),
        None => format!("Found {} webhook(s):\n\n", webhooks.len()),
    };
    for webhook in webhooks {
        let _ = writeln!(out, "Key: {}", webhook.key);
        let _ = writeln!(out, "Name: {}", webhook.name);
        let _ = writeln!(out, "URL: {}", webhook.url);
        let _ = writeln!(
            out,
            "Has Secret: {}\n",
            if webhook.has_secret { "Yes" } else { "No" }
        );
    }
    out.trim().to_string()
}
