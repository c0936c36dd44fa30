//! Enterprise listing, available on the multi-tenant cloud only.

use crate::server::{Tool, ToolArgs, ToolResultOrError};
use crate::types::{ToolDefinition, ToolResult};
use async_trait::async_trait;
use sonar_serverapi::api::enterprises::Enterprise;
use sonar_serverapi::ServerApi;
use std::fmt::Write;
use std::sync::Arc;

pub const TOOL_NAME: &str = "list_enterprises";

pub struct ListEnterprisesTool {
    server_api: Arc<ServerApi>,
}

impl ListEnterprisesTool {
    pub fn new(server_api: Arc<ServerApi>) -> Self {
        Self { server_api }
    }
}

#[async_trait]
impl Tool for ListEnterprisesTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            TOOL_NAME,
            "List enterprises available in SonarQube Cloud. Available only for SonarQube Cloud \
             instances.",
        )
        .with_string_property("enterpriseKey", "Optional enterprise key to filter results")
    }

    async fn execute(&self, args: ToolArgs) -> ToolResultOrError {
        let enterprise_key = args.get_optional_string("enterpriseKey");
        let enterprises = self
            .server_api
            .enterprises_api()
            .list(enterprise_key.as_deref())
            .await?;
        Ok(ToolResult::success(render(&enterprises)))
    }
}

fn render(enterprises: &[Enterprise]) -> String {
    if enterprises.is_empty() {
        return "No enterprises were found.".to_string();
    }
    let mut out = String::from("Available Enterprises:\n\n");
    for enterprise in enterprises {
        let _ = write!(
            out,
            "Enterprise: {} ({}) | ID: {}",
            enterprise.name, enterprise.key, enterprise.id
        );
        if let Some(avatar) = &enterprise.avatar {
            let _ = write!(out, " | Avatar: {avatar}");
        }
        if let Some(template_id) = &enterprise.default_portfolio_permission_template_id {
            let _ = write!(out, " | Default Portfolio Template: {template_id}");
        }
        out.push('\n');
    }
    out.trim().to_string()
}
