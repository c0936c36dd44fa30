//! Raw source retrieval and SCM blame rendering.

use crate::server::{Tool, ToolArgs, ToolResultOrError};
use crate::types::{ToolDefinition, ToolResult};
use async_trait::async_trait;
use sonar_serverapi::api::sources::ScmResponse;
use sonar_serverapi::ServerApi;
use std::fmt::Write;
use std::sync::Arc;

pub const GET_RAW_SOURCE_TOOL_NAME: &str = "get_raw_source";
pub const GET_SCM_INFO_TOOL_NAME: &str = "get_scm_info";

const NOT_CONNECTED_MESSAGE: &str = "Not connected to SonarQube, please provide valid credentials";

pub struct GetRawSourceTool {
    server_api: Arc<ServerApi>,
}

impl GetRawSourceTool {
    pub fn new(server_api: Arc<ServerApi>) -> Self {
        Self { server_api }
    }
}

#[async_trait]
impl Tool for GetRawSourceTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            GET_RAW_SOURCE_TOOL_NAME,
            "Get source code as raw text. Require 'See Source Code' permission on file",
        )
        .with_required_string_property("key", "File key (e.g. my_project:src/foo/Bar.php)")
        .with_string_property("branch", "Branch key (e.g. feature/my_branch)")
        .with_string_property("pullRequest", "Pull request id")
    }

    async fn execute(&self, args: ToolArgs) -> ToolResultOrError {
        if !self.server_api.is_authentication_set() {
            return Ok(ToolResult::failure(NOT_CONNECTED_MESSAGE));
        }
        let key = args.get_string("key")?;
        let branch = args.get_optional_string("branch");
        let pull_request = args.get_optional_string("pullRequest");
        match self
            .server_api
            .sources_api()
            .get_raw_source(&key, branch.as_deref(), pull_request.as_deref())
            .await
        {
            Ok(source) => Ok(ToolResult::success(source)),
            Err(e) => Ok(ToolResult::failure(format!(
                "Failed to retrieve source code: {e}"
            ))),
        }
    }
}

pub struct GetScmInfoTool {
    server_api: Arc<ServerApi>,
}

impl GetScmInfoTool {
    pub fn new(server_api: Arc<ServerApi>) -> Self {
        Self { server_api }
    }
}

#[async_trait]
impl Tool for GetScmInfoTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition::new(
            GET_SCM_INFO_TOOL_NAME,
            "Get SCM information of source files. Require See Source Code permission on file's project",
        )
        .with_required_string_property("key", "File key (e.g. my_project:src/foo/Bar.php)")
        .with_bool_property(
            "commits_by_line",
            "Group lines by SCM commit if value is false, else display commits for each line (true/false)",
        )
        .with_number_property("from", "First line to return. Starts at 1")
        .with_number_property("to", "Last line to return (inclusive)")
    }

    async fn execute(&self, args: ToolArgs) -> ToolResultOrError {
        if !self.server_api.is_authentication_set() {
            return Ok(ToolResult::failure(NOT_CONNECTED_MESSAGE));
        }
        let key = args.get_string("key")?;
        let commits_by_line = args.get_optional_bool("commits_by_line");
        let from = args.get_optional_int("from");
        let to = args.get_optional_int("to");
        match self
            .server_api
            .sources_api()
            .get_scm_info(&key, commits_by_line, from, to)
            .await
        {
            Ok(response) => Ok(ToolResult::success(render_scm_info(&response))),
            Err(e) => Ok(ToolResult::failure(format!(
                "Failed to retrieve SCM information: {e}"
            ))),
        }
    }
}

fn render_scm_info(response: &ScmResponse) -> String {
    let mut out = String::from("SCM Information:\n================\n\n");
    let lines = response.scm_lines();
    if lines.is_empty() {
        out.push_str("No SCM information available for this file.\n");
    } else {
        out.push_str("Line | Author      | Date                    | Revision\n");
        out.push_str("-----|-------------|-------------------------|----------------\n");
        for line in lines {
            let _ = writeln!(
                out,
                "{:<4} | {:<11} | {:<23} | {}",
                line.line_number, line.author, line.datetime, line.revision
            );
        }
    }
    out.trim().to_string()
}
