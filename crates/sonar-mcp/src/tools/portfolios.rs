//! Portfolio listing for both deployment flavors.

use crate::server::{Tool, ToolArgs, ToolResultOrError};
use crate::types::{ToolDefinition, ToolResult};
use async_trait::async_trait;
use sonar_serverapi::api::portfolios::{Portfolio, PortfolioListResponse, ViewComponent};
use sonar_serverapi::{Paging, ServerApi};
use std::fmt::Write;
use std::sync::Arc;

pub const TOOL_NAME: &str = "list_sonarqube_portfolios";

pub struct ListPortfoliosTool {
    server_api: Arc<ServerApi>,
}

impl ListPortfoliosTool {
    pub fn new(server_api: Arc<ServerApi>) -> Self {
        Self { server_api }
    }
}

#[async_trait]
impl Tool for ListPortfoliosTool {
    fn definition(&self) -> ToolDefinition {
        // The argument surface depends on the deployment flavor.
        if self.server_api.is_sonar_qube_cloud() {
            ToolDefinition::new(TOOL_NAME, "List enterprise portfolios with filtering options.")
                .with_string_property(
                    "enterpriseId",
                    "Enterprise uuid. Can be omitted only if 'favorite' parameter is supplied \
                     with value true",
                )
                .with_string_property("q", "Search query to filter portfolios by name")
                .with_bool_property(
                    "favorite",
                    "Required to be true if 'enterpriseId' parameter is omitted. If true, only \
                     returns portfolios favorited by the logged-in user. Cannot be true when \
                     'draft' is true",
                )
                .with_bool_property(
                    "draft",
                    "If true, only returns drafts created by the logged-in user. Cannot be true \
                     when 'favorite' is true",
                )
                .with_number_property("pageIndex", "Index of the page to fetch (default: 1)")
                .with_number_property("pageSize", "Size of the page to fetch (default: 50)")
        } else {
            ToolDefinition::new(
                TOOL_NAME,
                "List portfolios available in SonarQube Server with filtering options.",
            )
            .with_string_property("q", "Search query to filter portfolios by name or key")
            .with_bool_property("favorite", "If true, only returns favorite portfolios")
            .with_number_property("pageIndex", "1-based page number (default: 1)")
            .with_number_property("pageSize", "Page size, max 500 (default: 100)")
        }
    }

    async fn execute(&self, args: ToolArgs) -> ToolResultOrError {
        let query = args.get_optional_string("q");
        let favorite = args.get_optional_bool("favorite");
        let page_index = args.get_optional_int("pageIndex");
        let page_size = args.get_optional_int("pageSize");
        if self.server_api.is_sonar_qube_cloud() {
            let enterprise_id = args.get_optional_string("enterpriseId");
            let draft = args.get_optional_bool("draft");
            if let Some(message) =
                validate_cloud_parameters(enterprise_id.as_deref(), favorite, draft)
            {
                return Ok(ToolResult::failure(message));
            }
            let response = self
                .server_api
                .portfolios_api()
                .list(
                    enterprise_id.as_deref(),
                    query.as_deref(),
                    favorite,
                    draft,
                    page_index,
                    page_size,
                )
                .await?;
            Ok(ToolResult::success(render_cloud(&response)))
        } else {
            let response = self
                .server_api
                .portfolios_api()
                .list(None, query.as_deref(), favorite, None, page_index, page_size)
                .await?;
            Ok(ToolResult::success(render_server(&response)))
        }
    }
}

fn validate_cloud_parameters(
    enterprise_id: Option<&str>,
    favorite: Option<bool>,
    draft: Option<bool>,
) -> Option<&'static str> {
    let enterprise_missing = enterprise_id.map_or(true, |id| id.trim().is_empty());
    if enterprise_missing && favorite != Some(true) {
        return Some("Either 'enterpriseId' must be provided or 'favorite' must be true");
    }
    if favorite == Some(true) && draft == Some(true) {
        return Some("Parameters 'favorite' and 'draft' cannot both be true at the same time");
    }
    None
}

fn render_server(response: &PortfolioListResponse) -> String {
    let components = response.components.as_deref().unwrap_or_default();
    if components.is_empty() {
        return "No portfolios were found.".to_string();
    }
    let mut out = String::from("Available Portfolios:\n\n");
    for component in components {
        append_view_component(&mut out, component);
    }
    if let Some(paging) = &response.paging {
        append_pagination(&mut out, paging);
    }
    out.trim().to_string()
}

fn append_view_component(out: &mut String, component: &ViewComponent) {
    let _ = write!(
        out,
        "Portfolio: {} ({}) | Qualifier: {} | Visibility: {}",
        component.name,
        component.key,
        component.qualifier.as_deref().unwrap_or(""),
        component.visibility.as_deref().unwrap_or("")
    );
    if let Some(favorite) = component.is_favorite {
        let _ = write!(out, " | Favorite: {favorite}");
    }
    out.push('\n');
}

fn render_cloud(response: &PortfolioListResponse) -> String {
    let portfolios = response.portfolios.as_deref().unwrap_or_default();
    if portfolios.is_empty() {
        return "No portfolios were found.".to_string();
    }
    let mut out = String::from("Available Portfolios:\n\n");
    for portfolio in portfolios {
        append_portfolio(&mut out, portfolio);
    }
    if let Some(page) = &response.page {
        append_pagination(&mut out, page);
    }
    out.trim().to_string()
}

fn append_portfolio(out: &mut String, portfolio: &Portfolio) {
    let _ = write!(out, "Portfolio: {} ({})", portfolio.name, portfolio.id);
    if let Some(description) = &portfolio.description {
        let _ = write!(out, " | Description: {description}");
    }
    if let Some(enterprise_id) = &portfolio.enterprise_id {
        let _ = write!(out, " | Enterprise: {enterprise_id}");
    }
    if let Some(selection) = &portfolio.selection {
        let _ = write!(out, " | Selection: {selection}");
    }
    if portfolio.is_draft == Some(true) {
        let _ = write!(
            out,
            " | Draft (Stage: {})",
            portfolio.draft_stage.unwrap_or(0)
        );
    }
    if let Some(tags) = portfolio.tags.as_deref().filter(|tags| !tags.is_empty()) {
        let _ = write!(out, " | Tags: {}", tags.join(", "));
    }
    out.push('\n');
}

fn append_pagination(out: &mut String, paging: &Paging) {
    let _ = write!(
        out,
        "\nThis response is paginated and this is the page {} out of {} total pages. \
         There is a maximum of {} portfolios per page.",
        paging.page_index,
        paging.total_pages(),
        paging.page_size
    );
}
