//! Assembly of the MCP server: API facade, bridge client, tool set.

use crate::bridge::SonarQubeIdeBridgeClient;
use crate::config::McpServerConfig;
use crate::plugins::{PluginSyncError, PluginsSynchronizer};
use crate::server::{McpServer, Tool};
use crate::tools::analysis::{AnalyzeListFilesTool, ToggleAutomaticAnalysisTool};
use crate::tools::dependency_risks::SearchDependencyRisksTool;
use crate::tools::enterprises::ListEnterprisesTool;
use crate::tools::issues::{ChangeIssueStatusTool, SearchIssuesTool};
use crate::tools::languages::ListLanguagesTool;
use crate::tools::measures::GetComponentMeasuresTool;
use crate::tools::metrics::SearchMetricsTool;
use crate::tools::portfolios::ListPortfoliosTool;
use crate::tools::projects::SearchMyProjectsTool;
use crate::tools::quality_gates::{ListQualityGatesTool, ProjectStatusTool};
use crate::tools::rules::{ListRuleRepositoriesTool, ShowRuleTool};
use crate::tools::sources::{GetRawSourceTool, GetScmInfoTool};
use crate::tools::system::{
    SystemHealthTool, SystemInfoTool, SystemLogsTool, SystemPingTool, SystemStatusTool,
};
use crate::tools::webhooks::{CreateWebhookTool, ListWebhooksTool};
use crate::version_checker::{SonarQubeVersionChecker, VersionCheckError};
use sonar_serverapi::{EndpointParams, HttpClient, ServerApi, ServerApiError, ServerApiHelper};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

pub const SERVER_NAME: &str = "sonarqube-mcp-server";

const SCA_MIN_SERVER_VERSION: &str = "2025.4";

#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Http(#[from] ServerApiError),

    #[error(transparent)]
    VersionCheck(#[from] VersionCheckError),

    #[error(transparent)]
    PluginSync(#[from] PluginSyncError),
}

pub struct SonarQubeMcpServer {
    config: McpServerConfig,
    server_api: Arc<ServerApi>,
    bridge_client: Arc<SonarQubeIdeBridgeClient>,
    version_checker: SonarQubeVersionChecker,
    plugins_synchronizer: PluginsSynchronizer,
    mcp_server: McpServer,
}

impl SonarQubeMcpServer {
    pub fn new(config: McpServerConfig) -> Result<Self, StartupError> {
        let user_agent = config.user_agent();
        let server_api = Arc::new(build_server_api(&config, &user_agent)?);
        let bridge_client = Arc::new(SonarQubeIdeBridgeClient::new(
            HttpClient::without_token(&user_agent)?,
            config.ide_port(),
        ));
        let version_checker = SonarQubeVersionChecker::new(Arc::clone(&server_api));
        let plugins_synchronizer =
            PluginsSynchronizer::new(Arc::clone(&server_api), config.storage_path());
        let mcp_server = McpServer::new(SERVER_NAME, config.app_version());
        Ok(Self {
            config,
            server_api,
            bridge_client,
            version_checker,
            plugins_synchronizer,
            mcp_server,
        })
    }

    /// Check the server version, register the tool set and synchronize
    /// the analyzer plugins.
    pub async fn start(&self) -> Result<(), StartupError> {
        self.version_checker.fail_if_unsupported().await?;
        let tools = supported_tools(
            &self.server_api,
            &self.bridge_client,
            &self.version_checker,
        )
        .await;
        self.mcp_server.register_tools(tools).await;
        let analyzers = self.plugins_synchronizer.synchronize().await?;
        info!(
            plugins = analyzers.plugin_paths.len(),
            languages = analyzers.enabled_languages.len(),
            "analyzer plugins synchronized"
        );
        Ok(())
    }

    pub fn mcp_server(&self) -> &McpServer {
        &self.mcp_server
    }

    pub fn config(&self) -> &McpServerConfig {
        &self.config
    }
}

fn build_server_api(config: &McpServerConfig, user_agent: &str) -> Result<ServerApi, ServerApiError> {
    let client = HttpClient::new(user_agent, Some(config.token().to_string()))?;
    let helper = ServerApiHelper::new(
        EndpointParams::new(
            config.sonarqube_url(),
            config.organization().map(str::to_string),
        ),
        client,
    );
    Ok(ServerApi::new(helper, true))
}

/// Assemble the tool set for the deployment flavor the facade points at.
pub async fn supported_tools(
    server_api: &Arc<ServerApi>,
    bridge_client: &Arc<SonarQubeIdeBridgeClient>,
    version_checker: &SonarQubeVersionChecker,
) -> Vec<Arc<dyn Tool>> {
    let mut tools: Vec<Arc<dyn Tool>> = Vec::new();

    if bridge_client.is_available().await {
        info!("SonarQube for IDE integration is available, enabling related tools.");
        tools.push(Arc::new(AnalyzeListFilesTool::new(Arc::clone(bridge_client))));
        tools.push(Arc::new(ToggleAutomaticAnalysisTool::new(Arc::clone(
            bridge_client,
        ))));
    }

    if server_api.is_sonar_qube_cloud() {
        tools.push(Arc::new(ListEnterprisesTool::new(Arc::clone(server_api))));
    } else {
        tools.push(Arc::new(SystemHealthTool::new(Arc::clone(server_api))));
        tools.push(Arc::new(SystemInfoTool::new(Arc::clone(server_api))));
        tools.push(Arc::new(SystemLogsTool::new(Arc::clone(server_api))));
        tools.push(Arc::new(SystemPingTool::new(Arc::clone(server_api))));
        tools.push(Arc::new(SystemStatusTool::new(Arc::clone(server_api))));
        if version_checker
            .is_server_version_at_least(SCA_MIN_SERVER_VERSION)
            .await
        {
            if version_checker.is_sca_enabled().await {
                tools.push(Arc::new(SearchDependencyRisksTool::new(Arc::clone(
                    server_api,
                ))));
            } else {
                info!(
                    "Search Dependency Risks tool is not available because Advanced Security \
                     is not enabled."
                );
            }
        } else {
            info!(
                "Search Dependency Risks tool is not available because it requires SonarQube \
                 Server 2025.4 Enterprise or higher."
            );
        }
    }

    tools.push(Arc::new(ChangeIssueStatusTool::new(Arc::clone(server_api))));
    tools.push(Arc::new(SearchMyProjectsTool::new(Arc::clone(server_api))));
    tools.push(Arc::new(SearchIssuesTool::new(Arc::clone(server_api))));
    tools.push(Arc::new(ProjectStatusTool::new(Arc::clone(server_api))));
    tools.push(Arc::new(ShowRuleTool::new(Arc::clone(server_api))));
    tools.push(Arc::new(ListRuleRepositoriesTool::new(Arc::clone(server_api))));
    tools.push(Arc::new(ListQualityGatesTool::new(Arc::clone(server_api))));
    tools.push(Arc::new(ListLanguagesTool::new(Arc::clone(server_api))));
    tools.push(Arc::new(GetComponentMeasuresTool::new(Arc::clone(server_api))));
    tools.push(Arc::new(SearchMetricsTool::new(Arc::clone(server_api))));
    tools.push(Arc::new(GetScmInfoTool::new(Arc::clone(server_api))));
    tools.push(Arc::new(GetRawSourceTool::new(Arc::clone(server_api))));
    tools.push(Arc::new(CreateWebhookTool::new(Arc::clone(server_api))));
    tools.push(Arc::new(ListWebhooksTool::new(Arc::clone(server_api))));
    tools.push(Arc::new(ListPortfoliosTool::new(Arc::clone(server_api))));

    tools
}
