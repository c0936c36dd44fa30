//! Resource clients, one module per endpoint area, plus the [`ServerApi`]
//! facade that aggregates them.

pub mod components;
pub mod enterprises;
pub mod issues;
pub mod languages;
pub mod measures;
pub mod metrics;
pub mod plugins;
pub mod portfolios;
pub mod projects;
pub mod quality_gates;
pub mod rules;
pub mod sca;
pub mod settings;
pub mod sources;
pub mod system;
pub mod webhooks;

use crate::helper::ServerApiHelper;
use std::sync::Arc;

/// Single entry point over every resource client, sharing one helper
/// and therefore one connection pool.
pub struct ServerApi {
    helper: Arc<ServerApiHelper>,
    authentication_set: bool,
    components: components::ComponentsApi,
    enterprises: enterprises::EnterprisesApi,
    issues: issues::IssuesApi,
    languages: languages::LanguagesApi,
    measures: measures::MeasuresApi,
    metrics: metrics::MetricsApi,
    plugins: plugins::PluginsApi,
    portfolios: portfolios::PortfoliosApi,
    projects: projects::ProjectsApi,
    quality_gates: quality_gates::QualityGatesApi,
    rules: rules::RulesApi,
    sca: sca::ScaApi,
    settings: settings::SettingsApi,
    sources: sources::SourcesApi,
    system: system::SystemApi,
    webhooks: webhooks::WebhooksApi,
}

impl ServerApi {
    pub fn new(helper: ServerApiHelper, authentication_set: bool) -> Self {
        let helper = Arc::new(helper);
        Self {
            components: components::ComponentsApi::new(Arc::clone(&helper)),
            enterprises: enterprises::EnterprisesApi::new(Arc::clone(&helper)),
            issues: issues::IssuesApi::new(Arc::clone(&helper)),
            languages: languages::LanguagesApi::new(Arc::clone(&helper)),
            measures: measures::MeasuresApi::new(Arc::clone(&helper)),
            metrics: metrics::MetricsApi::new(Arc::clone(&helper)),
            plugins: plugins::PluginsApi::new(Arc::clone(&helper)),
            portfolios: portfolios::PortfoliosApi::new(Arc::clone(&helper)),
            projects: projects::ProjectsApi::new(Arc::clone(&helper)),
            quality_gates: quality_gates::QualityGatesApi::new(Arc::clone(&helper)),
            rules: rules::RulesApi::new(Arc::clone(&helper)),
            sca: sca::ScaApi::new(Arc::clone(&helper)),
            settings: settings::SettingsApi::new(Arc::clone(&helper)),
            sources: sources::SourcesApi::new(Arc::clone(&helper)),
            system: system::SystemApi::new(Arc::clone(&helper)),
            webhooks: webhooks::WebhooksApi::new(Arc::clone(&helper)),
            helper,
            authentication_set,
        }
    }

    /// The multi-tenant cloud deployment is identified by the presence
    /// of a configured organization.
    pub fn is_sonar_qube_cloud(&self) -> bool {
        self.helper.organization().is_some()
    }

    pub fn is_authentication_set(&self) -> bool {
        self.authentication_set
    }

    pub fn components_api(&self) -> &components::ComponentsApi {
        &self.components
    }

    pub fn enterprises_api(&self) -> &enterprises::EnterprisesApi {
        &self.enterprises
    }

    pub fn issues_api(&self) -> &issues::IssuesApi {
        &self.issues
    }

    pub fn languages_api(&self) -> &languages::LanguagesApi {
        &self.languages
    }

    pub fn measures_api(&self) -> &measures::MeasuresApi {
        &self.measures
    }

    pub fn metrics_api(&self) -> &metrics::MetricsApi {
        &self.metrics
    }

    pub fn plugins_api(&self) -> &plugins::PluginsApi {
        &self.plugins
    }

    pub fn portfolios_api(&self) -> &portfolios::PortfoliosApi {
        &self.portfolios
    }

    pub fn projects_api(&self) -> &projects::ProjectsApi {
        &self.projects
    }

    pub fn quality_gates_api(&self) -> &quality_gates::QualityGatesApi {
        &self.quality_gates
    }

    pub fn rules_api(&self) -> &rules::RulesApi {
        &self.rules
    }

    pub fn sca_api(&self) -> &sca::ScaApi {
        &self.sca
    }

    pub fn settings_api(&self) -> &settings::SettingsApi {
        &self.settings
    }

    pub fn sources_api(&self) -> &sources::SourcesApi {
        &self.sources
    }

    pub fn system_api(&self) -> &system::SystemApi {
        &self.system
    }

    pub fn webhooks_api(&self) -> &webhooks::WebhooksApi {
        &self.webhooks
    }
}
