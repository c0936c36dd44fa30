//! Enterprise listing, only meaningful for the multi-tenant cloud.

use crate::error::ServerApiError;
use crate::helper::ServerApiHelper;
use crate::url::UrlBuilder;
use serde::Deserialize;
use std::sync::Arc;

pub const ENTERPRISES_PATH: &str = "/enterprises/enterprises";

pub struct EnterprisesApi {
    helper: Arc<ServerApiHelper>,
}

impl EnterprisesApi {
    pub fn new(helper: Arc<ServerApiHelper>) -> Self {
        Self { helper }
    }

    /// The endpoint returns a bare JSON array rather than an object.
    pub async fn list(&self, enterprise_key: Option<&str>) -> Result<Vec<Enterprise>, ServerApiError> {
        let url = UrlBuilder::new(ENTERPRISES_PATH)
            .param("enterpriseKey", enterprise_key)
            .build();
        self.helper.get_api_subdomain(&url).await?.json()
    }
}

#[derive(Debug, Deserialize)]
pub struct Enterprise {
    pub id: String,
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(rename = "defaultPortfolioPermissionTemplateId", default)]
    pub default_portfolio_permission_template_id: Option<String>,
}
