//! Project components search, used to list the projects of an
//! organization.

use crate::error::ServerApiError;
use crate::helper::ServerApiHelper;
use crate::paging::Paging;
use crate::url::UrlBuilder;
use serde::Deserialize;
use std::sync::Arc;

pub const COMPONENTS_SEARCH_PATH: &str = "/api/components/search";

pub struct ComponentsApi {
    helper: Arc<ServerApiHelper>,
}

impl ComponentsApi {
    pub fn new(helper: Arc<ServerApiHelper>) -> Self {
        Self { helper }
    }

    pub async fn search_projects_in_my_org(
        &self,
        page: i64,
    ) -> Result<ComponentSearchResponse, ServerApiError> {
        let url = UrlBuilder::new(COMPONENTS_SEARCH_PATH)
            .int_param("p", Some(page))
            .param("organization", self.helper.organization())
            .build();
        self.helper.get(&url).await?.json()
    }
}

#[derive(Debug, Deserialize)]
pub struct ComponentSearchResponse {
    pub paging: Paging,
    #[serde(default)]
    pub components: Vec<Component>,
}

#[derive(Debug, Deserialize)]
pub struct Component {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub qualifier: Option<String>,
    #[serde(default)]
    pub project: Option<String>,
}
