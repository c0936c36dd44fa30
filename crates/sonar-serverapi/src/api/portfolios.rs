//! Portfolio listing.
//!
//! The two deployment flavors expose portfolios through entirely
//! different endpoints: the multi-tenant cloud serves them from the api
//! subdomain while the self-hosted server reuses its views search. The
//! response shape differs as well, so both variants are kept in a single
//! struct with optional halves.

use crate::error::ServerApiError;
use crate::helper::ServerApiHelper;
use crate::paging::Paging;
use crate::url::UrlBuilder;
use serde::Deserialize;
use std::sync::Arc;

pub const VIEWS_SEARCH_PATH: &str = "/api/views/search";
pub const PORTFOLIOS_PATH: &str = "/enterprises/portfolios";

pub struct PortfoliosApi {
    helper: Arc<ServerApiHelper>,
}

impl PortfoliosApi {
    pub fn new(helper: Arc<ServerApiHelper>) -> Self {
        Self { helper }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn list(
        &self,
        enterprise_id: Option<&str>,
        query: Option<&str>,
        favorite: Option<bool>,
        draft: Option<bool>,
        page_index: Option<i64>,
        page_size: Option<i64>,
    ) -> Result<PortfolioListResponse, ServerApiError> {
        if self.helper.organization().is_some() {
            let url = UrlBuilder::new(PORTFOLIOS_PATH)
                .param("enterpriseId", enterprise_id)
                .param("q", query)
                .bool_param("favorite", favorite)
                .bool_param("draft", draft)
                .int_param("pageIndex", page_index)
                .int_param("pageSize", page_size)
                .build();
            self.helper.get_api_subdomain(&url).await?.json()
        } else {
            // VW is the portfolio qualifier
            let url = UrlBuilder::new(VIEWS_SEARCH_PATH)
                .param("q", query)
                .bool_param("onlyFavorites", favorite)
                .int_param("p", page_index)
                .int_param("ps", page_size)
                .param("qualifiers", Some("VW"))
                .build();
            self.helper.get(&url).await?.json()
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PortfolioListResponse {
    // Self-hosted server fields
    #[serde(default)]
    pub components: Option<Vec<ViewComponent>>,
    #[serde(default)]
    pub paging: Option<Paging>,
    // Cloud fields
    #[serde(default)]
    pub portfolios: Option<Vec<Portfolio>>,
    #[serde(default)]
    pub page: Option<Paging>,
}

#[derive(Debug, Deserialize)]
pub struct ViewComponent {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub qualifier: Option<String>,
    #[serde(default)]
    pub visibility: Option<String>,
    #[serde(rename = "isFavorite", default)]
    pub is_favorite: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct Portfolio {
    pub id: String,
    #[serde(rename = "enterpriseId", default)]
    pub enterprise_id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub selection: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(rename = "isDraft", default)]
    pub is_draft: Option<bool>,
    #[serde(rename = "draftStage", default)]
    pub draft_stage: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helper::EndpointParams;
    use crate::http::HttpClient;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn api_for(uri: &str, organization: Option<&str>) -> PortfoliosApi {
        let helper = ServerApiHelper::new(
            EndpointParams::new(uri, organization.map(str::to_string)),
            HttpClient::new("test-agent", Some("token".to_string())).unwrap(),
        );
        PortfoliosApi::new(Arc::new(helper))
    }

    #[tokio::test]
    async fn test_server_flavor_uses_views_search() {
        let server = MockServer::start().await;
        let body = serde_json::json!({
            "components": [
                {"key": "apache", "name": "Apache", "qualifier": "VW",
                 "visibility": "public", "isFavorite": true}
            ],
            "paging": {"pageIndex": 1, "pageSize": 100, "total": 1}
        });
        Mock::given(method("GET"))
            .and(path("/api/views/search"))
            .and(query_param("qualifiers", "VW"))
            .and(query_param("onlyFavorites", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let response = api_for(&server.uri(), None)
            .list(None, None, Some(true), None, None, None)
            .await
            .unwrap();
        let components = response.components.unwrap();
        assert_eq!(components[0].key, "apache");
        assert_eq!(components[0].is_favorite, Some(true));
    }

    #[tokio::test]
    async fn test_cloud_flavor_uses_portfolios_path() {
        let server = MockServer::start().await;
        let body = serde_json::json!({
            "portfolios": [
                {"id": "uuid-1", "enterpriseId": "ent-1", "name": "Backend",
                 "description": "All backend services", "selection": "manual",
                 "tags": ["core"], "isDraft": false}
            ],
            "page": {"pageIndex": 2, "pageSize": 50, "total": 80}
        });
        Mock::given(method("GET"))
            .and(path("/enterprises/portfolios"))
            .and(query_param("enterpriseId", "ent-1"))
            .and(query_param("pageIndex", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let response = api_for(&server.uri(), Some("my-org"))
            .list(Some("ent-1"), None, None, None, Some(2), None)
            .await
            .unwrap();
        let portfolios = response.portfolios.unwrap();
        assert_eq!(portfolios[0].name, "Backend");
        assert_eq!(response.page.unwrap().total, 80);
    }
}
