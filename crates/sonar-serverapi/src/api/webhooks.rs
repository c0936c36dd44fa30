//! Webhook listing and creation.

use crate::error::ServerApiError;
use crate::helper::ServerApiHelper;
use crate::http::FORM_URL_ENCODED_CONTENT_TYPE;
use crate::url::{url_encode, UrlBuilder};
use serde::Deserialize;
use std::sync::Arc;

pub const CREATE_PATH: &str = "/api/webhooks/create";
pub const LIST_PATH: &str = "/api/webhooks/list";

pub struct WebhooksApi {
    helper: Arc<ServerApiHelper>,
}

impl WebhooksApi {
    pub fn new(helper: Arc<ServerApiHelper>) -> Self {
        Self { helper }
    }

    /// Create a webhook. The organization goes in the query string while
    /// the webhook fields travel in the form body.
    pub async fn create_webhook(
        &self,
        name: &str,
        url: &str,
        project: Option<&str>,
        secret: Option<&str>,
    ) -> Result<CreateWebhookResponse, ServerApiError> {
        let path = UrlBuilder::new(CREATE_PATH)
            .param("organization", self.helper.organization())
            .build();
        let body = build_create_body(name, url, project, secret);
        self.helper
            .post(&path, FORM_URL_ENCODED_CONTENT_TYPE, body)
            .await?
            .json()
    }

    pub async fn list_webhooks(
        &self,
        project: Option<&str>,
    ) -> Result<WebhookListResponse, ServerApiError> {
        let url = UrlBuilder::new(LIST_PATH)
            .param("organization", self.helper.organization())
            .param("project", project)
            .build();
        self.helper.get(&url).await?.json()
    }
}

fn build_create_body(name: &str, url: &str, project: Option<&str>, secret: Option<&str>) -> String {
    let mut params = vec![
        format!("name={}", url_encode(name)),
        format!("url={}", url_encode(url)),
    ];
    if let Some(project) = project {
        params.push(format!("project={}", url_encode(project)));
    }
    if let Some(secret) = secret {
        params.push(format!("secret={}", url_encode(secret)));
    }
    params.join("&")
}

#[derive(Debug, Deserialize)]
pub struct CreateWebhookResponse {
    pub webhook: Webhook,
}

#[derive(Debug, Deserialize)]
pub struct WebhookListResponse {
    #[serde(default)]
    pub webhooks: Vec<Webhook>,
}

#[derive(Debug, Deserialize)]
pub struct Webhook {
    pub key: String,
    pub name: String,
    pub url: String,
    #[serde(rename = "hasSecret", default)]
    pub has_secret: bool,
}
