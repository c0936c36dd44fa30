//! HTTP transport.
//!
//! A single pooled `reqwest::Client` is shared across every call. The
//! backend does not negotiate protocol upgrades, so the client pins
//! HTTP/1.1. Redirects are followed manually because the default redirect
//! behavior downgrades a redirected POST into a GET, which would corrupt
//! write operations such as issue transitions and webhook creation.

use crate::error::ServerApiError;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, LOCATION};
use reqwest::{Method, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

const MAX_REDIRECTS: usize = 5;
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Form content type used by the state-changing endpoints.
pub const FORM_URL_ENCODED_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Buffered HTTP response envelope.
#[derive(Debug)]
pub struct Response {
    code: u16,
    url: String,
    body: Vec<u8>,
}

impl Response {
    pub(crate) fn new(code: u16, url: String, body: Vec<u8>) -> Self {
        Self { code, url, body }
    }

    /// HTTP status code.
    pub fn code(&self) -> u16 {
        self.code
    }

    /// The URL that produced this response (after redirects).
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_successful(&self) -> bool {
        (200..300).contains(&self.code)
    }

    /// Body decoded as UTF-8, with invalid sequences replaced.
    pub fn body_as_string(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Raw body bytes, consuming the envelope.
    pub fn into_body(self) -> Vec<u8> {
        self.body
    }

    /// Deserialize the body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, ServerApiError> {
        serde_json::from_slice(&self.body).map_err(|source| ServerApiError::Json {
            url: self.url.clone(),
            source,
        })
    }
}

/// Pooled HTTP/1.1 client with a fixed user-agent and an optional bearer
/// token. Whether a given call authenticates is decided per call, not here.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    token: Option<String>,
}

impl HttpClient {
    /// Build a client carrying a bearer token for authenticated calls.
    pub fn new(user_agent: &str, token: Option<String>) -> Result<Self, ServerApiError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .http1_only()
            .connect_timeout(CONNECT_TIMEOUT)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(Self { client, token })
    }

    /// Build a client that never authenticates, for probing local services.
    pub fn without_token(user_agent: &str) -> Result<Self, ServerApiError> {
        Self::new(user_agent, None)
    }

    /// Authenticated GET.
    pub async fn get(&self, url: &str) -> Result<Response, ServerApiError> {
        self.execute(Method::GET, url, None, true).await
    }

    /// GET without credentials, for endpoints that must work
    /// pre-authentication (connectivity probes).
    pub async fn get_anonymous(&self, url: &str) -> Result<Response, ServerApiError> {
        self.execute(Method::GET, url, None, false).await
    }

    /// Authenticated POST with an explicit content type.
    pub async fn post(
        &self,
        url: &str,
        content_type: &str,
        body: String,
    ) -> Result<Response, ServerApiError> {
        self.execute(Method::POST, url, Some((content_type.to_string(), body)), true)
            .await
    }

    /// POST without credentials.
    pub async fn post_anonymous(
        &self,
        url: &str,
        content_type: &str,
        body: String,
    ) -> Result<Response, ServerApiError> {
        self.execute(Method::POST, url, Some((content_type.to_string(), body)), false)
            .await
    }

    async fn execute(
        &self,
        method: Method,
        url: &str,
        body: Option<(String, String)>,
        authenticated: bool,
    ) -> Result<Response, ServerApiError> {
        let mut url = url.to_string();
        for _ in 0..=MAX_REDIRECTS {
            debug!(%method, %url, "sending request");
            let mut request = self.client.request(method.clone(), &url);
            if authenticated {
                if let Some(token) = &self.token {
                    request = request.header(AUTHORIZATION, format!("Bearer {token}"));
                }
            }
            if let Some((content_type, body)) = &body {
                request = request
                    .header(CONTENT_TYPE, content_type)
                    .body(body.clone());
            }
            let response = request.send().await?;
            let status = response.status();

            if is_followable_redirect(status) {
                match redirect_target(&response) {
                    Some(target) => {
                        // Method is preserved on purpose, including for
                        // 301/302/303 answers to a POST.
                        debug!(from = %url, to = %target, "following redirect");
                        url = target;
                        continue;
                    }
                    None => {
                        warn!(%url, code = status.as_u16(), "redirect without usable location");
                    }
                }
            }

            let final_url = response.url().to_string();
            let bytes = response.bytes().await?;
            return Ok(Response::new(status.as_u16(), final_url, bytes.to_vec()));
        }
        Err(ServerApiError::TooManyRedirects(url))
    }
}

fn is_followable_redirect(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::MOVED_PERMANENTLY
            | StatusCode::FOUND
            | StatusCode::SEE_OTHER
            | StatusCode::TEMPORARY_REDIRECT
            | StatusCode::PERMANENT_REDIRECT
    )
}

fn redirect_target(response: &reqwest::Response) -> Option<String> {
    let location = response.headers().get(LOCATION)?.to_str().ok()?;
    let target = response.url().join(location).ok()?;
    Some(target.to_string())
}
