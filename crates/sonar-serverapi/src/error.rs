//! Error taxonomy for the REST client layer.

use crate::http::Response;
use thiserror::Error;

/// Errors raised by the transport and API request layers.
#[derive(Debug, Error)]
pub enum ServerApiError {
    /// The server answered 401.
    #[error("Not authorized. Please check server credentials.")]
    Unauthorized,

    /// The server answered 403. Details, when present, come from the
    /// response body.
    #[error("{0}")]
    Forbidden(String),

    /// The server answered 404.
    #[error("{0}")]
    NotFound(String),

    /// The server answered 5xx.
    #[error("{0}")]
    ServerInternalError(String),

    /// Any other non-2xx answer.
    #[error("{0}")]
    Http(String),

    /// The request never completed (connection, TLS, timeout, cancelled).
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body could not be decoded into the expected shape.
    #[error("Failed to decode response from {url}: {source}")]
    Json {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// The redirect chain exceeded the hop limit.
    #[error("Too many redirects on {0}")]
    TooManyRedirects(String),
}

impl ServerApiError {
    /// Map a non-2xx response to its error kind.
    pub(crate) fn from_failed_response(response: &Response) -> Self {
        match response.code() {
            401 => ServerApiError::Unauthorized,
            403 => ServerApiError::Forbidden(
                try_parse_json_error(response).unwrap_or_else(|| "Forbidden".to_string()),
            ),
            404 => ServerApiError::NotFound(format_failed_response(response, None)),
            code if code >= 500 => {
                ServerApiError::ServerInternalError(format_failed_response(response, None))
            }
            _ => ServerApiError::Http(format_failed_response(
                response,
                try_parse_json_error(response),
            )),
        }
    }
}

fn format_failed_response(response: &Response, error_msg: Option<String>) -> String {
    let mut msg = format!("Error {} on {}", response.code(), response.url());
    if let Some(error_msg) = error_msg {
        msg.push_str(": ");
        msg.push_str(&error_msg);
    }
    msg
}

/// Best-effort extraction of `{"errors": [{"msg": ...}]}` from a failed
/// response body. Parse failures are swallowed.
fn try_parse_json_error(response: &Response) -> Option<String> {
    let content = response.body_as_string();
    if content.trim().is_empty() {
        return None;
    }
    let value: serde_json::Value = serde_json::from_str(&content).ok()?;
    let errors = value.get("errors")?.as_array()?;
    let messages: Vec<&str> = errors
        .iter()
        .filter_map(|e| e.get("msg").and_then(|m| m.as_str()))
        .collect();
    if messages.is_empty() {
        None
    } else {
        Some(messages.join(", "))
    }
}
