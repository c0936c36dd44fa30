//! Query string construction.
//!
//! Endpoints take a mix of optional scalar, boolean and list parameters.
//! Absent values must be omitted entirely and list values are comma-joined
//! before being percent-encoded, so the query is built by plain string
//! concatenation rather than through a URL library.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters escaped in query parameter values and form bodies.
///
/// Everything except `[A-Za-z0-9.*_-]` is percent-encoded; the space is
/// kept out of the set so it can be rewritten to `+` afterwards.
const FORM_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'.')
    .remove(b'*')
    .remove(b'_')
    .remove(b'-')
    .remove(b' ');

/// Percent-encode a query or form value.
pub fn url_encode(value: &str) -> String {
    utf8_percent_encode(value, FORM_ENCODE_SET)
        .to_string()
        .replace(' ', "+")
}

/// Incremental builder for a relative request path with query parameters.
///
/// Parameters appear in insertion order. The first one is prefixed with
/// `?`, every subsequent one with `&`. A parameter whose value is `None`
/// (or an empty list) is skipped.
#[derive(Debug, Clone)]
pub struct UrlBuilder {
    path: String,
    params: Vec<(String, String)>,
}

impl UrlBuilder {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            params: Vec::new(),
        }
    }

    /// Add an optional scalar parameter.
    pub fn param(mut self, name: &str, value: Option<&str>) -> Self {
        if let Some(value) = value {
            self.params.push((name.to_string(), url_encode(value)));
        }
        self
    }

    /// Add an optional boolean parameter, rendered as `true`/`false`.
    pub fn bool_param(self, name: &str, value: Option<bool>) -> Self {
        self.param(name, value.map(|v| if v { "true" } else { "false" }))
    }

    /// Add an optional integer parameter.
    pub fn int_param(self, name: &str, value: Option<i64>) -> Self {
        self.param(name, value.map(|v| v.to_string()).as_deref())
    }

    /// Add an optional multi-valued parameter.
    ///
    /// Values are comma-joined first and the joined token is encoded as a
    /// whole, so `["x", "y"]` renders as `x%2Cy`. Empty lists are skipped.
    pub fn list_param(mut self, name: &str, values: Option<&[String]>) -> Self {
        if let Some(values) = values {
            if !values.is_empty() {
                let joined = values.join(",");
                self.params.push((name.to_string(), url_encode(&joined)));
            }
        }
        self
    }

    /// Serialize the path and accumulated parameters.
    pub fn build(self) -> String {
        let mut url = self.path;
        for (i, (name, value)) in self.params.iter().enumerate() {
            url.push(if i == 0 { '?' } else { '&' });
            url.push_str(name);
            url.push('=');
            url.push_str(value);
        }
        url
    }
}
