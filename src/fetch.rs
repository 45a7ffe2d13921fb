//! HTTP plumbing shared by the remote record store and the auth client
//!
//! Every remote call goes through [`FetchBuilder`], which owns the three
//! pieces of normalization the backend's inconsistent error bodies require:
//! a per-request deadline surfaced as [`Error::Timeout`], status-code
//! classification, and best-effort extraction of a human-readable message
//! from whatever JSON the server sent back.

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::time::Duration;
use url::Url;

use crate::error::{Error, Result};

const DEFAULT_TIMEOUT_MESSAGE: &str = "Request timed out. The server may be starting—try again.";

/// Helper for building and executing HTTP requests
pub(crate) struct FetchBuilder<'a> {
    client: &'a Client,
    url: String,
    method: Method,
    headers: HeaderMap,
    query: Vec<(String, String)>,
    body: Option<Vec<u8>>,
    timeout: Option<Duration>,
    timeout_message: &'static str,
    fallback: Option<String>,
}

impl<'a> FetchBuilder<'a> {
    fn new(client: &'a Client, url: &str, method: Method) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));

        Self {
            client,
            url: url.to_string(),
            method,
            headers,
            query: Vec::new(),
            body: None,
            timeout: None,
            timeout_message: DEFAULT_TIMEOUT_MESSAGE,
            fallback: None,
        }
    }

    /// Attach `Authorization: Token <value>` when a session token is present.
    pub fn token_auth(mut self, token: Option<&str>) -> Self {
        if let Some(token) = token {
            if let Ok(value) = HeaderValue::from_str(&format!("Token {token}")) {
                self.headers.insert("Authorization", value);
            }
        }
        self
    }

    /// Add query parameters to the request URL.
    pub fn query(mut self, pairs: &[(&str, &str)]) -> Self {
        self.query
            .extend(pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())));
        self
    }

    /// Attach a JSON body.
    pub fn json<T: Serialize>(mut self, body: &T) -> Result<Self> {
        let json = serde_json::to_vec(body)
            .map_err(|e| Error::request_failed(format!("Failed to encode request body: {e}")))?;
        self.body = Some(json);
        Ok(self)
    }

    /// Bound the whole request; a miss surfaces as [`Error::Timeout`].
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Message used when the deadline is missed.
    pub fn timeout_message(mut self, message: &'static str) -> Self {
        self.timeout_message = message;
        self
    }

    /// Fallback message when the error body yields nothing usable. A
    /// `{status}` placeholder is replaced with the numeric HTTP status.
    pub fn fallback(mut self, message: impl Into<String>) -> Self {
        self.fallback = Some(message.into());
        self
    }

    fn build(&self) -> Result<reqwest::RequestBuilder> {
        let mut url = Url::parse(&self.url)
            .map_err(|e| Error::config(format!("Invalid request URL {}: {e}", self.url)))?;

        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &self.query {
                pairs.append_pair(key, value);
            }
        }

        let mut req = self.client.request(self.method.clone(), url);
        req = req.headers(self.headers.clone());
        if let Some(timeout) = self.timeout {
            req = req.timeout(timeout);
        }
        if let Some(body) = &self.body {
            req = req.body(body.clone());
        }

        Ok(req)
    }

    async fn send(&self) -> Result<reqwest::Response> {
        log::debug!("{} {}", self.method, self.url);
        let req = self.build()?;
        req.send().await.map_err(|e| {
            if e.is_timeout() {
                Error::timeout(self.timeout_message)
            } else {
                Error::request_failed(e.to_string())
            }
        })
    }

    fn reject(&self, status: StatusCode, body: Value) -> Error {
        let fallback = self
            .fallback
            .as_ref()
            .map(|t| t.replace("{status}", status.as_str()));
        let message = error_message(&body, fallback.as_deref());
        log::debug!("{} {} -> {status}: {message}", self.method, self.url);
        // 400/422 carry server-side validation output; everything else is a
        // plain request failure. Remote 404s stay RequestFailed: NotFound is
        // reserved for local-store misses.
        match status {
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => Error::validation(message),
            _ => Error::request_failed(message),
        }
    }

    /// Execute and decode a JSON response.
    pub async fn execute<T: DeserializeOwned>(self) -> Result<T> {
        let response = self.send().await?;
        let status = response.status();

        if !status.is_success() {
            // An undecodable error body becomes an empty object so message
            // extraction still proceeds.
            let body = response.json::<Value>().await.unwrap_or_else(|_| Value::Object(Default::default()));
            return Err(self.reject(status, body));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| Error::request_failed(format!("Failed to decode response body: {e}")))
    }

    /// Execute without decoding a success body.
    pub async fn execute_unit(self) -> Result<()> {
        let response = self.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.json::<Value>().await.unwrap_or_else(|_| Value::Object(Default::default()));
            return Err(self.reject(status, body));
        }

        Ok(())
    }
}

/// Helper for creating HTTP requests
pub(crate) struct Fetch;

impl Fetch {
    pub fn get<'a>(client: &'a Client, url: &str) -> FetchBuilder<'a> {
        FetchBuilder::new(client, url, Method::GET)
    }

    pub fn post<'a>(client: &'a Client, url: &str) -> FetchBuilder<'a> {
        FetchBuilder::new(client, url, Method::POST)
    }

    pub fn put<'a>(client: &'a Client, url: &str) -> FetchBuilder<'a> {
        FetchBuilder::new(client, url, Method::PUT)
    }

    pub fn delete<'a>(client: &'a Client, url: &str) -> FetchBuilder<'a> {
        FetchBuilder::new(client, url, Method::DELETE)
    }
}

/// Pull the first human-readable message out of a backend error body.
///
/// The backend is inconsistent: global errors arrive as a top-level
/// `detail` (string or array), field-level validation errors as a map of
/// field name to message or list of messages. The rule, in order: a usable
/// `detail` wins; otherwise the first string among the body's values with
/// arrays flattened one level; otherwise the first string leading a nested
/// array; otherwise the fallback.
pub(crate) fn error_message(body: &Value, fallback: Option<&str>) -> String {
    if body.is_null() {
        return fallback.unwrap_or("Request failed.").to_string();
    }

    if let Some(detail) = body.get("detail") {
        if is_truthy(detail) {
            let message = match detail {
                Value::String(s) => Some(s.clone()),
                Value::Array(items) => items
                    .first()
                    .and_then(|v| v.as_str())
                    .filter(|s| !s.is_empty())
                    .map(String::from),
                _ => None,
            };
            return message.unwrap_or_else(|| fallback.unwrap_or("Request failed.").to_string());
        }
    }

    let top: Vec<&Value> = match body {
        Value::Object(map) => map.values().collect(),
        Value::Array(items) => items.iter().collect(),
        _ => Vec::new(),
    };

    // One level of flattening, like the field-error maps the backend emits.
    let mut flat: Vec<&Value> = Vec::new();
    for value in top {
        match value {
            Value::Array(items) => flat.extend(items.iter()),
            other => flat.push(other),
        }
    }

    if let Some(s) = flat
        .iter()
        .find_map(|v| v.as_str())
        .filter(|s| !s.is_empty())
    {
        return s.to_string();
    }

    if let Some(s) = flat
        .iter()
        .find_map(|v| v.as_array().and_then(|a| a.first()).and_then(|v| v.as_str()))
        .filter(|s| !s.is_empty())
    {
        return s.to_string();
    }

    fallback
        .unwrap_or("Something went wrong. Check the backend and try again.")
        .to_string()
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn detail_string_wins() {
        let body = json!({ "detail": "Invalid token.", "email": ["ignored"] });
        assert_eq!(error_message(&body, None), "Invalid token.");
    }

    #[test]
    fn detail_array_takes_first_string() {
        let body = json!({ "detail": ["First problem.", "Second problem."] });
        assert_eq!(error_message(&body, None), "First problem.");
    }

    #[test]
    fn unusable_detail_falls_back_without_scanning() {
        let body = json!({ "detail": { "nested": "thing" }, "email": ["Would match."] });
        assert_eq!(error_message(&body, Some("Custom fallback.")), "Custom fallback.");
        assert_eq!(error_message(&body, None), "Request failed.");
    }

    #[test]
    fn field_error_map_yields_first_string() {
        let body = json!({ "employee_id": ["employee with this employee id already exists."] });
        assert_eq!(
            error_message(&body, None),
            "employee with this employee id already exists."
        );

        let body = json!({ "email": "Enter a valid email address." });
        assert_eq!(error_message(&body, None), "Enter a valid email address.");
    }

    #[test]
    fn nested_arrays_are_reached_after_flat_values() {
        let body = json!({ "errors": [["Deeply nested message."]] });
        assert_eq!(error_message(&body, None), "Deeply nested message.");
    }

    #[test]
    fn empty_body_uses_generic_message() {
        assert_eq!(
            error_message(&json!({}), None),
            "Something went wrong. Check the backend and try again."
        );
        assert_eq!(error_message(&Value::Null, None), "Request failed.");
        assert_eq!(
            error_message(&json!({}), Some("Failed to fetch employees (503). Check backend URL.")),
            "Failed to fetch employees (503). Check backend URL."
        );
    }

    #[test]
    fn non_string_values_are_skipped() {
        let body = json!({ "count": 3, "ok": false, "message": "Real problem." });
        assert_eq!(error_message(&body, None), "Real problem.");
    }
}
