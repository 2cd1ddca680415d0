//! The HTTP capability a host hands to its nodes.
//!
//! Nodes never talk to the network directly; they build an [`HttpRequest`]
//! and pass it to whatever [`HttpClient`] the host injected. [`ReqwestClient`]
//! is the production implementation.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::HttpError;

/// HTTP verbs nodes may issue. Every Site List call is a POST.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Post,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Post => "POST",
        })
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Post => Self::POST,
        }
    }
}

/// A single outbound request with a JSON body.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    /// Header name/value pairs, sent in order.
    #[serde(default)]
    pub headers: Vec<(String, String)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl HttpRequest {
    pub fn post(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Case-insensitive header lookup.
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

// Authorization carries the API key; keep it out of logs.
impl fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let headers: Vec<(&str, &str)> = self
            .headers
            .iter()
            .map(|(k, v)| {
                if k.eq_ignore_ascii_case("authorization") {
                    (k.as_str(), "[REDACTED]")
                } else {
                    (k.as_str(), v.as_str())
                }
            })
            .collect();

        f.debug_struct("HttpRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("headers", &headers)
            .field("body", &self.body)
            .finish()
    }
}

/// Issues a request and returns the parsed JSON body, or fails.
///
/// Any non-2xx response is a failure. A successful empty body parses as
/// `Value::Null`.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn request(&self, request: HttpRequest) -> Result<Value, HttpError>;
}

// ---------------------------------------------------------------------------
// reqwest-backed capability
// ---------------------------------------------------------------------------

/// Transport settings for [`ReqwestClient`].
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// `None` leaves reqwest's default (no overall timeout).
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: None,
            user_agent: concat!("wix-sites/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// [`HttpClient`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    http: reqwest::Client,
}

impl ReqwestClient {
    pub fn new(config: &HttpClientConfig) -> Result<Self, HttpError> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.as_str());
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        let http = builder
            .build()
            .map_err(|e| HttpError::new(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http })
    }

    fn error_message(status: reqwest::StatusCode, raw: String) -> String {
        if let Ok(ErrorBody { message: Some(message) }) = serde_json::from_str::<ErrorBody>(&raw) {
            if !message.is_empty() {
                return message;
            }
        }
        if raw.trim().is_empty() {
            status.to_string()
        } else {
            raw
        }
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn request(&self, request: HttpRequest) -> Result<Value, HttpError> {
        debug!("{} {}", request.method, request.url);

        let mut builder = self
            .http
            .request(request.method.into(), request.url.as_str());
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let resp = builder
            .send()
            .await
            .map_err(|e| HttpError::new(e.to_string()))?;

        let status = resp.status();
        let raw = resp
            .text()
            .await
            .map_err(|e| HttpError::with_status(status.as_u16(), e.to_string()))?;

        if !status.is_success() {
            debug!("{} {} -> {}", request.method, request.url, status);
            return Err(HttpError::with_status(
                status.as_u16(),
                Self::error_message(status, raw),
            ));
        }

        if raw.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&raw).map_err(|e| {
            let preview = raw.chars().take(200).collect::<String>();
            HttpError::with_status(
                status.as_u16(),
                format!("invalid JSON in response: {e} (body preview: {preview:?})"),
            )
        })
    }
}
