//! HTTP transport seam.
//!
//! The REST client builds a fully-formed [`HttpRequest`] and hands it to an
//! [`HttpTransport`]. Production uses [`ReqwestTransport`]; tests plug in a
//! recording spy.

use std::error::Error as StdError;

use async_trait::async_trait;
use reqwest::Method;
use tracing::debug;

use common::{Error, Result};

/// A request ready to go on the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    /// Base URL + path, without query string.
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Raw status + body as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Perform exactly one request/response exchange. Non-2xx statuses are
    /// returned as responses, not errors.
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// Render a reqwest error with its chained causes so DNS/TLS/socket failures
/// are visible in logs.
pub fn format_reqwest_error(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();

    while let Some(cause) = source {
        let cause_msg = cause.to_string();
        if !cause_msg.is_empty() && !message.contains(&cause_msg) {
            message.push_str(": ");
            message.push_str(&cause_msg);
        }
        source = cause.source();
    }

    message
}

/// [`HttpTransport`] backed by `reqwest`.
///
/// No client-side timeout is set; supply a configured client through
/// [`ReqwestTransport::with_client`] to impose one.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(4)
            .tcp_keepalive(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| Error::Transport(Box::new(e)))?;

        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let mut req = self.client.request(request.method, &request.url);

        for (name, value) in &request.headers {
            req = req.header(name.as_str(), value.as_str());
        }
        if !request.query.is_empty() {
            req = req.query(&request.query);
        }
        if let Some(body) = &request.body {
            req = req.json(body);
        }

        let resp = req.send().await.map_err(|e| {
            debug!("Transport failure: {}", format_reqwest_error(&e));
            Error::Transport(Box::new(e))
        })?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| Error::Transport(Box::new(e)))?;

        Ok(HttpResponse { status, body })
    }
}
