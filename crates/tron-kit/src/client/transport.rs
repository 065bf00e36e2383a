//! HTTP transport.
//!
//! The node client talks to the chain through an [`HttpTransport`] so tests
//! and hosts can substitute their own. [`ReqwestTransport`] is the default.

use std::future::Future;
use std::pin::Pin;

use tracing::trace;

use crate::error::NodeError;

/// Header hosted gateways use for API keys.
pub const API_KEY_HEADER: &str = "TRON-PRO-API-KEY";

/// Status and body of an HTTP response.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Future returned by [`HttpTransport::post_json`].
pub type TransportFuture<'a> =
    Pin<Box<dyn Future<Output = Result<HttpResponse, NodeError>> + Send + 'a>>;

/// Sends JSON POST requests to a node.
///
/// Implementations report connection-level failures as errors and return
/// every HTTP response, whatever its status, as an [`HttpResponse`].
pub trait HttpTransport: Send + Sync {
    /// POST `body` to `path` (e.g. `/wallet/broadcasttransaction`).
    fn post_json<'a>(&'a self, path: &'a str, body: serde_json::Value) -> TransportFuture<'a>;
}

/// [`HttpTransport`] over a shared `reqwest::Client`.
#[derive(Clone)]
pub struct ReqwestTransport {
    base_url: String,
    client: reqwest::Client,
    api_key: Option<String>,
}

impl ReqwestTransport {
    /// Create a transport for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            api_key: None,
        }
    }

    /// Send `TRON-PRO-API-KEY` with every request.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Use a preconfigured `reqwest::Client` (timeouts, proxies).
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .finish()
    }
}

impl HttpTransport for ReqwestTransport {
    fn post_json<'a>(&'a self, path: &'a str, body: serde_json::Value) -> TransportFuture<'a> {
        Box::pin(async move {
            let url = self.url(path);
            trace!(%url, "POST");

            let mut request = self
                .client
                .post(&url)
                .header("Content-Type", "application/json")
                .json(&body);
            if let Some(key) = &self.api_key {
                request = request.header(API_KEY_HEADER, key);
            }

            let response = request.send().await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}
