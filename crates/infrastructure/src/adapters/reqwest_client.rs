//! HTTP Client implementation using reqwest.
//!
//! This adapter implements the `HttpClient` port using the reqwest library.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use apiprobe_application::ports::{HttpClient, HttpClientError};
use apiprobe_domain::{request::ResolvedRequest, response::ResponseSpec};
use async_trait::async_trait;
use reqwest::{Client, Method};
use tracing::{debug, trace};

const USER_AGENT: &str = concat!("apiprobe/", env!("CARGO_PKG_VERSION"));

/// HTTP client implementation using reqwest.
///
/// Wraps `reqwest::Client` and implements the `HttpClient` port from the
/// application layer. Redirects follow the reqwest default policy.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Client,
    timeout_ms: Option<u64>,
}

impl ReqwestHttpClient {
    /// Creates a new HTTP client with default settings.
    ///
    /// No timeout is configured; the transport default applies.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new() -> Result<Self, HttpClientError> {
        Self::build(None)
    }

    /// Creates a new HTTP client with a default timeout for every request.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn with_timeout(timeout: Duration) -> Result<Self, HttpClientError> {
        Self::build(Some(timeout))
    }

    /// Creates a new HTTP client with a custom reqwest client.
    #[must_use]
    pub const fn with_client(client: Client) -> Self {
        Self {
            client,
            timeout_ms: None,
        }
    }

    fn build(timeout: Option<Duration>) -> Result<Self, HttpClientError> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| HttpClientError::Other(e.to_string()))?;

        Ok(Self {
            client,
            timeout_ms: timeout.map(|t| u64::try_from(t.as_millis()).unwrap_or(u64::MAX)),
        })
    }

    /// Maps reqwest errors to the port's `HttpClientError`.
    fn map_error(error: &reqwest::Error, timeout_ms: u64) -> HttpClientError {
        if error.is_timeout() {
            return HttpClientError::Timeout { timeout_ms };
        }

        let host = error
            .url()
            .and_then(|u| u.host_str())
            .unwrap_or("unknown")
            .to_string();

        if error.is_connect() {
            let message = full_message(error);
            let lower = message.to_lowercase();
            if lower.contains("dns") || lower.contains("resolve") {
                return HttpClientError::DnsError { host, message };
            }
            if lower.contains("refused") {
                return HttpClientError::ConnectionRefused {
                    host,
                    port: error
                        .url()
                        .and_then(reqwest::Url::port_or_known_default)
                        .unwrap_or(80),
                };
            }
            return HttpClientError::ConnectionFailed(message);
        }

        if error.is_redirect() {
            return HttpClientError::TooManyRedirects;
        }

        if error.is_body() || error.is_decode() {
            return HttpClientError::Body(full_message(error));
        }

        HttpClientError::Other(full_message(error))
    }
}

/// Joins an error with its source chain, where reqwest keeps the useful part.
fn full_message(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn execute(&self, request: &ResolvedRequest) -> Result<ResponseSpec, HttpClientError> {
        let url = request.url();
        let timeout_ms = request.timeout_ms().or(self.timeout_ms).unwrap_or(0);

        let mut builder = self.client.request(Method::GET, url.clone());
        if let Some(ms) = request.timeout_ms() {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        for header in request.headers().iter() {
            builder = builder.header(&header.name, &header.value);
        }

        let start = Instant::now();
        let response = builder
            .send()
            .await
            .map_err(|e| Self::map_error(&e, timeout_ms))?;

        let status = response.status().as_u16();
        let headers: HashMap<String, String> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("<binary>").to_string()))
            .collect();

        let body = response
            .bytes()
            .await
            .map_err(|e| Self::map_error(&e, timeout_ms))?;
        let duration = start.elapsed();

        debug!(uri = %url, status, bytes = body.len(), "request completed");
        trace!(body = %String::from_utf8_lossy(&body), "response body");

        Ok(ResponseSpec::new(status, headers, &body, duration))
    }
}
