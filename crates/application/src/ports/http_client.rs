//! HTTP Client port

use apiprobe_domain::{request::ResolvedRequest, response::ResponseSpec};
use async_trait::async_trait;
use thiserror::Error;

/// Transport-level failures. These are not retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpClientError {
    /// The URL could not be parsed or resolved.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The request did not complete in time.
    #[error("request timed out after {timeout_ms}ms")]
    Timeout {
        /// Timeout that elapsed.
        timeout_ms: u64,
    },

    /// The host name could not be resolved.
    #[error("DNS lookup failed for {host}: {message}")]
    DnsError {
        /// Host that failed to resolve.
        host: String,
        /// Underlying error message.
        message: String,
    },

    /// The remote end refused the connection.
    #[error("connection refused by {host}:{port}")]
    ConnectionRefused {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
    },

    /// The connection failed for another reason (TLS, reset, ...).
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The redirect limit of the transport was exceeded.
    #[error("too many redirects")]
    TooManyRedirects,

    /// The response body could not be read.
    #[error("failed to read body: {0}")]
    Body(String),

    /// Any other transport error.
    #[error("{0}")]
    Other(String),
}

/// Port for executing HTTP requests.
///
/// This trait abstracts the HTTP client implementation, allowing
/// the application layer to be independent of specific HTTP libraries.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Sends an already resolved GET request and returns the response.
    ///
    /// The URL is final; implementations must not rewrite it. The request
    /// is sent exactly once; any status code is a successful
    /// exchange as far as this port is concerned.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails due to network issues,
    /// timeout, or other transport problems.
    async fn execute(&self, request: &ResolvedRequest) -> Result<ResponseSpec, HttpClientError>;
}
