//! Execute Request Use Case
//!
//! Sends one GET request through the `HttpClient` port and returns the
//! response or the error that prevented it.

use std::sync::Arc;

use apiprobe_domain::request::{RequestSpec, ResolvedRequest};
use apiprobe_domain::response::ResponseSpec;
use tracing::{debug, info};

use crate::error::ApplicationResult;
use crate::ports::HttpClient;

/// Use case for executing HTTP requests.
///
/// # Example
///
/// ```ignore
/// let client = ReqwestHttpClient::new()?;
/// let use_case = ExecuteRequest::new(Arc::new(client));
///
/// let request = RequestSpec::get("http://api.zippopotam.us/us/90210");
/// let response = use_case.execute(&request).await?;
/// ```
pub struct ExecuteRequest<C: HttpClient + ?Sized> {
    client: Arc<C>,
}

impl<C: HttpClient + ?Sized> ExecuteRequest<C> {
    /// Creates a new `ExecuteRequest` use case with the given HTTP client.
    pub const fn new(client: Arc<C>) -> Self {
        Self { client }
    }

    /// Resolves the request URL, then executes the request.
    ///
    /// No retries and no caching: every call is one outbound request.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Domain` if the URL cannot be resolved and
    /// `ApplicationError::Http` on transport failures.
    pub async fn execute(&self, request: &RequestSpec) -> ApplicationResult<ResponseSpec> {
        let resolved = request.resolve()?;
        self.send(&resolved).await
    }

    /// Sends a request whose URL was already resolved.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Http` on transport failures.
    pub async fn send(&self, request: &ResolvedRequest) -> ApplicationResult<ResponseSpec> {
        debug!(method = request.method(), uri = %request.url(), "sending request");

        let response = self.client.execute(request).await?;

        info!(
            uri = %request.url(),
            status = response.status,
            elapsed_ms = u64::try_from(response.duration.as_millis()).unwrap_or(u64::MAX),
            "response received"
        );
        Ok(response)
    }
}

impl<C: HttpClient + ?Sized> Clone for ExecuteRequest<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::time::Duration;

    use apiprobe_domain::DomainError;
    use async_trait::async_trait;

    use crate::error::ApplicationError;
    use crate::ports::HttpClientError;

    /// Mock HTTP client for testing.
    struct MockHttpClient {
        response: Result<ResponseSpec, HttpClientError>,
        calls: Mutex<Vec<String>>,
    }

    impl MockHttpClient {
        fn success() -> Self {
            Self {
                response: Ok(ResponseSpec::new(
                    200u16,
                    HashMap::new(),
                    b"OK",
                    Duration::from_millis(50),
                )),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn error(err: HttpClientError) -> Self {
            Self {
                response: Err(err),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HttpClient for MockHttpClient {
        async fn execute(
            &self,
            request: &ResolvedRequest,
        ) -> Result<ResponseSpec, HttpClientError> {
            self.calls.lock().unwrap().push(request.url().to_string());
            self.response.clone()
        }
    }

    #[tokio::test]
    async fn test_execute_success() {
        let client = Arc::new(MockHttpClient::success());
        let use_case = ExecuteRequest::new(Arc::clone(&client));

        let request = RequestSpec::get("http://api.zippopotam.us/{country}/{zip}")
            .with_path_param("country", "us")
            .with_path_param("zip", 90210);
        let response = use_case.execute(&request).await.unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(client.calls(), vec!["http://api.zippopotam.us/us/90210"]);
    }

    #[tokio::test]
    async fn test_execute_transport_error() {
        let client = Arc::new(MockHttpClient::error(HttpClientError::Timeout {
            timeout_ms: 30_000,
        }));
        let use_case = ExecuteRequest::new(client);

        let result = use_case
            .execute(&RequestSpec::get("https://example.com"))
            .await;
        assert!(matches!(
            result,
            Err(ApplicationError::Http(HttpClientError::Timeout { .. }))
        ));
    }

    #[tokio::test]
    async fn test_unresolvable_request_never_sent() {
        let client = Arc::new(MockHttpClient::success());
        let use_case = ExecuteRequest::new(Arc::clone(&client));

        let result = use_case.execute(&RequestSpec::get("/{APIName}")).await;
        assert!(matches!(
            result,
            Err(ApplicationError::Domain(DomainError::MissingPathParam(_)))
        ));
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn test_each_call_sends_once() {
        let client = Arc::new(MockHttpClient::success());
        let use_case = ExecuteRequest::new(Arc::clone(&client));

        for page in 1..=10 {
            let request = RequestSpec::get("https://gorest.co.in/public/v1/users")
                .with_query_param("page", page);
            use_case.execute(&request).await.unwrap();
        }

        let calls = client.calls();
        assert_eq!(calls.len(), 10);
        assert_eq!(calls[2], "https://gorest.co.in/public/v1/users?page=3");
    }

    #[tokio::test]
    async fn test_send_uses_resolved_url() {
        let client = Arc::new(MockHttpClient::success());
        let use_case = ExecuteRequest::new(Arc::clone(&client));

        let resolved = RequestSpec::get("/{APIName}")
            .with_base_uri("https://gorest.co.in/public/v1")
            .with_path_param("APIName", "users")
            .with_query_param("page", 2)
            .resolve()
            .unwrap();
        use_case.send(&resolved).await.unwrap();

        assert_eq!(
            client.calls(),
            vec!["https://gorest.co.in/public/v1/users?page=2"]
        );
    }
}
