//! Request side of the fluent chain.

use std::sync::Arc;
use std::time::Duration;

use apiprobe_application::{ApplicationError, ExecuteRequest, HttpClient, ProbeConfig};
use apiprobe_domain::request::{RequestDefaults, RequestSpec};
use apiprobe_infrastructure::{ExpectationRunner, ReqwestHttpClient};
use tracing::info;

use crate::error::ProbeResult;
use crate::response::ValidatableResponse;

/// Entry point for building and sending checked requests.
///
/// A `Probe` is cheap to share between tests: the HTTP client and the
/// optional [`RequestDefaults`] are reference counted and never mutated.
#[derive(Clone)]
pub struct Probe {
    executor: ExecuteRequest<dyn HttpClient>,
    defaults: Option<Arc<RequestDefaults>>,
    runner: ExpectationRunner,
}

impl Probe {
    /// Creates a probe backed by the reqwest client with transport defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new() -> ProbeResult<Self> {
        let client = ReqwestHttpClient::new().map_err(ApplicationError::from)?;
        Ok(Self::with_client(Arc::new(client)))
    }

    /// Creates a probe honoring the configured timeout, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn from_config(config: &ProbeConfig) -> ProbeResult<Self> {
        let client = match config.timeout_ms {
            Some(ms) => ReqwestHttpClient::with_timeout(Duration::from_millis(ms)),
            None => ReqwestHttpClient::new(),
        }
        .map_err(ApplicationError::from)?;
        Ok(Self::with_client(Arc::new(client)))
    }

    /// Creates a probe over any `HttpClient` implementation.
    #[must_use]
    pub fn with_client(client: Arc<dyn HttpClient>) -> Self {
        Self {
            executor: ExecuteRequest::new(client),
            defaults: None,
            runner: ExpectationRunner::new(),
        }
    }

    /// Sets defaults applied under every request this probe builds.
    #[must_use]
    pub fn with_defaults(mut self, defaults: RequestDefaults) -> Self {
        self.defaults = Some(Arc::new(defaults));
        self
    }

    /// Returns the shared defaults, if any.
    #[must_use]
    pub fn defaults(&self) -> Option<&RequestDefaults> {
        self.defaults.as_deref()
    }

    /// Starts a new request.
    #[must_use]
    pub fn given(&self) -> RequestBuilder<'_> {
        RequestBuilder {
            probe: self,
            base_uri: None,
            path_params: Vec::new(),
            query: Vec::new(),
            headers: Vec::new(),
            timeout_ms: None,
            spec: None,
            log_uri: false,
        }
    }
}

impl std::fmt::Debug for Probe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Probe")
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

/// Collects request settings until the target is known.
///
/// Nothing is sent until [`RequestBuilder::get`] is awaited.
#[derive(Debug)]
#[must_use = "a request is only sent by calling `.get(..)`"]
pub struct RequestBuilder<'a> {
    probe: &'a Probe,
    base_uri: Option<String>,
    path_params: Vec<(String, String)>,
    query: Vec<(String, String)>,
    headers: Vec<(String, String)>,
    timeout_ms: Option<u64>,
    spec: Option<&'a RequestDefaults>,
    log_uri: bool,
}

impl<'a> RequestBuilder<'a> {
    /// Sets the base URI for a relative target.
    pub fn base_uri(mut self, base_uri: impl Into<String>) -> Self {
        self.base_uri = Some(base_uri.into());
        self
    }

    /// Sets a `{name}` path parameter.
    pub fn path_param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.path_params.push((name.into(), value.to_string()));
        self
    }

    /// Appends a query parameter.
    pub fn query_param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Alias of [`RequestBuilder::query_param`].
    pub fn param(self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query_param(key, value)
    }

    /// Sets a header; a later call with the same name wins.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets a timeout for this request only.
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(duration_ms(timeout));
        self
    }

    /// Layers a reusable request specification under this request.
    ///
    /// It takes precedence over the probe-wide defaults.
    pub const fn spec(mut self, defaults: &'a RequestDefaults) -> Self {
        self.spec = Some(defaults);
        self
    }

    /// Logs the resolved URI at `info` level before sending.
    pub const fn log_uri(mut self) -> Self {
        self.log_uri = true;
        self
    }

    /// Builds the request for `target` without sending it.
    pub fn build(self, target: impl Into<String>) -> RequestSpec {
        let mut request = RequestSpec::get(target);
        if let Some(base_uri) = self.base_uri {
            request = request.with_base_uri(base_uri);
        }
        for (name, value) in self.path_params {
            request = request.with_path_param(name, value);
        }
        for (key, value) in self.query {
            request = request.with_query_param(key, value);
        }
        for (name, value) in self.headers {
            request = request.with_header(name, value);
        }
        if let Some(ms) = self.timeout_ms {
            request = request.with_timeout_ms(ms);
        }
        if let Some(spec) = self.spec {
            request = request.apply_defaults(spec);
        }
        if let Some(defaults) = self.probe.defaults.as_deref() {
            request = request.apply_defaults(defaults);
        }
        request
    }

    /// Sends a GET request to `target` and waits for the response.
    ///
    /// `target` is an absolute URL or a path relative to the base URI, and
    /// may contain `{name}` placeholders.
    ///
    /// # Errors
    ///
    /// Returns `ProbeError::Request` if the request cannot be resolved or the
    /// transport fails. Status codes are not errors here; check them on the
    /// returned response.
    pub async fn get(self, target: impl Into<String>) -> ProbeResult<ValidatableResponse> {
        let probe = self.probe;
        let log_uri = self.log_uri;
        let request = self
            .build(target)
            .resolve()
            .map_err(ApplicationError::from)?;

        if log_uri {
            info!(method = request.method(), uri = %request.url(), "request");
        }

        let response = probe.executor.send(&request).await?;
        Ok(ValidatableResponse::new(
            request.url().to_string(),
            response,
            probe.runner,
        ))
    }
}

#[allow(clippy::cast_possible_truncation)]
const fn duration_ms(duration: Duration) -> u64 {
    duration.as_millis() as u64
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use apiprobe_application::HttpClientError;
    use apiprobe_domain::request::ResolvedRequest;
    use apiprobe_domain::response::ResponseSpec;
    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    use super::*;

    #[derive(Default)]
    struct RecordingClient {
        sent: Mutex<Vec<ResolvedRequest>>,
    }

    #[async_trait]
    impl HttpClient for RecordingClient {
        async fn execute(
            &self,
            request: &ResolvedRequest,
        ) -> Result<ResponseSpec, HttpClientError> {
            self.sent.lock().unwrap().push(request.clone());
            Ok(ResponseSpec::new(200, HashMap::new(), b"{}", Duration::ZERO))
        }
    }

    fn probe() -> Probe {
        Probe::new().unwrap()
    }

    #[test]
    fn test_build_path_params() {
        let probe = probe();
        let request = probe
            .given()
            .path_param("Country", "us")
            .path_param("ZipCode", 90210)
            .build("http://api.zippopotam.us/{Country}/{ZipCode}");

        assert_eq!(
            request.resolve_url().unwrap().as_str(),
            "http://api.zippopotam.us/us/90210"
        );
    }

    #[test]
    fn test_build_query_and_path() {
        let probe = probe();
        let request = probe
            .given()
            .param("page", 3)
            .path_param("APIName", "users")
            .build("https://gorest.co.in/public/v1/{APIName}");

        assert_eq!(
            request.resolve_url().unwrap().as_str(),
            "https://gorest.co.in/public/v1/users?page=3"
        );
    }

    #[test]
    fn test_spec_over_probe_defaults() {
        let probe = probe().with_defaults(
            RequestDefaults::new()
                .with_base_uri("https://gorest.co.in/public/v1")
                .with_query_param("page", 1),
        );
        let spec = RequestDefaults::new()
            .with_path_param("APIName", "users")
            .with_query_param("page", 2);

        let request = probe.given().spec(&spec).build("/{APIName}");
        assert_eq!(
            request.resolve_url().unwrap().as_str(),
            "https://gorest.co.in/public/v1/users?page=2"
        );
    }

    #[test]
    fn test_header_last_wins() {
        let probe = probe();
        let request = probe
            .given()
            .header("x-api-key", "old")
            .header("X-API-KEY", "new")
            .timeout(Duration::from_secs(3))
            .build("https://example.com/prod/user");

        assert_eq!(request.headers().len(), 1);
        assert_eq!(request.headers().get("x-api-key"), Some("new"));
        assert_eq!(request.timeout_ms(), Some(3000));
    }

    #[tokio::test]
    async fn test_get_sends_the_resolved_request() {
        let client = Arc::new(RecordingClient::default());
        let probe = Probe::with_client(Arc::clone(&client) as Arc<dyn HttpClient>);

        let response = probe
            .given()
            .base_uri("https://gorest.co.in/public/v1")
            .path_param("APIName", "users")
            .param("page", 2)
            .header("Accept", "application/json")
            .timeout(Duration::from_millis(750))
            .get("/{APIName}")
            .await
            .unwrap();

        let sent = client.sent.lock().unwrap().clone();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].url().as_str(), "https://gorest.co.in/public/v1/users?page=2");
        assert_eq!(sent[0].headers().get("accept"), Some("application/json"));
        assert_eq!(sent[0].timeout_ms(), Some(750));
        assert_eq!(response.uri(), sent[0].url().as_str());
    }

    #[tokio::test]
    async fn test_unresolvable_request_is_not_sent() {
        let client = Arc::new(RecordingClient::default());
        let probe = Probe::with_client(Arc::clone(&client) as Arc<dyn HttpClient>);

        let err = probe.given().get("/{APIName}").await.unwrap_err();
        assert!(!err.is_assertion());
        assert!(client.sent.lock().unwrap().is_empty());
    }
}
