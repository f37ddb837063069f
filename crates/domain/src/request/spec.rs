//! Request specification type

use serde::{Deserialize, Serialize};
use url::Url;

use super::{Header, Headers, PathParams, PathTemplate, QueryParam, QueryParams, RequestDefaults};
use crate::error::{DomainError, DomainResult};

/// Complete specification for a GET request.
///
/// Built with the consuming `with_*` methods and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestSpec {
    base_uri: Option<String>,
    target: String,
    #[serde(default)]
    path_params: PathParams,
    #[serde(default)]
    default_path_params: PathParams,
    #[serde(default)]
    query: QueryParams,
    #[serde(default)]
    headers: Headers,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timeout_ms: Option<u64>,
}

impl RequestSpec {
    /// Creates a GET request for an absolute URL or a relative path template.
    #[must_use]
    pub fn get(target: impl Into<String>) -> Self {
        Self {
            base_uri: None,
            target: target.into(),
            path_params: PathParams::new(),
            default_path_params: PathParams::new(),
            query: QueryParams::new(),
            headers: Headers::new(),
            timeout_ms: None,
        }
    }

    /// Sets the base URI used for relative targets.
    #[must_use]
    pub fn with_base_uri(mut self, base_uri: impl Into<String>) -> Self {
        self.base_uri = Some(base_uri.into());
        self
    }

    /// Sets a path parameter.
    #[must_use]
    pub fn with_path_param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.path_params.insert(name, value.to_string());
        self
    }

    /// Appends a query parameter.
    #[must_use]
    pub fn with_query_param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.add(QueryParam::new(key, value.to_string()));
        self
    }

    /// Sets a header, replacing any header with the same name.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(Header::new(name, value));
        self
    }

    /// Sets a per-request timeout in milliseconds.
    #[must_use]
    pub const fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// Merges shared defaults under this request.
    ///
    /// Values set on the request win. Default query parameters whose key
    /// the request already sets are dropped. Default path parameters are
    /// only used for placeholders the target actually contains.
    #[must_use]
    pub fn apply_defaults(mut self, defaults: &RequestDefaults) -> Self {
        if self.base_uri.is_none() {
            self.base_uri.clone_from(&defaults.base_uri);
        }

        for (name, value) in defaults.path_params.iter() {
            if !self.default_path_params.contains(name) {
                self.default_path_params.insert(name, value);
            }
        }

        let mut query: QueryParams = defaults
            .query
            .iter()
            .filter(|p| !self.query.contains_key(&p.key))
            .cloned()
            .collect();
        for param in self.query.iter() {
            query.add(param.clone());
        }
        self.query = query;

        let mut headers = defaults.headers.clone();
        for header in self.headers.iter() {
            headers.insert(header.clone());
        }
        self.headers = headers;

        self
    }

    /// Returns the HTTP method, which is always GET.
    #[must_use]
    pub const fn method(&self) -> &'static str {
        "GET"
    }

    /// Returns the raw target (URL or template).
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Returns the base URI, if any.
    #[must_use]
    pub fn base_uri(&self) -> Option<&str> {
        self.base_uri.as_deref()
    }

    /// Returns the explicitly set path parameters.
    #[must_use]
    pub const fn path_params(&self) -> &PathParams {
        &self.path_params
    }

    /// Returns the query parameters in send order.
    #[must_use]
    pub const fn query(&self) -> &QueryParams {
        &self.query
    }

    /// Returns the request headers.
    #[must_use]
    pub const fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Returns the per-request timeout, if set.
    #[must_use]
    pub const fn timeout_ms(&self) -> Option<u64> {
        self.timeout_ms
    }

    /// Resolves the final URL: expands the template, prefixes the base URI
    /// for relative targets and appends the query string.
    ///
    /// # Errors
    ///
    /// Returns a `DomainError` if the template is malformed, a path parameter
    /// is missing or unused, a relative target has no base URI, or the
    /// resulting URL does not parse.
    pub fn resolve_url(&self) -> DomainResult<Url> {
        let template = PathTemplate::parse(&self.target)?;

        let mut params = self.path_params.clone();
        for (name, value) in self.default_path_params.iter() {
            if !params.contains(name) && template.placeholders().any(|p| p == name) {
                params.insert(name, value);
            }
        }
        let expanded = template.expand(&params)?;

        let absolute = if is_absolute(&expanded) {
            expanded
        } else {
            let base = self
                .base_uri
                .as_deref()
                .ok_or_else(|| DomainError::MissingBaseUri(expanded.clone()))?;
            join_base(base, &expanded)
        };

        let mut url = Url::parse(&absolute)
            .map_err(|e| DomainError::InvalidUrl(format!("{e}: {absolute}")))?;

        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for param in self.query.iter() {
                pairs.append_pair(&param.key, &param.value);
            }
        }

        Ok(url)
    }

    /// Resolves the URL once and freezes what the transport needs to send.
    ///
    /// # Errors
    ///
    /// Fails under the same conditions as [`RequestSpec::resolve_url`].
    pub fn resolve(&self) -> DomainResult<ResolvedRequest> {
        Ok(ResolvedRequest {
            url: self.resolve_url()?,
            headers: self.headers.clone(),
            timeout_ms: self.timeout_ms,
        })
    }
}

/// A GET request with its final URL, ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRequest {
    url: Url,
    headers: Headers,
    timeout_ms: Option<u64>,
}

impl ResolvedRequest {
    /// Returns the HTTP method, which is always GET.
    #[must_use]
    pub const fn method(&self) -> &'static str {
        "GET"
    }

    /// Returns the final URL, query string included.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    /// Returns the request headers.
    #[must_use]
    pub const fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Returns the per-request timeout, if set.
    #[must_use]
    pub const fn timeout_ms(&self) -> Option<u64> {
        self.timeout_ms
    }
}

fn is_absolute(target: &str) -> bool {
    let lower = target.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn join_base(base: &str, path: &str) -> String {
    if path.is_empty() {
        return base.to_string();
    }
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_absolute_url() {
        let req = RequestSpec::get("http://api.zippopotam.us/us/90210");
        assert_eq!(req.method(), "GET");
        assert_eq!(
            req.resolve_url().unwrap().as_str(),
            "http://api.zippopotam.us/us/90210"
        );
    }

    #[test]
    fn test_path_template_with_base_uri() {
        let req = RequestSpec::get("/{country}/{zipcode}")
            .with_base_uri("http://api.zippopotam.us")
            .with_path_param("country", "us")
            .with_path_param("zipcode", 90210);

        let url = req.resolve_url().unwrap();
        assert_eq!(url.path(), "/us/90210");
        assert_eq!(url.as_str(), "http://api.zippopotam.us/us/90210");
    }

    #[test]
    fn test_base_uri_slash_handling() {
        let req = RequestSpec::get("users").with_base_uri("https://gorest.co.in/public/v1/");
        assert_eq!(
            req.resolve_url().unwrap().as_str(),
            "https://gorest.co.in/public/v1/users"
        );
    }

    #[test]
    fn test_query_params_appended_in_order() {
        let req = RequestSpec::get("http://api.weatherapi.com/v1/current.json")
            .with_query_param("key", "abc")
            .with_query_param("q", "Lyndhurst")
            .with_query_param("aqi", "no");

        assert_eq!(
            req.resolve_url().unwrap().query(),
            Some("key=abc&q=Lyndhurst&aqi=no")
        );
    }

    #[test]
    fn test_relative_without_base_uri() {
        let req = RequestSpec::get("/users");
        assert_eq!(
            req.resolve_url().unwrap_err(),
            DomainError::MissingBaseUri("/users".to_string())
        );
    }

    #[test]
    fn test_invalid_url() {
        let req = RequestSpec::get("http://exa mple.com/");
        assert!(matches!(req.resolve_url(), Err(DomainError::InvalidUrl(_))));
    }

    #[test]
    fn test_apply_defaults() {
        let defaults = RequestDefaults::new()
            .with_base_uri("https://gorest.co.in/public/v1")
            .with_path_param("APIName", "users")
            .with_query_param("page", 2)
            .with_header("Accept", "application/json");

        let req = RequestSpec::get("/{APIName}").apply_defaults(&defaults);
        let url = req.resolve_url().unwrap();
        assert_eq!(url.as_str(), "https://gorest.co.in/public/v1/users?page=2");
        assert_eq!(req.headers().get("accept"), Some("application/json"));
    }

    #[test]
    fn test_request_values_override_defaults() {
        let defaults = RequestDefaults::new()
            .with_base_uri("https://gorest.co.in/public/v1")
            .with_path_param("APIName", "users")
            .with_query_param("page", 2)
            .with_header("Accept", "application/json");

        let req = RequestSpec::get("/{APIName}")
            .with_path_param("APIName", "posts")
            .with_query_param("page", 5)
            .with_header("accept", "text/plain")
            .apply_defaults(&defaults);

        let url = req.resolve_url().unwrap();
        assert_eq!(url.as_str(), "https://gorest.co.in/public/v1/posts?page=5");
        assert_eq!(req.headers().len(), 1);
        assert_eq!(req.headers().get("Accept"), Some("text/plain"));
    }

    #[test]
    fn test_default_path_params_ignored_when_unused() {
        let defaults = RequestDefaults::new().with_path_param("APIName", "users");
        let req = RequestSpec::get("http://api.zippopotam.us/us/90210").apply_defaults(&defaults);
        assert!(req.resolve_url().is_ok());
    }

    #[test]
    fn test_resolve_freezes_url_headers_and_timeout() {
        let resolved = RequestSpec::get("/{country}/{zip}")
            .with_base_uri("http://api.zippopotam.us")
            .with_path_param("country", "us")
            .with_path_param("zip", 90210)
            .with_header("x-api-key", "k")
            .with_timeout_ms(250)
            .resolve()
            .unwrap();

        assert_eq!(resolved.method(), "GET");
        assert_eq!(resolved.url().as_str(), "http://api.zippopotam.us/us/90210");
        assert_eq!(resolved.headers().get("X-Api-Key"), Some("k"));
        assert_eq!(resolved.timeout_ms(), Some(250));
        assert!(RequestSpec::get("/{APIName}").resolve().is_err());
    }

    #[test]
    fn test_explicit_unused_path_param_rejected() {
        let req = RequestSpec::get("http://api.zippopotam.us/us/90210")
            .with_path_param("ZipCode", "90210");
        assert_eq!(
            req.resolve_url().unwrap_err(),
            DomainError::UnusedPathParam("ZipCode".to_string())
        );
    }
}
