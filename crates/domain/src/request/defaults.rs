//! Shared request defaults applied to every request of a test group.

use serde::{Deserialize, Serialize};

use super::{Header, Headers, PathParams, QueryParam, QueryParams};

/// Read-only request defaults shared by a group of tests.
///
/// Configure it once before the group runs, wrap it in an `Arc`, and hand
/// it to every request; requests never mutate it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestDefaults {
    /// Base URI prepended to relative targets.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_uri: Option<String>,
    /// Default path parameters.
    #[serde(default)]
    pub path_params: PathParams,
    /// Default query parameters.
    #[serde(default)]
    pub query: QueryParams,
    /// Default headers.
    #[serde(default)]
    pub headers: Headers,
}

impl RequestDefaults {
    /// Creates empty defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URI.
    #[must_use]
    pub fn with_base_uri(mut self, base_uri: impl Into<String>) -> Self {
        self.base_uri = Some(base_uri.into());
        self
    }

    /// Adds a default path parameter.
    #[must_use]
    pub fn with_path_param(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.path_params.insert(name, value.to_string());
        self
    }

    /// Adds a default query parameter.
    #[must_use]
    pub fn with_query_param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.add(QueryParam::new(key, value.to_string()));
        self
    }

    /// Adds a default header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(Header::new(name, value));
        self
    }
}
