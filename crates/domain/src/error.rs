//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur while building or resolving a request.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The resolved URL is invalid or malformed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// A relative target was given but no base URI is configured.
    #[error("no base URI configured for relative target: {0}")]
    MissingBaseUri(String),

    /// A path template could not be parsed.
    #[error("invalid path template: {0}")]
    InvalidPathTemplate(String),

    /// A placeholder in the path template has no value.
    #[error("missing path parameter: {0}")]
    MissingPathParam(String),

    /// A path parameter was supplied that no placeholder refers to.
    #[error("path parameter not used by template: {0}")]
    UnusedPathParam(String),

    /// A header name is invalid.
    #[error("invalid header name: {0}")]
    InvalidHeaderName(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
