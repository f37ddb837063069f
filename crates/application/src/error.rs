//! Application error types

use apiprobe_domain::DomainError;
use thiserror::Error;

use crate::config::ConfigError;
use crate::ports::HttpClientError;

/// Application-level errors.
#[derive(Debug, Clone, Error)]
pub enum ApplicationError {
    /// The request could not be built or resolved.
    #[error("request error: {0}")]
    Domain(#[from] DomainError),

    /// The HTTP exchange failed at the transport level.
    #[error("HTTP error: {0}")]
    Http(#[from] HttpClientError),

    /// Configuration is missing or malformed.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
