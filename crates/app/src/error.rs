//! Errors surfaced to test code.

use apiprobe_application::{ApplicationError, ConfigError};
use apiprobe_domain::testing::AssertionFailure;
use thiserror::Error;

/// Everything that can end a check chain.
///
/// Transport and request errors stay distinct from assertion failures so a
/// report can tell "the API said something unexpected" apart from "the API
/// could not be reached".
#[derive(Debug, Clone, Error)]
pub enum ProbeError {
    /// The request could not be built, sent, or answered.
    #[error(transparent)]
    Request(#[from] ApplicationError),

    /// An expectation did not hold.
    #[error("assertion failed: {0}")]
    Assertion(#[from] AssertionFailure),

    /// Required configuration is missing or malformed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A value could not be extracted from the body.
    #[error("cannot extract `{path}`: {message}")]
    Extract {
        /// Path that was requested.
        path: String,
        /// What went wrong.
        message: String,
    },
}

impl ProbeError {
    /// Returns true if this is an assertion failure rather than a transport
    /// or setup problem.
    #[must_use]
    pub const fn is_assertion(&self) -> bool {
        matches!(self, Self::Assertion(_))
    }
}

/// Result type alias for probe chains.
pub type ProbeResult<T> = Result<T, ProbeError>;
