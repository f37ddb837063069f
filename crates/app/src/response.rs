//! Response side of the fluent chain.

use apiprobe_domain::response::ResponseSpec;
use apiprobe_domain::testing::{
    AssertionFailure, ContentType, Expectation, Matcher, StatusExpectation,
};
use apiprobe_infrastructure::{ExpectationRunner, JsonPath};
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::error::{ProbeError, ProbeResult};

/// A received response that can be checked and mined for values.
///
/// Checks borrow the response and return it again, so they chain with `?`:
///
/// ```ignore
/// response.status_code(200)?.body("country", equal_to("United States"))?;
/// ```
#[derive(Debug, Clone)]
pub struct ValidatableResponse {
    uri: String,
    response: ResponseSpec,
    runner: ExpectationRunner,
}

impl ValidatableResponse {
    pub(crate) const fn new(uri: String, response: ResponseSpec, runner: ExpectationRunner) -> Self {
        Self {
            uri,
            response,
            runner,
        }
    }

    /// Checks for an exact status code.
    ///
    /// # Errors
    ///
    /// Returns the failure if the status differs.
    pub fn status_code(&self, code: u16) -> Result<&Self, AssertionFailure> {
        self.expect(&Expectation::status(code))
    }

    /// Checks the status against a range or set of codes.
    ///
    /// # Errors
    ///
    /// Returns the failure if the status does not match.
    pub fn status(&self, expected: StatusExpectation) -> Result<&Self, AssertionFailure> {
        self.expect(&Expectation::StatusCode { expected })
    }

    /// Checks the `Content-Type` header.
    ///
    /// # Errors
    ///
    /// Returns the failure if the header is absent or of another family.
    pub fn content_type(&self, expected: ContentType) -> Result<&Self, AssertionFailure> {
        self.expect(&Expectation::content_type(expected))
    }

    /// Checks the value at a JSON path in the body.
    ///
    /// # Errors
    ///
    /// Returns the failure if the body is not JSON, the path is malformed or
    /// missing, or the value does not satisfy `matcher`.
    pub fn body(&self, path: &str, matcher: Matcher) -> Result<&Self, AssertionFailure> {
        self.expect(&Expectation::body(path, matcher))
    }

    /// Checks one expectation.
    ///
    /// # Errors
    ///
    /// Returns the failure if the expectation does not hold.
    pub fn expect(&self, expectation: &Expectation) -> Result<&Self, AssertionFailure> {
        match self.runner.check(expectation, &self.response) {
            Ok(_) => Ok(self),
            Err(failure) => {
                warn!(uri = %self.uri, %failure, "check failed");
                Err(failure)
            }
        }
    }

    /// Checks expectations in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the first failure.
    pub fn expect_all(&self, expectations: &[Expectation]) -> Result<&Self, AssertionFailure> {
        self.runner
            .verify(expectations, &self.response)
            .map(|()| self)
            .inspect_err(|failure| warn!(uri = %self.uri, %failure, "check failed"))
    }

    /// Logs the status line.
    pub fn log_status(&self) -> &Self {
        info!(uri = %self.uri, status = %self.response.status_code(), "status");
        self
    }

    /// Logs the full body.
    pub fn log_body(&self) -> &Self {
        info!(uri = %self.uri, body = %self.response.body, "body");
        self
    }

    /// Returns the URI the request was sent to.
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Returns the received response.
    #[must_use]
    pub const fn response(&self) -> &ResponseSpec {
        &self.response
    }

    /// Consumes the wrapper and returns the received response.
    #[must_use]
    pub fn extract(self) -> ResponseSpec {
        self.response
    }

    /// Extracts the value at a JSON path, deserialized as `T`.
    ///
    /// # Errors
    ///
    /// Returns `ProbeError::Extract` if the body is not JSON, the path is
    /// malformed or missing, or the value does not deserialize as `T`.
    pub fn path<T: DeserializeOwned>(&self, path: &str) -> ProbeResult<T> {
        let extract_error = |message: String| ProbeError::Extract {
            path: path.to_string(),
            message,
        };

        let parsed = JsonPath::parse(path).map_err(|e| extract_error(e.to_string()))?;
        let json = self
            .response
            .json()
            .map_err(|e| extract_error(format!("body is not JSON: {e}")))?;
        let value = parsed
            .evaluate(&json)
            .ok_or_else(|| extract_error("no value at path".to_string()))?;

        serde_json::from_value(value).map_err(|e| extract_error(e.to_string()))
    }
}
