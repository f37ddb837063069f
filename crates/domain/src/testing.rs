//! Response expectations and assertion results.
//!
//! This module provides the vocabulary for checking HTTP responses: what a
//! response is expected to look like, and what a failed check reports.
//! Evaluation itself lives in the infrastructure crate.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// A single expectation to check against a response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Expectation {
    /// Check response status code.
    StatusCode {
        /// Expected status code or range.
        expected: StatusExpectation,
    },
    /// Check the response content type.
    ContentType {
        /// Expected content type.
        expected: ContentType,
    },
    /// Check a value located by a JSON path in the body.
    Body {
        /// Path expression (e.g., "places[0].state").
        path: String,
        /// Condition the resolved value must satisfy.
        matcher: Matcher,
    },
}

impl Expectation {
    /// Expects an exact status code.
    #[must_use]
    pub const fn status(code: u16) -> Self {
        Self::StatusCode {
            expected: StatusExpectation::Exact(code),
        }
    }

    /// Expects a content type.
    #[must_use]
    pub const fn content_type(expected: ContentType) -> Self {
        Self::ContentType { expected }
    }

    /// Expects the value at `path` to satisfy `matcher`.
    #[must_use]
    pub fn body(path: impl Into<String>, matcher: Matcher) -> Self {
        Self::Body {
            path: path.into(),
            matcher,
        }
    }

    /// Get a human-readable description of this expectation.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::StatusCode { expected } => format!("Status code {}", expected.description()),
            Self::ContentType { expected } => format!("Content-Type is {expected}"),
            Self::Body { path, matcher } => {
                format!("JSON path {path} is {}", matcher.description())
            }
        }
    }
}

/// Expected status code value or range.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum StatusExpectation {
    /// Exact status code.
    Exact(u16),
    /// Range of status codes (e.g., 200-299).
    Range {
        /// Minimum status code (inclusive).
        min: u16,
        /// Maximum status code (inclusive).
        max: u16,
    },
    /// One of multiple status codes.
    OneOf(Vec<u16>),
}

impl StatusExpectation {
    /// Check if a status code matches this expectation.
    #[must_use]
    pub fn matches(&self, status: u16) -> bool {
        match self {
            Self::Exact(expected) => status == *expected,
            Self::Range { min, max } => (*min..=*max).contains(&status),
            Self::OneOf(codes) => codes.contains(&status),
        }
    }

    /// Get description of the expectation.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::Exact(code) => format!("= {code}"),
            Self::Range { min, max } => format!("in {min}-{max}"),
            Self::OneOf(codes) => {
                let codes_str: Vec<_> = codes.iter().map(ToString::to_string).collect();
                format!("in [{}]", codes_str.join(", "))
            }
        }
    }

    /// Create a "success" expectation (200-299).
    #[must_use]
    pub const fn success() -> Self {
        Self::Range { min: 200, max: 299 }
    }

    /// Create an exact status expectation.
    #[must_use]
    pub const fn exact(code: u16) -> Self {
        Self::Exact(code)
    }
}

impl Default for StatusExpectation {
    fn default() -> Self {
        Self::success()
    }
}

/// Expected response content type.
///
/// The named kinds accept a family of MIME types, the way most HTTP test
/// libraries treat "JSON" or "XML".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    /// JSON and JavaScript types, plus any `+json` suffix.
    Json,
    /// XML types, plus any `+xml` suffix.
    Xml,
    /// `text/html`.
    Html,
    /// `text/plain`.
    Text,
    /// Any content type, as long as the header is present.
    Any,
    /// An exact MIME type (parameters such as charset are ignored).
    Custom(String),
}

impl ContentType {
    /// MIME essences (`type/subtype`) accepted for this kind.
    ///
    /// Empty for [`ContentType::Any`].
    #[must_use]
    pub fn mime_types(&self) -> Vec<&str> {
        match self {
            Self::Json => vec![
                "application/json",
                "application/javascript",
                "text/javascript",
                "text/json",
            ],
            Self::Xml => vec!["application/xml", "text/xml", "application/xhtml+xml"],
            Self::Html => vec!["text/html"],
            Self::Text => vec!["text/plain"],
            Self::Any => Vec::new(),
            Self::Custom(mime) => vec![mime.as_str()],
        }
    }

    /// Structured syntax suffix also accepted (e.g. `json` for
    /// `application/problem+json`).
    #[must_use]
    pub const fn suffix(&self) -> Option<&'static str> {
        match self {
            Self::Json => Some("json"),
            Self::Xml => Some("xml"),
            _ => None,
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json => f.write_str("JSON"),
            Self::Xml => f.write_str("XML"),
            Self::Html => f.write_str("HTML"),
            Self::Text => f.write_str("TEXT"),
            Self::Any => f.write_str("ANY"),
            Self::Custom(mime) => f.write_str(mime),
        }
    }
}

/// Condition applied to a value resolved from the body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Matcher {
    /// Value equals the expected JSON value. Numbers compare numerically.
    EqualTo(Value),
    /// Value is a collection of exactly this many elements.
    HasSize(usize),
    /// Value is an array containing this element.
    HasItem(Value),
}

impl Matcher {
    /// Describes the matcher the way a failure report prints it.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::EqualTo(value) => format!("equal to {value}"),
            Self::HasSize(size) => format!("a collection with size {size}"),
            Self::HasItem(value) => format!("a collection containing {value}"),
        }
    }
}

/// Matches a value equal to `expected`.
#[must_use]
pub fn equal_to(expected: impl Into<Value>) -> Matcher {
    Matcher::EqualTo(expected.into())
}

/// Matches a collection with exactly `size` elements.
#[must_use]
pub const fn has_size(size: usize) -> Matcher {
    Matcher::HasSize(size)
}

/// Matches an array that contains `item`.
#[must_use]
pub fn has_item(item: impl Into<Value>) -> Matcher {
    Matcher::HasItem(item.into())
}

/// A violated expectation.
///
/// This is the failure kind a check raises; the first one ends the test.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{expectation}: {message} (expected {expected}, actual {})", .actual.as_deref().unwrap_or("<absent>"))]
pub struct AssertionFailure {
    /// Description of the expectation that failed.
    pub expectation: String,
    /// Expected value, rendered for display.
    pub expected: String,
    /// Actual value, if anything was resolved.
    pub actual: Option<String>,
    /// What went wrong.
    pub message: String,
}

impl AssertionFailure {
    /// Creates a failure where an actual value was found but did not match.
    #[must_use]
    pub fn mismatch(
        expectation: &Expectation,
        expected: impl Into<String>,
        actual: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            expectation: expectation.description(),
            expected: expected.into(),
            actual: Some(actual.into()),
            message: message.into(),
        }
    }

    /// Creates a failure where no actual value could be resolved.
    #[must_use]
    pub fn absent(
        expectation: &Expectation,
        expected: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            expectation: expectation.description(),
            expected: expected.into(),
            actual: None,
            message: message.into(),
        }
    }
}

/// Result of running a single expectation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssertionResult {
    /// The expectation that was run.
    pub expectation: Expectation,
    /// Whether the expectation held.
    pub passed: bool,
    /// Actual value found (for display).
    pub actual: Option<String>,
    /// Error message if failed.
    pub error: Option<String>,
}

impl AssertionResult {
    /// Create a passed result with actual value.
    #[must_use]
    pub fn pass(expectation: Expectation, actual: impl Into<String>) -> Self {
        Self {
            expectation,
            passed: true,
            actual: Some(actual.into()),
            error: None,
        }
    }

    /// Create a failed result from a failure.
    #[must_use]
    pub fn fail(expectation: Expectation, failure: &AssertionFailure) -> Self {
        Self {
            expectation,
            passed: false,
            actual: failure.actual.clone(),
            error: Some(failure.to_string()),
        }
    }
}

/// A named, ordered list of expectations checked against one response.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct TestSuite {
    /// Test suite name.
    pub name: String,
    /// Expectations, checked in order.
    #[serde(default)]
    pub expectations: Vec<Expectation>,
}

impl TestSuite {
    /// Create a new empty test suite.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            expectations: Vec::new(),
        }
    }

    /// Add an expectation to the suite.
    pub fn add(&mut self, expectation: Expectation) {
        self.expectations.push(expectation);
    }

    /// Add an expectation (builder pattern).
    #[must_use]
    pub fn with_expectation(mut self, expectation: Expectation) -> Self {
        self.expectations.push(expectation);
        self
    }

    /// Check if the suite is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.expectations.is_empty()
    }

    /// Get the number of expectations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.expectations.len()
    }
}

/// Results from running a test suite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResults {
    /// Test suite that was run.
    pub suite_name: String,
    /// Individual results, up to and including the first failure.
    pub results: Vec<AssertionResult>,
    /// Number of expectations in the suite.
    pub total: usize,
    /// Number of passed expectations.
    pub passed: usize,
    /// Number of failed expectations.
    pub failed: usize,
    /// Expectations not evaluated because an earlier one failed.
    pub skipped: usize,
    /// Execution time in milliseconds.
    pub duration_ms: u64,
}

impl TestResults {
    /// Create new test results.
    #[must_use]
    pub fn new(
        suite_name: impl Into<String>,
        total: usize,
        results: Vec<AssertionResult>,
        duration_ms: u64,
    ) -> Self {
        let passed = results.iter().filter(|r| r.passed).count();
        let failed = results.len() - passed;

        Self {
            suite_name: suite_name.into(),
            skipped: total.saturating_sub(results.len()),
            results,
            total,
            passed,
            failed,
            duration_ms,
        }
    }

    /// Check if all expectations passed.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0 && self.skipped == 0
    }
}
