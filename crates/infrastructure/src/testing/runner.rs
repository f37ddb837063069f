//! Expectation runner implementation.
//!
//! Checks expectations against HTTP responses. Checks run in order and stop
//! at the first failure.

use std::time::Instant;

use apiprobe_domain::response::ResponseSpec;
use apiprobe_domain::testing::{
    AssertionFailure, AssertionResult, ContentType, Expectation, Matcher, StatusExpectation,
    TestResults, TestSuite,
};
use mime::Mime;
use serde_json::{Number, Value};
use tracing::debug;

use super::json_path::JsonPath;

const PREVIEW_LEN: usize = 200;

/// Runner that checks expectations against responses.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExpectationRunner;

impl ExpectationRunner {
    /// Create a new runner.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Checks every expectation in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the first `AssertionFailure`; later expectations are not
    /// evaluated.
    pub fn verify(
        &self,
        expectations: &[Expectation],
        response: &ResponseSpec,
    ) -> Result<(), AssertionFailure> {
        for expectation in expectations {
            self.check(expectation, response)?;
        }
        Ok(())
    }

    /// Runs a suite and reports each evaluated expectation.
    #[must_use]
    pub fn run(&self, suite: &TestSuite, response: &ResponseSpec) -> TestResults {
        let start = Instant::now();
        let mut results = Vec::with_capacity(suite.expectations.len());

        for expectation in &suite.expectations {
            match self.check(expectation, response) {
                Ok(actual) => results.push(AssertionResult::pass(expectation.clone(), actual)),
                Err(failure) => {
                    debug!(suite = %suite.name, %failure, "expectation failed");
                    results.push(AssertionResult::fail(expectation.clone(), &failure));
                    break;
                }
            }
        }

        let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        TestResults::new(&suite.name, suite.len(), results, duration_ms)
    }

    /// Checks a single expectation.
    ///
    /// Returns the actual value, rendered for display, when it holds.
    ///
    /// # Errors
    ///
    /// Returns an `AssertionFailure` carrying expected and actual values.
    pub fn check(
        &self,
        expectation: &Expectation,
        response: &ResponseSpec,
    ) -> Result<String, AssertionFailure> {
        match expectation {
            Expectation::StatusCode { expected } => {
                Self::check_status_code(expectation, response, expected)
            }
            Expectation::ContentType { expected } => {
                Self::check_content_type(expectation, response, expected)
            }
            Expectation::Body { path, matcher } => {
                Self::check_body(expectation, response, path, matcher)
            }
        }
    }

    fn check_status_code(
        expectation: &Expectation,
        response: &ResponseSpec,
        expected: &StatusExpectation,
    ) -> Result<String, AssertionFailure> {
        let actual = response.status;
        if expected.matches(actual) {
            Ok(actual.to_string())
        } else {
            Err(AssertionFailure::mismatch(
                expectation,
                expected.description(),
                actual.to_string(),
                format!("Expected status {}, got {}", expected.description(), actual),
            ))
        }
    }

    fn check_content_type(
        expectation: &Expectation,
        response: &ResponseSpec,
        expected: &ContentType,
    ) -> Result<String, AssertionFailure> {
        let Some(actual) = response.content_type.as_deref() else {
            return Err(AssertionFailure::absent(
                expectation,
                expected.to_string(),
                "No Content-Type header present",
            ));
        };

        if content_type_matches(expected, actual) {
            Ok(actual.to_string())
        } else {
            Err(AssertionFailure::mismatch(
                expectation,
                expected.to_string(),
                actual,
                format!("Content-Type '{actual}' does not match {expected}"),
            ))
        }
    }

    fn check_body(
        expectation: &Expectation,
        response: &ResponseSpec,
        path: &str,
        matcher: &Matcher,
    ) -> Result<String, AssertionFailure> {
        let expected = matcher.description();

        let json = response.json().map_err(|e| {
            AssertionFailure::absent(
                expectation,
                &expected,
                format!("Failed to parse body as JSON: {e}"),
            )
        })?;
        let json_path = JsonPath::parse(path).map_err(|e| {
            AssertionFailure::absent(expectation, &expected, format!("Invalid JSON path '{path}': {e}"))
        })?;
        let value = json_path.evaluate(&json).ok_or_else(|| {
            AssertionFailure::absent(expectation, &expected, format!("JSON path '{path}' not found"))
        })?;

        match matcher {
            Matcher::EqualTo(expected_value) => {
                if json_values_equal(&value, expected_value) {
                    Ok(preview(&value))
                } else {
                    Err(AssertionFailure::mismatch(
                        expectation,
                        expected_value.to_string(),
                        preview(&value),
                        format!("JSON path '{path}' value mismatch"),
                    ))
                }
            }
            Matcher::HasSize(size) => match collection_len(&value) {
                Some(len) if len == *size => Ok(len.to_string()),
                Some(len) => Err(AssertionFailure::mismatch(
                    expectation,
                    size.to_string(),
                    len.to_string(),
                    format!("JSON path '{path}' has size {len}"),
                )),
                None => Err(AssertionFailure::mismatch(
                    expectation,
                    expected,
                    preview(&value),
                    format!("JSON path '{path}' is not a collection"),
                )),
            },
            Matcher::HasItem(item) => match &value {
                Value::Array(items) if items.iter().any(|v| json_values_equal(v, item)) => {
                    Ok(preview(&value))
                }
                Value::Array(_) => Err(AssertionFailure::mismatch(
                    expectation,
                    expected,
                    preview(&value),
                    format!("JSON path '{path}' does not contain {item}"),
                )),
                _ => Err(AssertionFailure::mismatch(
                    expectation,
                    expected,
                    preview(&value),
                    format!("JSON path '{path}' is not an array"),
                )),
            },
        }
    }
}

/// Returns true if a `Content-Type` header value satisfies `expected`.
///
/// Parameters such as `charset` are ignored.
#[must_use]
pub fn content_type_matches(expected: &ContentType, actual: &str) -> bool {
    if matches!(expected, ContentType::Any) {
        return true;
    }
    let Ok(actual) = actual.trim().parse::<Mime>() else {
        return false;
    };
    let essence = actual.essence_str();

    if let ContentType::Custom(custom) = expected {
        return custom
            .trim()
            .parse::<Mime>()
            .is_ok_and(|m| m.essence_str().eq_ignore_ascii_case(essence));
    }

    expected
        .mime_types()
        .iter()
        .any(|m| m.eq_ignore_ascii_case(essence))
        || expected.suffix().is_some_and(|suffix| {
            actual
                .suffix()
                .is_some_and(|s| s.as_str().eq_ignore_ascii_case(suffix))
        })
}

/// Structural equality where numbers compare by value (`3 == 3.0`).
#[allow(clippy::float_cmp)]
fn json_values_equal(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Number(a), Value::Number(b)) => numbers_equal(a, b),
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| json_values_equal(x, y))
        }
        (Value::Object(a), Value::Object(b)) => {
            a.len() == b.len()
                && a.iter()
                    .all(|(k, v)| b.get(k).is_some_and(|w| json_values_equal(v, w)))
        }
        _ => actual == expected,
    }
}

// Integers compare exactly; floats only when one side is a float.
fn numbers_equal(a: &Number, b: &Number) -> bool {
    if a.is_f64() || b.is_f64() {
        return matches!((a.as_f64(), b.as_f64()), (Some(x), Some(y)) if x == y);
    }
    match (a.as_i64(), b.as_i64()) {
        (Some(x), Some(y)) => x == y,
        _ => a.as_u64().is_some() && a.as_u64() == b.as_u64(),
    }
}

fn collection_len(value: &Value) -> Option<usize> {
    match value {
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

fn preview(value: &Value) -> String {
    let rendered = value.to_string();
    match rendered.char_indices().nth(PREVIEW_LEN) {
        Some((cut, _)) => format!("{}...", &rendered[..cut]),
        None => rendered,
    }
}
