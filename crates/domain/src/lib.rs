//! APIProbe Domain - Core types
//!
//! This crate defines the request, response and expectation model used by
//! APIProbe. All types here are pure Rust with no I/O dependencies.

pub mod error;
pub mod request;
pub mod response;
pub mod testing;

pub use error::{DomainError, DomainResult};
pub use request::{
    Header, Headers, PathParams, PathTemplate, QueryParam, QueryParams, RequestDefaults,
    RequestSpec, ResolvedRequest,
};
pub use response::{ResponseSpec, StatusCode};
pub use testing::{
    AssertionFailure, AssertionResult, ContentType, Expectation, Matcher, StatusExpectation,
    TestResults, TestSuite, equal_to, has_item, has_size,
};
