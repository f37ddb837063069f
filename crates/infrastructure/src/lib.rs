//! APIProbe Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, and the response checking engine.

pub mod adapters;
pub mod testing;

pub use adapters::ReqwestHttpClient;
pub use testing::{ExpectationRunner, JsonPath, JsonPathError, content_type_matches};
