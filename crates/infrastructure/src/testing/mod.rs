//! Response checking.
//!
//! This module provides:
//! - JSON path evaluation over response bodies
//! - The expectation runner

mod json_path;
mod runner;

pub use json_path::{JsonPath, JsonPathError};
pub use runner::{ExpectationRunner, content_type_matches};
