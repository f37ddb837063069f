//! APIProbe Application - Use cases and ports
//!
//! This crate defines the application layer with:
//! - Port traits (interfaces for external dependencies)
//! - Request execution
//! - Environment configuration
//! - Application-level error handling

pub mod config;
pub mod error;
pub mod execute_request;
pub mod ports;

pub use config::{ConfigError, ConfigKey, ProbeConfig, Secret};
pub use error::{ApplicationError, ApplicationResult};
pub use execute_request::ExecuteRequest;
pub use ports::{HttpClient, HttpClientError};
