//! HTTP Request domain types

mod defaults;
mod header;
mod path;
mod query;
mod spec;

pub use defaults::RequestDefaults;
pub use header::{Header, Headers};
pub use path::{PathParams, PathTemplate};
pub use query::{QueryParam, QueryParams};
pub use spec::{RequestSpec, ResolvedRequest};
