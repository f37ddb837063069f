//! APIProbe - fluent HTTP API checks
//!
//! Build a GET request, send it, and check the response in one chain:
//!
//! ```no_run
//! use apiprobe::{ContentType, Probe, ProbeResult, equal_to};
//!
//! # async fn zip_lookup() -> ProbeResult<()> {
//! let probe = Probe::new()?;
//! probe
//!     .given()
//!     .path_param("country", "us")
//!     .path_param("zipcode", 90210)
//!     .get("http://api.zippopotam.us/{country}/{zipcode}")
//!     .await?
//!     .status_code(200)?
//!     .content_type(ContentType::Json)?
//!     .body("places[0].state", equal_to("California"))?;
//! # Ok(())
//! # }
//! ```
//!
//! Every check returns `Result`, so `?` stops the chain at the first failed
//! expectation.

mod error;
mod logging;
mod probe;
mod response;

pub use error::{ProbeError, ProbeResult};
pub use logging::init_tracing;
pub use probe::{Probe, RequestBuilder};
pub use response::ValidatableResponse;

pub use apiprobe_application::{ConfigError, ConfigKey, ProbeConfig, Secret};
pub use apiprobe_domain::request::RequestDefaults;
pub use apiprobe_domain::response::ResponseSpec;
pub use apiprobe_domain::testing::{
    AssertionFailure, ContentType, Expectation, Matcher, StatusExpectation, equal_to, has_item,
    has_size,
};
