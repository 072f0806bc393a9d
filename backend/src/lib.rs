//! Food donation coordination backend.
//!
//! Producers offer surplus ingredients, cooks accept them and turn them into
//! dishes, and distributors hand the dishes out. See [`domain`] for the
//! workflow and [`inbound::http`] for the REST surface.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
