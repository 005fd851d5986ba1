#![cfg_attr(
    test,
    expect(clippy::expect_used, reason = "tests require contextual panics")
)]
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]
//! Parse job backend library modules.

pub mod config;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

pub use middleware::Trace;

/// Public OpenAPI surface used by Swagger UI and the `openapi-dump` binary.
pub use doc::ApiDoc;
