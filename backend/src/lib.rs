//! Recipe-sharing backend library.
//!
//! Hexagonal layout: [`domain`] holds entities, algorithms and services,
//! [`inbound`] the actix-web adapter, [`outbound`] the storage adapters.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
