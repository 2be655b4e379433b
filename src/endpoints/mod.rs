//! Typed HTTP endpoint layer over the platform API.
//!
//! [`ApiClient`] owns a configured [`reqwest::Client`]; [`Endpoint`]
//! values compose the base URL, a path with `{}` placeholders, and
//! accumulated headers, and expose JSON-typed verbs. Concrete service
//! clients (e.g. [`EventServiceClient`]) build on the generic endpoint.

pub mod endpoint;
pub mod event_service;

pub use endpoint::{ApiClient, Endpoint};
pub use event_service::EventServiceClient;
