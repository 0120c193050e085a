//! Kalshi API client library.
//!
//! Provides signed and public REST access to the Kalshi trade API.

pub mod auth;
pub mod endpoints;
pub mod rest;
pub mod transport;

pub use auth::{KalshiAuth, SignedHeaders};
pub use endpoints::{Endpoint, Envelope, Payload};
pub use rest::KalshiRestClient;
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
