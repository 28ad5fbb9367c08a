//! `gatehouse-client` — HTTP integration for the session core.
//!
//! Wires the session store and refresh coordinator into the request/response
//! pipeline: bearer injection, 401-triggered coordinated refresh with a
//! single retry, silent re-authentication at startup, and the auth endpoint
//! contracts.

pub mod api;
pub mod auth;
pub mod bootstrap;
pub mod interceptor;
pub mod permissions;
pub mod telemetry;
pub mod transport;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{AuthApi, LoginRequest};
pub use auth::AuthCore;
pub use bootstrap::Bootstrapper;
pub use interceptor::AuthorizedClient;
pub use permissions::HttpPermissionSource;
pub use transport::{ClientConfig, HttpTransport, Method, Request, Response, Transport};
