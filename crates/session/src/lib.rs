//! `gatehouse-session` — session state and coordinated credential refresh.
//!
//! The [`SessionStore`] is the single source of truth for the current
//! session; the [`RefreshCoordinator`] guarantees at most one credential
//! refresh is in flight regardless of how many callers request one.

pub mod coordinator;
pub mod credential;
pub mod store;

pub use coordinator::{RefreshCoordinator, RefreshEndpoint};
pub use credential::Credential;
pub use store::{Session, SessionStore};
