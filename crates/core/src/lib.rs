//! `gatehouse-core` — shared foundation for the session/authorization core.
//!
//! This crate contains **pure** primitives (typed identifiers and the error
//! taxonomy); no transport or storage concerns.

pub mod error;
pub mod id;

pub use error::{ApiError, ApiResult, RefreshError};
pub use id::{TenantId, UserId};
