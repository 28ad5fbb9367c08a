//! `gatehouse-authz` — authorization model over the current profile.
//!
//! This crate is intentionally decoupled from HTTP and session storage: it
//! projects a `Profile` into access decisions (levels, roles, granular
//! module/action permissions) and owns the permission-decision seam.

pub mod level;
pub mod model;
pub mod permissions;
pub mod profile;
pub mod roles;

pub use level::AccessLevel;
pub use model::AuthzModel;
pub use permissions::{PermissionChecker, PermissionSource};
pub use profile::Profile;
pub use roles::{Role, canonical_role_name};
