use serde::{Deserialize, Serialize};

use gatehouse_core::{TenantId, UserId};

use crate::{AccessLevel, Role};

/// The authenticated identity as reported by the backend.
///
/// # Invariants
/// - `is_super_admin == true` implies `access_level >= TENANT_ADMIN`.
///   Enforced at the deserialization boundary: a super-admin profile arriving
///   below that tier is raised to `SUPER_ADMIN` rather than rejected, since
///   the flag (not the tier) is what bypasses every finer-grained check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ProfileWire")]
pub struct Profile {
    pub user_id: UserId,
    pub tenant_id: TenantId,
    pub display_name: String,
    pub roles: Vec<Role>,
    pub access_level: AccessLevel,
    pub is_super_admin: bool,
}

/// Wire shape of a profile, before invariant normalization.
#[derive(Debug, Deserialize)]
struct ProfileWire {
    user_id: UserId,
    tenant_id: TenantId,
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    roles: Vec<Role>,
    access_level: AccessLevel,
    #[serde(default)]
    is_super_admin: bool,
}

impl From<ProfileWire> for Profile {
    fn from(wire: ProfileWire) -> Self {
        let access_level = if wire.is_super_admin && wire.access_level < AccessLevel::TENANT_ADMIN {
            tracing::warn!(
                user_id = %wire.user_id,
                level = wire.access_level.as_u8(),
                "super-admin profile below tenant-admin tier; raising level"
            );
            AccessLevel::SUPER_ADMIN
        } else {
            wire.access_level
        };

        Self {
            user_id: wire.user_id,
            tenant_id: wire.tenant_id,
            display_name: wire.display_name,
            roles: wire.roles,
            access_level,
            is_super_admin: wire.is_super_admin,
        }
    }
}

impl Profile {
    /// Whether the profile carries any of the given role names
    /// (case-insensitive, synonym-aware).
    pub fn has_any_role(&self, names: &[&str]) -> bool {
        self.roles
            .iter()
            .any(|role| names.iter().any(|name| role.matches(name)))
    }
}
