use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Legacy role names and their canonical replacements.
///
/// Kept as explicit data (not inline conditionals) so the expansion is
/// independently testable. Comparison happens after canonicalization, so a
/// profile carrying `Administrator` satisfies a guard requiring `admin`.
const ROLE_SYNONYMS: &[(&str, &str)] = &[
    ("administrator", "admin"),
    ("superuser", "super_admin"),
    ("org_admin", "tenant_admin"),
];

/// Canonical form of a role name: lowercased, then mapped through the
/// synonym table.
pub fn canonical_role_name(name: &str) -> String {
    let lowered = name.to_ascii_lowercase();
    for (legacy, canonical) in ROLE_SYNONYMS {
        if lowered == *legacy {
            return (*canonical).to_string();
        }
    }
    lowered
}

/// Role identifier used for RBAC.
///
/// Roles are opaque strings at this layer; matching is case-insensitive and
/// synonym-aware (see [`canonical_role_name`]).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(Cow<'static, str>);

impl Role {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this role matches `name` after canonicalization of both sides.
    pub fn matches(&self, name: &str) -> bool {
        canonical_role_name(&self.0) == canonical_role_name(name)
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
