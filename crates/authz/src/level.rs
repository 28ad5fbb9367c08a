use serde::{Deserialize, Serialize};

/// Access level: a total order over capability tiers.
///
/// The backend is the authority on tier values; the named constants cover
/// the tiers observed in production. Comparisons use the numeric order, so a
/// guard requiring `SUPERVISOR` is satisfied by any level at or above it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessLevel(u8);

impl AccessLevel {
    pub const USER: Self = Self(1);
    pub const SUPERVISOR: Self = Self(3);
    pub const TENANT_ADMIN: Self = Self(4);
    pub const SUPER_ADMIN: Self = Self(5);

    pub const fn new(tier: u8) -> Self {
        Self(tier)
    }

    pub const fn as_u8(&self) -> u8 {
        self.0
    }
}

impl Default for AccessLevel {
    fn default() -> Self {
        Self::USER
    }
}

impl core::fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}
