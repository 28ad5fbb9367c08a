//! Granular module/action permission decisions.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use gatehouse_core::{ApiError, TenantId};

use crate::Profile;

/// The external permission-decision source, consumed as an opaque decision
/// function scoped by tenant. Backed by a network lookup in production and
/// by in-memory fakes in tests.
#[async_trait]
pub trait PermissionSource: Send + Sync {
    async fn allows(&self, tenant: TenantId, module: &str, action: &str)
    -> Result<bool, ApiError>;
}

/// Permission checks for one guard evaluation.
///
/// Built fresh from the session snapshot on every navigation: decisions are
/// memoized for the lifetime of the checker only, since permissions may
/// change server-side between route transitions. Super-admin short-circuits
/// to `true` without consulting the source at all.
pub struct PermissionChecker {
    profile: Option<Profile>,
    source: Arc<dyn PermissionSource>,
    cache: Mutex<HashMap<(String, String), bool>>,
}

impl PermissionChecker {
    pub fn new(profile: Option<Profile>, source: Arc<dyn PermissionSource>) -> Self {
        Self {
            profile,
            source,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn is_super_admin(&self) -> bool {
        self.profile.as_ref().map(|p| p.is_super_admin).unwrap_or(false)
    }

    /// Whether the current profile may perform `action` on `module`.
    ///
    /// Anonymous sessions are always denied. A failing lookup denies as well
    /// (fail closed); the failure is logged, not propagated.
    pub async fn can(&self, module: &str, action: &str) -> bool {
        if self.is_super_admin() {
            return true;
        }
        let Some(profile) = &self.profile else {
            return false;
        };

        let key = (module.to_string(), action.to_string());
        {
            let cache = self.cache.lock().expect("permission cache poisoned");
            if let Some(allowed) = cache.get(&key) {
                return *allowed;
            }
        }

        let allowed = match self.source.allows(profile.tenant_id, module, action).await {
            Ok(allowed) => allowed,
            Err(err) => {
                tracing::warn!(module, action, error = %err, "permission lookup failed; denying");
                false
            }
        };

        self.cache
            .lock()
            .expect("permission cache poisoned")
            .insert(key, allowed);
        allowed
    }
}
