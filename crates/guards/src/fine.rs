//! Fine guard: granular module/action gate.

use gatehouse_authz::PermissionChecker;

#[derive(Debug, Clone, PartialEq)]
pub enum FineDecision {
    /// Bootstrap (or the permission lookup) has not settled yet.
    Loading,
    /// Render the guarded content (or delegate to nested content).
    Permit,
    /// Redirect to the unauthorized boundary, carrying the denied pair for
    /// diagnostics.
    RedirectUnauthorized { module: String, action: String },
}

/// Evaluate the fine gate for one navigation.
///
/// Super-admin bypasses the permission source entirely; everyone else gets
/// the checker's (per-evaluation cached) decision. Anonymous sessions deny —
/// the coarse guard is expected to have redirected them to login already.
pub async fn evaluate_fine(
    bootstrap_complete: bool,
    checker: &PermissionChecker,
    module: &str,
    action: &str,
) -> FineDecision {
    if !bootstrap_complete {
        return FineDecision::Loading;
    }
    if checker.is_super_admin() {
        return FineDecision::Permit;
    }
    if checker.can(module, action).await {
        FineDecision::Permit
    } else {
        tracing::debug!(module, action, "permission denied");
        FineDecision::RedirectUnauthorized {
            module: module.to_string(),
            action: action.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use gatehouse_authz::{AccessLevel, PermissionSource, Profile};
    use gatehouse_core::{ApiError, TenantId, UserId};

    use super::*;

    struct FixedSource {
        calls: AtomicUsize,
        allowed: bool,
    }

    #[async_trait]
    impl PermissionSource for FixedSource {
        async fn allows(
            &self,
            _tenant: TenantId,
            _module: &str,
            _action: &str,
        ) -> Result<bool, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.allowed)
        }
    }

    fn checker(is_super_admin: bool, source: Arc<FixedSource>) -> PermissionChecker {
        let profile = Profile {
            user_id: UserId::new(),
            tenant_id: TenantId::new(),
            display_name: "Test".to_string(),
            roles: Vec::new(),
            access_level: if is_super_admin {
                AccessLevel::SUPER_ADMIN
            } else {
                AccessLevel::USER
            },
            is_super_admin,
        };
        PermissionChecker::new(Some(profile), source)
    }

    #[tokio::test]
    async fn no_decision_before_bootstrap_completes() {
        let source = Arc::new(FixedSource {
            calls: AtomicUsize::new(0),
            allowed: true,
        });
        let checker = checker(false, source);

        let decision = evaluate_fine(false, &checker, "x", "read").await;
        assert_eq!(decision, FineDecision::Loading);
    }

    #[tokio::test]
    async fn super_admin_bypasses_even_without_a_permission_record() {
        let source = Arc::new(FixedSource {
            calls: AtomicUsize::new(0),
            allowed: false,
        });
        let checker = checker(true, source.clone());

        let decision = evaluate_fine(true, &checker, "x", "delete").await;
        assert_eq!(decision, FineDecision::Permit);
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn denied_permission_carries_the_module_action_pair() {
        let source = Arc::new(FixedSource {
            calls: AtomicUsize::new(0),
            allowed: false,
        });
        let checker = checker(false, source);

        let decision = evaluate_fine(true, &checker, "clients", "delete").await;
        assert_eq!(
            decision,
            FineDecision::RedirectUnauthorized {
                module: "clients".to_string(),
                action: "delete".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn granted_permission_permits() {
        let source = Arc::new(FixedSource {
            calls: AtomicUsize::new(0),
            allowed: true,
        });
        let checker = checker(false, source);

        let decision = evaluate_fine(true, &checker, "clients", "read").await;
        assert_eq!(decision, FineDecision::Permit);
    }
}
