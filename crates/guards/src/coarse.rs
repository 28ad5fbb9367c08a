//! Coarse guard: access-level / role gate.

use gatehouse_authz::{AccessLevel, AuthzModel, Role};
use gatehouse_session::Session;

/// Declarative requirements of a navigation target. All unset means "any
/// authenticated user".
#[derive(Debug, Clone, Default)]
pub struct CoarseRequirement {
    /// Minimum access level, if any.
    pub required_access_level: Option<AccessLevel>,
    /// Require the super-admin flag.
    pub require_super_admin: bool,
    /// Any-of role requirement; empty means no role requirement.
    pub required_roles: Vec<Role>,
}

/// Why a navigation was denied. Carried to the unauthorized boundary so it
/// can explain the denial and offer a sensible way back for the user's tier.
#[derive(Debug, Clone, PartialEq)]
pub enum Denial {
    AccessLevel {
        required: AccessLevel,
        actual: AccessLevel,
    },
    SuperAdminRequired,
    MissingRole {
        required: Vec<Role>,
    },
    Permission {
        module: String,
        action: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum CoarseDecision {
    /// Bootstrap has not settled; render a loading state, decide nothing.
    Loading,
    /// Render the guarded content.
    Permit,
    /// No session: redirect to the login boundary, carrying the intended
    /// destination for post-login redirect.
    RedirectToLogin { intended: String },
    /// Authenticated but insufficient: redirect to the unauthorized boundary.
    RedirectUnauthorized { denial: Denial },
}

/// Evaluate the coarse gate for one navigation.
pub fn evaluate_coarse(
    bootstrap_complete: bool,
    session: &Session,
    requirement: &CoarseRequirement,
    intended: &str,
) -> CoarseDecision {
    if !bootstrap_complete {
        return CoarseDecision::Loading;
    }

    let Some(profile) = session.profile() else {
        return CoarseDecision::RedirectToLogin {
            intended: intended.to_string(),
        };
    };
    let model = AuthzModel::new(Some(profile));

    if let Some(required) = requirement.required_access_level {
        let actual = model.access_level();
        if actual < required {
            tracing::debug!(%required, %actual, intended, "access level below floor");
            return CoarseDecision::RedirectUnauthorized {
                denial: Denial::AccessLevel { required, actual },
            };
        }
    }

    if requirement.require_super_admin && !model.is_super_admin() {
        tracing::debug!(intended, "super-admin required");
        return CoarseDecision::RedirectUnauthorized {
            denial: Denial::SuperAdminRequired,
        };
    }

    if !requirement.required_roles.is_empty() {
        let names: Vec<&str> = requirement.required_roles.iter().map(Role::as_str).collect();
        if !model.has_role(&names) {
            tracing::debug!(intended, "required role missing");
            return CoarseDecision::RedirectUnauthorized {
                denial: Denial::MissingRole {
                    required: requirement.required_roles.clone(),
                },
            };
        }
    }

    CoarseDecision::Permit
}
