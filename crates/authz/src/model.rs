//! Pure projections of the current profile into access decisions.

use crate::{AccessLevel, Profile};

/// Authorization model over the (possibly absent) current profile.
///
/// All reads are computed on the fly, never stored: the model is rebuilt
/// from the session snapshot on every guard evaluation.
#[derive(Debug, Clone, Copy)]
pub struct AuthzModel<'a> {
    profile: Option<&'a Profile>,
}

impl<'a> AuthzModel<'a> {
    pub fn new(profile: Option<&'a Profile>) -> Self {
        Self { profile }
    }

    /// Access level of the current profile; lowest tier when anonymous.
    pub fn access_level(&self) -> AccessLevel {
        self.profile
            .map(|p| p.access_level)
            .unwrap_or(AccessLevel::USER)
    }

    /// Super-admin flag; false when anonymous.
    pub fn is_super_admin(&self) -> bool {
        self.profile.map(|p| p.is_super_admin).unwrap_or(false)
    }

    /// Case-insensitive, synonym-aware membership test against the profile's
    /// role list. Anonymous sessions hold no roles.
    pub fn has_role(&self, names: &[&str]) -> bool {
        self.profile
            .map(|p| p.has_any_role(names))
            .unwrap_or(false)
    }

    // Derived capability flags. Boolean combinations of level thresholds and
    // role checks, computed on read.

    pub fn can_manage_users(&self) -> bool {
        self.is_super_admin()
            || self.access_level() >= AccessLevel::TENANT_ADMIN
            || self.has_role(&["admin"])
    }

    pub fn can_manage_tenant(&self) -> bool {
        self.is_super_admin() || self.access_level() >= AccessLevel::TENANT_ADMIN
    }

    pub fn can_oversee(&self) -> bool {
        self.is_super_admin() || self.access_level() >= AccessLevel::SUPERVISOR
    }
}

#[cfg(test)]
mod tests {
    use gatehouse_core::{TenantId, UserId};

    use super::*;
    use crate::Role;

    fn profile(level: AccessLevel, is_super_admin: bool, roles: &[&'static str]) -> Profile {
        Profile {
            user_id: UserId::new(),
            tenant_id: TenantId::new(),
            display_name: "Test".to_string(),
            roles: roles.iter().map(|r| Role::new(*r)).collect(),
            access_level: level,
            is_super_admin,
        }
    }

    #[test]
    fn anonymous_defaults() {
        let model = AuthzModel::new(None);
        assert_eq!(model.access_level(), AccessLevel::USER);
        assert!(!model.is_super_admin());
        assert!(!model.has_role(&["admin"]));
        assert!(!model.can_manage_users());
    }

    #[test]
    fn level_thresholds_drive_capabilities() {
        let supervisor = profile(AccessLevel::SUPERVISOR, false, &[]);
        let model = AuthzModel::new(Some(&supervisor));
        assert!(model.can_oversee());
        assert!(!model.can_manage_tenant());

        let tenant_admin = profile(AccessLevel::TENANT_ADMIN, false, &[]);
        let model = AuthzModel::new(Some(&tenant_admin));
        assert!(model.can_manage_tenant());
        assert!(model.can_manage_users());
    }

    #[test]
    fn legacy_admin_role_grants_user_management() {
        let legacy = profile(AccessLevel::USER, false, &["Administrator"]);
        let model = AuthzModel::new(Some(&legacy));
        assert!(model.has_role(&["admin"]));
        assert!(model.can_manage_users());
    }
}
