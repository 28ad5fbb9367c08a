//! Single source of truth for the current session.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use gatehouse_authz::Profile;

use crate::Credential;

/// Publicly observable session state.
///
/// Either fully populated or fully empty: a credential without a profile
/// (the brief bootstrap/refresh transition) is internal to the store and is
/// never published through snapshots or subscriptions.
#[derive(Debug, Clone, PartialEq)]
pub enum Session {
    Anonymous,
    Authenticated {
        credential: Credential,
        profile: Profile,
    },
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated { .. })
    }

    pub fn profile(&self) -> Option<&Profile> {
        match self {
            Session::Authenticated { profile, .. } => Some(profile),
            Session::Anonymous => None,
        }
    }
}

struct Inner {
    credential: Option<Credential>,
    profile: Option<Profile>,
    established_at: Option<DateTime<Utc>>,
    epoch: u64,
}

/// In-memory holder of the current credential and profile.
///
/// Readable synchronously by any component; mutable only through the
/// transition methods below. Writers (bootstrap, refresh coordinator,
/// explicit logout) all serialize through the inner mutex, and every
/// transition publishes a fresh snapshot on the watch channel so guards can
/// re-evaluate reactively.
pub struct SessionStore {
    inner: Mutex<Inner>,
    tx: watch::Sender<Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Session::Anonymous);
        Self {
            inner: Mutex::new(Inner {
                credential: None,
                profile: None,
                established_at: None,
                epoch: 0,
            }),
            tx,
        }
    }

    /// Current snapshot (fully populated or empty, never in between).
    pub fn snapshot(&self) -> Session {
        self.tx.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.snapshot().is_authenticated()
    }

    /// Subscribe to session transitions.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.tx.subscribe()
    }

    /// Raw bearer for outgoing request decoration.
    ///
    /// Unlike [`snapshot`](Self::snapshot), this exposes the transitional
    /// credential written during bootstrap, so the profile fetch that follows
    /// a silent refresh carries the fresh token.
    pub fn bearer_token(&self) -> Option<Credential> {
        self.inner.lock().expect("session store poisoned").credential.clone()
    }

    /// Epoch of the current session incarnation. Bumped by [`clear`](Self::clear);
    /// used by the refresh coordinator to discard results that settle after a
    /// forced logout.
    pub fn epoch(&self) -> u64 {
        self.inner.lock().expect("session store poisoned").epoch
    }

    /// Transition to a fully authenticated session.
    pub fn establish(&self, credential: Credential, profile: Profile) {
        let mut inner = self.inner.lock().expect("session store poisoned");
        inner.credential = Some(credential.clone());
        inner.profile = Some(profile.clone());
        inner.established_at = Some(Utc::now());
        tracing::info!(user_id = %profile.user_id, tenant_id = %profile.tenant_id, "session established");
        self.tx.send_replace(Session::Authenticated {
            credential,
            profile,
        });
    }

    /// Replace the credential, keeping the profile.
    ///
    /// Publishes a snapshot only when the session is fully populated; during
    /// bootstrap (no profile yet) the store stays externally anonymous.
    pub fn update_credential(&self, credential: Credential) {
        let mut inner = self.inner.lock().expect("session store poisoned");
        inner.credential = Some(credential.clone());
        if let Some(profile) = inner.profile.clone() {
            self.tx.send_replace(Session::Authenticated {
                credential,
                profile,
            });
        }
    }

    /// [`update_credential`](Self::update_credential), but only if the session
    /// epoch is still `expected_epoch`. Returns whether the write happened.
    pub fn update_credential_if_epoch(&self, credential: Credential, expected_epoch: u64) -> bool {
        let mut inner = self.inner.lock().expect("session store poisoned");
        if inner.epoch != expected_epoch {
            return false;
        }
        inner.credential = Some(credential.clone());
        if let Some(profile) = inner.profile.clone() {
            self.tx.send_replace(Session::Authenticated {
                credential,
                profile,
            });
        }
        true
    }

    /// Tear the session down. Idempotent; always bumps the epoch so any
    /// in-flight refresh result is treated as obsolete.
    pub fn clear(&self) {
        let mut inner = self.inner.lock().expect("session store poisoned");
        if let Some(established_at) = inner.established_at.take() {
            let duration = Utc::now().signed_duration_since(established_at);
            tracing::info!(seconds = duration.num_seconds(), "session cleared");
        }
        inner.credential = None;
        inner.profile = None;
        inner.epoch += 1;
        self.tx.send_replace(Session::Anonymous);
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use gatehouse_authz::{AccessLevel, Profile};
    use gatehouse_core::{TenantId, UserId};

    use super::*;

    fn profile() -> Profile {
        Profile {
            user_id: UserId::new(),
            tenant_id: TenantId::new(),
            display_name: "Test".to_string(),
            roles: Vec::new(),
            access_level: AccessLevel::USER,
            is_super_admin: false,
        }
    }

    #[test]
    fn starts_anonymous() {
        let store = SessionStore::new();
        assert_eq!(store.snapshot(), Session::Anonymous);
        assert!(store.bearer_token().is_none());
    }

    #[test]
    fn establish_publishes_a_fully_populated_snapshot() {
        let store = SessionStore::new();
        let mut rx = store.subscribe();

        store.establish(Credential::new("t1"), profile());

        assert!(rx.has_changed().unwrap());
        assert!(store.snapshot().is_authenticated());
    }

    #[test]
    fn transitional_credential_is_not_observable_in_snapshots() {
        let store = SessionStore::new();

        store.update_credential(Credential::new("t1"));

        // The bridge can read the bearer, but guards still see anonymous.
        assert_eq!(store.bearer_token(), Some(Credential::new("t1")));
        assert_eq!(store.snapshot(), Session::Anonymous);
    }

    #[test]
    fn clear_is_idempotent_and_bumps_epoch() {
        let store = SessionStore::new();
        store.establish(Credential::new("t1"), profile());

        let before = store.epoch();
        store.clear();
        store.clear();

        assert_eq!(store.snapshot(), Session::Anonymous);
        assert!(store.epoch() > before);
    }

    #[test]
    fn stale_epoch_write_is_discarded() {
        let store = SessionStore::new();
        store.establish(Credential::new("t1"), profile());

        let epoch = store.epoch();
        store.clear();

        assert!(!store.update_credential_if_epoch(Credential::new("t2"), epoch));
        assert_eq!(store.snapshot(), Session::Anonymous);
        assert!(store.bearer_token().is_none());
    }

    #[test]
    fn refreshed_credential_replaces_the_old_one() {
        let store = SessionStore::new();
        store.establish(Credential::new("t1"), profile());

        assert!(store.update_credential_if_epoch(Credential::new("t2"), store.epoch()));
        match store.snapshot() {
            Session::Authenticated { credential, .. } => {
                assert_eq!(credential, Credential::new("t2"));
            }
            Session::Anonymous => panic!("expected authenticated session"),
        }
    }
}
