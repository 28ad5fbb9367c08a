//! Wired-up session core: the surface page/UI collaborators consume.

use std::sync::Arc;

use tokio::sync::watch;

use gatehouse_authz::{AccessLevel, AuthzModel, PermissionChecker, PermissionSource, Profile};
use gatehouse_core::ApiResult;
use gatehouse_session::{RefreshCoordinator, Session, SessionStore};

use crate::api::{AuthApi, LoginRequest};
use crate::bootstrap::Bootstrapper;
use crate::interceptor::AuthorizedClient;
use crate::transport::{ClientConfig, HttpTransport, Transport};

/// The assembled session/authorization core.
///
/// Owns the session store, the refresh coordinator, the interceptor bridge
/// and the bootstrap sequencer, and exposes the authorization reads the UI
/// layer consumes. No ambient singletons: everything is wired explicitly
/// here and shared by `Arc`.
pub struct AuthCore {
    session: Arc<SessionStore>,
    api: Arc<AuthApi>,
    client: Arc<AuthorizedClient>,
    bootstrap: Arc<Bootstrapper>,
    permissions: Arc<dyn PermissionSource>,
}

impl AuthCore {
    /// Build the core over the reqwest transport.
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        let transport: Arc<dyn Transport> = Arc::new(HttpTransport::new(config)?);
        Ok(Self::with_transport(transport))
    }

    /// Build the core over an explicit transport (tests, alternate stacks).
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        let session = Arc::new(SessionStore::new());
        let api = Arc::new(AuthApi::new(transport.clone(), session.clone()));
        let coordinator = Arc::new(RefreshCoordinator::new(session.clone(), api.clone()));
        let client = Arc::new(AuthorizedClient::new(
            transport,
            session.clone(),
            coordinator.clone(),
        ));
        let bootstrap = Arc::new(Bootstrapper::new(
            session.clone(),
            coordinator.clone(),
            api.clone(),
        ));
        let permissions: Arc<dyn PermissionSource> =
            Arc::new(crate::permissions::HttpPermissionSource::new(client.clone()));

        Self {
            session,
            api,
            client,
            bootstrap,
            permissions,
        }
    }

    /// Attempt silent re-authentication. Run once, before any guard decision.
    pub async fn bootstrap(&self) {
        self.bootstrap.run().await;
    }

    /// True until the bootstrap sequence has settled.
    pub fn loading(&self) -> bool {
        !self.bootstrap.is_complete()
    }

    pub fn bootstrap_complete(&self) -> bool {
        self.bootstrap.is_complete()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn session_snapshot(&self) -> Session {
        self.session.snapshot()
    }

    /// Subscribe to session transitions (guards re-evaluate on change).
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.session.subscribe()
    }

    pub fn subscribe_bootstrap(&self) -> watch::Receiver<bool> {
        self.bootstrap.subscribe()
    }

    pub fn access_level(&self) -> AccessLevel {
        let snapshot = self.session.snapshot();
        AuthzModel::new(snapshot.profile()).access_level()
    }

    pub fn is_super_admin(&self) -> bool {
        let snapshot = self.session.snapshot();
        AuthzModel::new(snapshot.profile()).is_super_admin()
    }

    pub fn has_role(&self, names: &[&str]) -> bool {
        let snapshot = self.session.snapshot();
        AuthzModel::new(snapshot.profile()).has_role(names)
    }

    /// Permission checks for one guard evaluation; decisions are not cached
    /// across navigations.
    pub fn permission_checker(&self) -> PermissionChecker {
        PermissionChecker::new(
            self.session.snapshot().profile().cloned(),
            self.permissions.clone(),
        )
    }

    pub async fn login(&self, request: LoginRequest) -> ApiResult<Profile> {
        self.api.login(request).await
    }

    pub async fn logout(&self) {
        self.api.logout().await;
    }

    /// Bridge for application requests (bearer injection + refresh-retry).
    pub fn client(&self) -> Arc<AuthorizedClient> {
        self.client.clone()
    }
}
