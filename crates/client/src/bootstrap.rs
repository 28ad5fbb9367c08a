//! Silent re-authentication at process start.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;

use gatehouse_authz::Profile;
use gatehouse_core::{ApiError, ApiResult, RefreshError};
use gatehouse_session::{RefreshCoordinator, SessionStore};

use crate::api::AuthApi;

/// Runs the bootstrap sequence at most once per process: attempt a refresh
/// (the prior credential might already be expired), fetch the profile with
/// the fresh credential, establish the session. Either failure lands in the
/// anonymous state. Guards wait on the completion flag before rendering a
/// decision, so the user never sees a flash of "unauthenticated" while the
/// silent refresh is still in flight.
pub struct Bootstrapper {
    session: Arc<SessionStore>,
    coordinator: Arc<RefreshCoordinator>,
    api: Arc<AuthApi>,
    complete: watch::Sender<bool>,
    started: AtomicBool,
}

impl Bootstrapper {
    pub fn new(
        session: Arc<SessionStore>,
        coordinator: Arc<RefreshCoordinator>,
        api: Arc<AuthApi>,
    ) -> Self {
        let (complete, _rx) = watch::channel(false);
        Self {
            session,
            coordinator,
            api,
            complete,
            started: AtomicBool::new(false),
        }
    }

    /// Whether the bootstrap sequence has finished (successfully or not).
    pub fn is_complete(&self) -> bool {
        *self.complete.borrow()
    }

    /// Subscribe to the completion flag.
    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.complete.subscribe()
    }

    /// Run the sequence. Later calls are no-ops.
    pub async fn run(&self) {
        if self.started.swap(true, Ordering::SeqCst) {
            return;
        }

        match self.silently_reauthenticate().await {
            Ok(profile) => {
                tracing::info!(user_id = %profile.user_id, "silent re-authentication succeeded");
            }
            Err(err) => {
                // "No prior session" and "session present but rejected" both
                // land anonymous; the distinction is diagnostic only.
                match &err {
                    ApiError::Refresh(RefreshError::Rejected { status, .. }) => {
                        tracing::debug!(status, "no usable prior session; starting anonymous");
                    }
                    other => {
                        tracing::debug!(error = %other, "silent re-authentication failed; starting anonymous");
                    }
                }
                self.session.clear();
            }
        }

        self.complete.send_replace(true);
    }

    async fn silently_reauthenticate(&self) -> ApiResult<Profile> {
        let credential = self.coordinator.request_refresh().await?;
        // The coordinator has already written the fresh credential to the
        // store, so the profile fetch goes out carrying it.
        let profile = self.api.me().await?;
        self.session.establish(credential, profile.clone());
        Ok(profile)
    }
}
