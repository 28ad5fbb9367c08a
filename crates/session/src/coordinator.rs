//! Single-flight credential refresh.
//!
//! Any number of concurrently failing requests must collapse into exactly
//! one network refresh: the first caller becomes the leader and performs the
//! call, every later caller joins a FIFO waiter queue, and the settled
//! outcome fans out to all of them.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::oneshot;

use gatehouse_core::RefreshError;

use crate::{Credential, SessionStore};

/// The external refresh endpoint.
///
/// Implementations call the backend directly, never through the interceptor
/// bridge: a failing refresh must not recursively trigger another refresh.
#[async_trait]
pub trait RefreshEndpoint: Send + Sync {
    async fn refresh(&self) -> Result<Credential, RefreshError>;
}

struct FlightState {
    in_flight: bool,
    waiters: VecDeque<oneshot::Sender<Result<Credential, RefreshError>>>,
}

/// Deduplicates concurrent refresh attempts into a single in-flight
/// operation.
pub struct RefreshCoordinator {
    session: Arc<SessionStore>,
    endpoint: Arc<dyn RefreshEndpoint>,
    flight: Mutex<FlightState>,
}

impl RefreshCoordinator {
    pub fn new(session: Arc<SessionStore>, endpoint: Arc<dyn RefreshEndpoint>) -> Self {
        Self {
            session,
            endpoint,
            flight: Mutex::new(FlightState {
                in_flight: false,
                waiters: VecDeque::new(),
            }),
        }
    }

    /// Obtain a fresh credential, joining the in-flight operation if one
    /// exists.
    ///
    /// On success the credential has already been written to the session
    /// store (unless a forced logout intervened, in which case the result is
    /// discarded and [`RefreshError::Superseded`] is returned). On failure
    /// the store has been cleared: a rejected refresh is the sole path
    /// through which an expired session is detected and torn down.
    pub async fn request_refresh(&self) -> Result<Credential, RefreshError> {
        // Check-and-set under a synchronous lock: no await point between
        // observing "no operation in flight" and claiming leadership.
        let waiter = {
            let mut flight = self.flight.lock().expect("refresh state poisoned");
            if flight.in_flight {
                let (tx, rx) = oneshot::channel();
                flight.waiters.push_back(tx);
                Some(rx)
            } else {
                flight.in_flight = true;
                None
            }
        };

        if let Some(rx) = waiter {
            tracing::debug!("joining in-flight credential refresh");
            return rx.await.unwrap_or(Err(RefreshError::Superseded));
        }

        let epoch = self.session.epoch();
        tracing::info!("refreshing credential");
        let outcome = match self.endpoint.refresh().await {
            Ok(credential) => {
                if self.session.update_credential_if_epoch(credential.clone(), epoch) {
                    tracing::info!("credential refreshed");
                    Ok(credential)
                } else {
                    tracing::warn!("session cleared mid-refresh; discarding result");
                    Err(RefreshError::Superseded)
                }
            }
            Err(err) => {
                tracing::warn!(error = %err, "credential refresh failed; tearing session down");
                self.session.clear();
                Err(err)
            }
        };

        // Settle: clear the operation before fan-out so a new trigger starts
        // a fresh one, then resolve waiters in FIFO insertion order.
        let waiters = {
            let mut flight = self.flight.lock().expect("refresh state poisoned");
            flight.in_flight = false;
            std::mem::take(&mut flight.waiters)
        };
        for tx in waiters {
            let _ = tx.send(outcome.clone());
        }

        outcome
    }
}
