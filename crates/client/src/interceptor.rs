//! Bridge between the session store, the refresh coordinator and the HTTP
//! transport.

use std::sync::Arc;

use gatehouse_core::{ApiError, ApiResult};
use gatehouse_session::{RefreshCoordinator, SessionStore};

use crate::transport::{Request, Response, Transport};

/// Prefix under which the authentication endpoints live. These are exempt
/// from bearer injection and from the refresh-retry path: decorating them
/// would leak credentials to login/refresh calls, and retrying them could
/// recurse into another refresh.
pub const AUTH_PREFIX: &str = "/auth/";

pub fn is_auth_endpoint(path: &str) -> bool {
    path.starts_with(AUTH_PREFIX)
}

/// Transport wrapper that injects credentials into outgoing requests,
/// detects authorization failures on responses, triggers a coordinated
/// refresh and retries exactly once.
pub struct AuthorizedClient {
    transport: Arc<dyn Transport>,
    session: Arc<SessionStore>,
    coordinator: Arc<RefreshCoordinator>,
}

impl AuthorizedClient {
    pub fn new(
        transport: Arc<dyn Transport>,
        session: Arc<SessionStore>,
        coordinator: Arc<RefreshCoordinator>,
    ) -> Self {
        Self {
            transport,
            session,
            coordinator,
        }
    }

    pub async fn execute(&self, mut request: Request) -> ApiResult<Response> {
        if !is_auth_endpoint(&request.path) {
            if let Some(credential) = self.session.bearer_token() {
                request.bearer = Some(credential);
            }
        }

        let response = self.transport.execute(request.clone()).await?;

        // Pass through anything that is not the single refresh-retry case:
        // non-401 responses, auth endpoints, and requests already retried.
        if !response.is_unauthorized() || is_auth_endpoint(&request.path) || request.retried {
            return Ok(response);
        }

        request.retried = true;
        tracing::debug!(path = %request.path, "authorization failure; requesting credential refresh");
        match self.coordinator.request_refresh().await {
            Ok(credential) => {
                request.bearer = Some(credential);
                tracing::debug!(path = %request.path, "resubmitting with refreshed credential");
                self.transport.execute(request).await
            }
            Err(err) => {
                tracing::debug!(path = %request.path, error = %err, "refresh failed; surfacing authorization failure");
                Err(ApiError::AuthorizationExpired)
            }
        }
    }
}
