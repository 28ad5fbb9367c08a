//! Contracts of the backend authentication endpoints.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use gatehouse_authz::Profile;
use gatehouse_core::{ApiError, ApiResult, RefreshError};
use gatehouse_session::{Credential, RefreshEndpoint, SessionStore};

use crate::transport::{Request, Transport};

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
    profile: Profile,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    token: String,
}

/// Client for `/auth/*`.
///
/// These calls go to the raw transport, not the interceptor bridge: auth
/// endpoints are exempt from bearer injection and from the refresh-retry
/// path, so any bearer they need is attached explicitly here.
pub struct AuthApi {
    transport: Arc<dyn Transport>,
    session: Arc<SessionStore>,
}

impl AuthApi {
    pub fn new(transport: Arc<dyn Transport>, session: Arc<SessionStore>) -> Self {
        Self { transport, session }
    }

    /// Authenticate with explicit credentials and establish the session.
    pub async fn login(&self, request: LoginRequest) -> ApiResult<Profile> {
        let body = serde_json::to_value(&request)
            .map_err(|e| ApiError::decode(e.to_string()))?;
        let response = self
            .transport
            .execute(Request::post("/auth/login", Some(body)))
            .await?;
        let payload = response.into_auth_body()?;
        let LoginResponse { token, profile } = serde_json::from_value(payload)
            .map_err(|e| ApiError::decode(e.to_string()))?;

        self.session
            .establish(Credential::new(token), profile.clone());
        Ok(profile)
    }

    /// Fetch the profile for the currently stored credential.
    pub async fn me(&self) -> ApiResult<Profile> {
        let mut request = Request::get("/auth/me");
        if let Some(credential) = self.session.bearer_token() {
            request = request.with_bearer(credential);
        }
        let response = self.transport.execute(request).await?;
        response.into_auth_body().and_then(|payload| {
            serde_json::from_value(payload)
                .map_err(|e| ApiError::decode(e.to_string()))
        })
    }

    /// Tear the session down, notifying the backend on a best-effort basis:
    /// local teardown proceeds regardless of the acknowledgement.
    pub async fn logout(&self) {
        let mut request = Request::post("/auth/logout", None);
        if let Some(credential) = self.session.bearer_token() {
            request = request.with_bearer(credential);
        }
        if let Err(err) = self.transport.execute(request).await {
            tracing::debug!(error = %err, "logout acknowledgement failed; clearing locally");
        }
        self.session.clear();
    }
}

#[async_trait]
impl RefreshEndpoint for AuthApi {
    /// `POST /auth/refresh`. The refresh grant rides out-of-band (ambient
    /// cookie); no bearer is attached and no retry path applies.
    async fn refresh(&self) -> Result<Credential, RefreshError> {
        let response = self
            .transport
            .execute(Request::post("/auth/refresh", None))
            .await
            .map_err(|e| RefreshError::Network(e.to_string()))?;

        if !response.is_success() {
            return Err(RefreshError::Rejected {
                status: response.status,
                message: response.body.to_string(),
            });
        }

        let RefreshResponse { token } = response
            .json()
            .map_err(|e| RefreshError::Network(e.to_string()))?;
        Ok(Credential::new(token))
    }
}
