//! Error taxonomy for the session/authorization core.

use thiserror::Error;

/// Result type used across the client-facing layers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Failure of a single credential-refresh operation.
///
/// `Clone` is required because one settled operation fans its outcome out to
/// every queued waiter.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RefreshError {
    /// The refresh endpoint rejected the attempt (expired or revoked session).
    /// Terminal: the session is torn down.
    #[error("refresh rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The refresh call never reached a verdict (transport-level failure).
    #[error("refresh failed: {0}")]
    Network(String),

    /// The session was cleared while the refresh was in flight; its result
    /// was discarded (a forced logout wins over a late-arriving refresh).
    #[error("refresh superseded by logout")]
    Superseded,
}

/// Error surfaced by requests going through the authorized client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure, not authorization-related. Propagated to the
    /// caller untouched.
    #[error("network failure: {0}")]
    Network(String),

    /// Authorization failure that survived the single refresh-and-retry
    /// attempt (or whose refresh failed).
    #[error("authorization expired")]
    AuthorizationExpired,

    /// The refresh operation itself failed.
    #[error(transparent)]
    Refresh(#[from] RefreshError),

    /// Non-authorization HTTP failure from the backend.
    #[error("api error ({0}): {1}")]
    Status(u16, String),

    /// A response payload could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }
}
