//! Generic request/response pipeline with a reqwest-backed implementation.
//!
//! The [`Transport`] trait is the seam the interceptor bridge composes
//! around; tests substitute in-memory fakes behind it.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use gatehouse_core::{ApiError, ApiResult};
use gatehouse_session::Credential;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

/// An outgoing request, carrying the interceptor state alongside the wire
/// fields.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    /// Bearer credential attached by the interceptor bridge (or explicitly
    /// by the auth endpoints).
    pub bearer: Option<Credential>,
    /// One-shot flag bounding the refresh-retry path to exactly one retry
    /// per request.
    pub retried: bool,
}

impl Request {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
            bearer: None,
            retried: false,
        }
    }

    pub fn post(path: impl Into<String>, body: Option<Value>) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            body,
            bearer: None,
            retried: false,
        }
    }

    pub fn with_bearer(mut self, credential: Credential) -> Self {
        self.bearer = Some(credential);
        self
    }
}

#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    pub body: Value,
}

impl Response {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    /// Decode the body into `T`.
    pub fn json<T: DeserializeOwned>(&self) -> ApiResult<T> {
        serde_json::from_value(self.body.clone()).map_err(|e| ApiError::decode(e.to_string()))
    }

    /// Map the response to its body, or to the error taxonomy on failure.
    /// A 401 here means the session could not be recovered (this is the
    /// post-retry view of a bridge-routed request).
    pub fn into_success_body(self) -> ApiResult<Value> {
        if self.is_unauthorized() {
            Err(ApiError::AuthorizationExpired)
        } else if !self.is_success() {
            Err(ApiError::Status(self.status, self.body.to_string()))
        } else {
            Ok(self.body)
        }
    }

    /// Variant for the auth endpoints themselves, where a 401 means the
    /// submitted credential was rejected (wrong password, revoked grant),
    /// not that an established session expired. Every non-2xx maps to an
    /// ordinary status error.
    pub fn into_auth_body(self) -> ApiResult<Value> {
        if !self.is_success() {
            Err(ApiError::Status(self.status, self.body.to_string()))
        } else {
            Ok(self.body)
        }
    }
}

/// The HTTP pipeline. A completed exchange (any status) is `Ok`; `Err` is
/// reserved for transport-level failures that never produced a response.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: Request) -> ApiResult<Response>;
}

/// Configuration for the reqwest-backed transport.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub connect_timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Production transport backed by `reqwest`, with an in-memory cookie store:
/// the refresh grant is an HttpOnly cookie set at login, so `Set-Cookie` from
/// `/auth/login` must be replayed on `/auth/refresh` for the silent
/// re-authentication path to work at all.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(config: ClientConfig) -> ApiResult<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .cookie_store(true)
            .build()
            .map_err(|e| ApiError::network(e.to_string()))?;
        Ok(Self {
            client,
            base_url: config.base_url,
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: Request) -> ApiResult<Response> {
        let url = format!("{}{}", self.base_url, request.path);
        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Delete => self.client.delete(&url),
        };

        if let Some(bearer) = &request.bearer {
            builder = builder.bearer_auth(bearer.as_str());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::network(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response.json::<Value>().await.unwrap_or(Value::Null);
        Ok(Response { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_body_maps_the_error_taxonomy() {
        let ok = Response {
            status: 200,
            body: serde_json::json!({"token": "t1"}),
        };
        assert!(ok.into_success_body().is_ok());

        let unauthorized = Response {
            status: 401,
            body: Value::Null,
        };
        assert!(matches!(
            unauthorized.into_success_body(),
            Err(ApiError::AuthorizationExpired)
        ));

        let server_error = Response {
            status: 500,
            body: Value::Null,
        };
        assert!(matches!(
            server_error.into_success_body(),
            Err(ApiError::Status(500, _))
        ));
    }

    #[test]
    fn auth_endpoint_401_is_an_ordinary_status_error() {
        let rejected = Response {
            status: 401,
            body: serde_json::json!({"error": "invalid credentials"}),
        };
        assert!(matches!(
            rejected.into_auth_body(),
            Err(ApiError::Status(401, _))
        ));
    }

    #[test]
    fn production_transport_builds_with_its_cookie_store() {
        assert!(HttpTransport::new(ClientConfig::new("http://localhost:0")).is_ok());
    }
}
