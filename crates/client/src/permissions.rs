//! Network-backed permission-decision source.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use gatehouse_authz::PermissionSource;
use gatehouse_core::{ApiError, TenantId};

use crate::interceptor::AuthorizedClient;
use crate::transport::Request;

#[derive(Debug, Deserialize)]
struct LookupResponse {
    allowed: bool,
}

/// Permission lookups over HTTP. Routed through the interceptor bridge, so
/// they are decorated with the current bearer and participate in the
/// refresh-retry path like any other application request.
pub struct HttpPermissionSource {
    client: Arc<AuthorizedClient>,
}

impl HttpPermissionSource {
    pub fn new(client: Arc<AuthorizedClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PermissionSource for HttpPermissionSource {
    async fn allows(
        &self,
        tenant: TenantId,
        module: &str,
        action: &str,
    ) -> Result<bool, ApiError> {
        let path = format!("/permissions/lookup?module={module}&action={action}&tenant={tenant}");
        let response = self.client.execute(Request::get(path)).await?;
        let LookupResponse { allowed } = serde_json::from_value(response.into_success_body()?)
            .map_err(|e| ApiError::decode(e.to_string()))?;
        Ok(allowed)
    }
}

#[cfg(test)]
mod tests {
    use gatehouse_session::Credential;
    use serde_json::json;

    use super::*;
    use crate::testing::{TestCore, profile, response};

    #[tokio::test]
    async fn lookups_are_scoped_and_decorated() {
        let core = TestCore::new();
        let profile = profile();
        let tenant = profile.tenant_id;
        core.session.establish(Credential::new("t1"), profile);

        let path = format!("/permissions/lookup?module=clients&action=delete&tenant={tenant}");
        core.transport
            .enqueue(&path, Ok(response(200, json!({"allowed": true}))));

        let source = HttpPermissionSource::new(core.client.clone());
        assert!(source.allows(tenant, "clients", "delete").await.unwrap());

        let sent = core.transport.requests_for(&path);
        assert_eq!(sent[0].bearer, Some(Credential::new("t1")));
    }
}
