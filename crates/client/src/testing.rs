//! In-memory test doubles shared by the client-crate tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use gatehouse_authz::{AccessLevel, Profile};
use gatehouse_core::{ApiResult, TenantId, UserId};
use gatehouse_session::{RefreshCoordinator, SessionStore};

use crate::api::AuthApi;
use crate::bootstrap::Bootstrapper;
use crate::interceptor::AuthorizedClient;
use crate::transport::{Request, Response, Transport};

pub(crate) fn profile() -> Profile {
    Profile {
        user_id: UserId::new(),
        tenant_id: TenantId::new(),
        display_name: "Test".to_string(),
        roles: Vec::new(),
        access_level: AccessLevel::USER,
        is_super_admin: false,
    }
}

pub(crate) fn response(status: u16, body: Value) -> Response {
    Response { status, body }
}

/// Scripted transport: responses are enqueued per path and consumed in
/// order; every executed request is recorded for assertions. Yields before
/// answering so concurrent callers interleave the way they would over a real
/// network.
pub(crate) struct MockTransport {
    responses: Mutex<HashMap<String, VecDeque<ApiResult<Response>>>>,
    requests: Mutex<Vec<Request>>,
}

impl MockTransport {
    pub(crate) fn new() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn enqueue(&self, path: &str, response: ApiResult<Response>) {
        self.responses
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .push_back(response);
    }

    pub(crate) fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn requests_for(&self, path: &str) -> Vec<Request> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }

    pub(crate) fn count_for(&self, path: &str) -> usize {
        self.requests_for(path).len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: Request) -> ApiResult<Response> {
        self.requests.lock().unwrap().push(request.clone());
        for _ in 0..2 {
            tokio::task::yield_now().await;
        }
        self.responses
            .lock()
            .unwrap()
            .get_mut(&request.path)
            .and_then(|queue| queue.pop_front())
            .unwrap_or_else(|| panic!("no scripted response for {}", request.path))
    }
}

/// Fully wired core over a [`MockTransport`].
pub(crate) struct TestCore {
    pub(crate) transport: Arc<MockTransport>,
    pub(crate) session: Arc<SessionStore>,
    pub(crate) coordinator: Arc<RefreshCoordinator>,
    pub(crate) api: Arc<AuthApi>,
    pub(crate) client: Arc<AuthorizedClient>,
    pub(crate) bootstrap: Arc<Bootstrapper>,
}

impl TestCore {
    pub(crate) fn new() -> Self {
        let transport = Arc::new(MockTransport::new());
        let session = Arc::new(SessionStore::new());
        let api = Arc::new(AuthApi::new(transport.clone(), session.clone()));
        let coordinator = Arc::new(RefreshCoordinator::new(session.clone(), api.clone()));
        let client = Arc::new(AuthorizedClient::new(
            transport.clone(),
            session.clone(),
            coordinator.clone(),
        ));
        let bootstrap = Arc::new(Bootstrapper::new(
            session.clone(),
            coordinator.clone(),
            api.clone(),
        ));
        Self {
            transport,
            session,
            coordinator,
            api,
            client,
            bootstrap,
        }
    }
}
