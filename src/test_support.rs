//! Test doubles shared by the unit tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::oneshot;

use crate::config::ClientConfig;
use crate::net::api::ApiClient;
use crate::net::transport::{HttpRequest, HttpResponse, Transport, TransportError};
use crate::routing::Navigator;
use crate::routing::guard::{RenderPass, RouteGuard};
use crate::routing::routes::RouteTable;
use crate::state::auth::AuthSession;
use crate::state::session::SessionStore;
use crate::util::notify::{Notifier, Severity};
use crate::util::storage::MemoryStorage;

// =============================================================================
// TRANSPORT
// =============================================================================

struct Scripted {
    result: Result<HttpResponse, TransportError>,
    gate: Option<oneshot::Receiver<()>>,
}

/// Transport replaying scripted results in order and recording requests.
#[derive(Default)]
pub struct MockTransport {
    script: RefCell<VecDeque<Scripted>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn respond(&self, status: u16, body: &Value) {
        self.push(Ok(HttpResponse::new(status, body.to_string())), None);
    }

    pub fn respond_raw(&self, status: u16, body: &str) {
        self.push(Ok(HttpResponse::new(status, body)), None);
    }

    pub fn fail(&self, err: TransportError) {
        self.push(Err(err), None);
    }

    /// Queue a response that is only delivered once the returned sender fires.
    pub fn respond_gated(&self, status: u16, body: &Value) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.push(Ok(HttpResponse::new(status, body.to_string())), Some(rx));
        tx
    }

    fn push(&self, result: Result<HttpResponse, TransportError>, gate: Option<oneshot::Receiver<()>>) {
        self.script.borrow_mut().push_back(Scripted { result, gate });
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.borrow().clone()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests
            .borrow()
            .last()
            .cloned()
            .expect("no request was sent")
    }
}

#[async_trait(?Send)]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.borrow_mut().push(request);
        let next = self.script.borrow_mut().pop_front();
        let Some(Scripted { result, gate }) = next else {
            return Err(TransportError::Network("no scripted response".to_owned()));
        };
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        result
    }
}

// =============================================================================
// NOTIFIER / NAVIGATOR
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub severity: Severity,
    pub title: String,
    pub message: Option<String>,
}

#[derive(Default)]
pub struct RecordingNotifier {
    notices: RefCell<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.borrow().clone()
    }

    pub fn count_titled(&self, title: &str) -> usize {
        self.notices.borrow().iter().filter(|n| n.title == title).count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, severity: Severity, title: &str, message: Option<&str>) {
        self.notices.borrow_mut().push(Notice {
            severity,
            title: title.to_owned(),
            message: message.map(str::to_owned),
        });
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    visits: RefCell<Vec<String>>,
}

impl RecordingNavigator {
    pub fn visits(&self) -> Vec<String> {
        self.visits.borrow().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.visits.borrow_mut().push(path.to_owned());
    }
}

// =============================================================================
// HARNESS
// =============================================================================

/// Fully wired session stack over in-memory doubles.
pub struct Harness {
    pub config: ClientConfig,
    pub storage: Rc<MemoryStorage>,
    pub transport: Rc<MockTransport>,
    pub notifier: Rc<RecordingNotifier>,
    pub navigator: Rc<RecordingNavigator>,
    pub session: Rc<SessionStore>,
    pub api: ApiClient,
    pub auth: AuthSession,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_storage(Rc::new(MemoryStorage::new()))
    }

    /// Build a second stack over existing storage, as after a page reload.
    pub fn with_storage(storage: Rc<MemoryStorage>) -> Self {
        let config = ClientConfig::default();
        let transport = Rc::new(MockTransport::default());
        let notifier = Rc::new(RecordingNotifier::default());
        let navigator = Rc::new(RecordingNavigator::default());
        let session = Rc::new(SessionStore::new(storage.clone(), &config));
        let api = ApiClient::new(&config, transport.clone(), session.clone(), notifier.clone(), navigator.clone());
        let auth = AuthSession::new(&config, session.clone(), api.clone(), notifier.clone(), navigator.clone());
        Self { config, storage, transport, notifier, navigator, session, api, auth }
    }

    pub fn guard(&self, table: RouteTable) -> RouteGuard {
        RouteGuard::new(&self.config, table, self.notifier.clone()).with_pass(RenderPass::Client)
    }

    /// Log in as a user with `role_id` 3 and token `T`.
    pub async fn logged_in(self) -> Self {
        self.transport
            .respond(200, &json!({"data": {"token": "T", "user": user_json()}}));
        let result = self.auth.login("alice", "secret").await;
        assert!(result.success, "login should succeed: {result:?}");
        self
    }
}

pub fn user_json() -> Value {
    json!({
        "id": 1,
        "name": "Alice",
        "username": "alice",
        "email": "alice@example.com",
        "roleId": 3,
        "status": "active",
        "role": {"id": 3, "name": "admin", "description": ""}
    })
}

pub fn menus_json(top: &[&str], child: &[&str]) -> Value {
    json!({"data": [{"name": "Root", "permissionList": top, "children": [{"permissionList": child}]}]})
}
