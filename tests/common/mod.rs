#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use academy_crm_gateway::backend::{BackendLogin, CrmBackend, RetryPolicy};
use academy_crm_gateway::common::error::AppError;
use academy_crm_gateway::models::auth::UserPayload;
use academy_crm_gateway::models::lead::{Lead, LeadPage, LeadQuery, Pagination};
use academy_crm_gateway::{build_router, AppState, Config};

pub const PASSWORD: &str = "secret123";

/// In-memory stand-in for the CRM REST backend.
#[derive(Default)]
pub struct MemoryBackend {
    users: Mutex<HashMap<String, UserPayload>>,
    leads: Mutex<Vec<Lead>>,
    pub expired: AtomicBool,
    pub last_query: Mutex<Option<LeadQuery>>,
    pub logouts: Mutex<Vec<String>>,
}

impl MemoryBackend {
    pub fn add_user(&self, value: Value) {
        let user: UserPayload = serde_json::from_value(value).expect("user payload");
        self.users.lock().unwrap().insert(user.id.clone(), user);
    }

    pub fn rename_user(&self, id: &str, name: &str) {
        if let Some(user) = self.users.lock().unwrap().get_mut(id) {
            user.name = name.to_string();
        }
    }

    pub fn deactivate_user(&self, id: &str) {
        if let Some(user) = self.users.lock().unwrap().get_mut(id) {
            user.is_active = false;
        }
    }

    pub fn set_leads(&self, leads: Vec<Lead>) {
        *self.leads.lock().unwrap() = leads;
    }

    pub fn expire(&self) {
        self.expired.store(true, Ordering::SeqCst);
    }

    fn user_for_token(&self, token: &str) -> Result<UserPayload, AppError> {
        if self.expired.load(Ordering::SeqCst) {
            return Err(AppError::AuthenticationExpired);
        }
        let id = token.strip_prefix("backend-").ok_or(AppError::AuthenticationExpired)?;
        self.users
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or(AppError::AuthenticationExpired)
    }
}

#[async_trait]
impl CrmBackend for MemoryBackend {
    async fn login(&self, email: &str, password: &str) -> Result<BackendLogin, AppError> {
        let user = self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned()
            .ok_or(AppError::InvalidCredentials)?;
        if password != PASSWORD {
            return Err(AppError::InvalidCredentials);
        }
        Ok(BackendLogin {
            token: format!("backend-{}", user.id),
            user,
        })
    }

    async fn logout(&self, token: &str) -> Result<(), AppError> {
        self.logouts.lock().unwrap().push(token.to_string());
        Ok(())
    }

    async fn current_user(&self, token: &str) -> Result<UserPayload, AppError> {
        self.user_for_token(token)
    }

    async fn list_leads(&self, token: &str, query: &LeadQuery) -> Result<LeadPage, AppError> {
        self.user_for_token(token)?;
        *self.last_query.lock().unwrap() = Some(query.clone());
        let data = self.leads.lock().unwrap().clone();
        let total = data.len() as u64;
        Ok(LeadPage {
            data,
            pagination: Some(Pagination { page: 1, limit: 20, total, total_pages: 1 }),
        })
    }

    async fn list_users(&self, token: &str) -> Result<Vec<UserPayload>, AppError> {
        self.user_for_token(token)?;
        let mut users: Vec<UserPayload> = self.users.lock().unwrap().values().cloned().collect();
        users.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(users)
    }
}

pub fn lead(id: &str, branch: &str, counselor: Option<&str>) -> Lead {
    serde_json::from_value(json!({
        "_id": id,
        "name": format!("Lead {id}"),
        "status": "fresh",
        "branch": branch,
        "assignedCounselor": counselor,
    }))
    .expect("lead")
}

/// Manager, team lead t1 (team: c1) and counselors c1, c3 in Delhi, plus ten
/// leads spread across the three branches.
pub fn seeded_backend() -> Arc<MemoryBackend> {
    let backend = Arc::new(MemoryBackend::default());
    backend.add_user(json!({
        "_id": "m1", "name": "Meera", "email": "manager@dmhca.in", "role": "manager", "branch": "delhi"
    }));
    backend.add_user(json!({
        "_id": "t1", "name": "Tarun", "email": "lead@dmhca.in", "role": "team_lead", "branch": "delhi",
        "teamMembers": ["c1"]
    }));
    backend.add_user(json!({
        "_id": "c1", "name": "Chitra", "email": "c1@dmhca.in", "role": "counselor", "branch": "delhi",
        "teamLeadId": "t1"
    }));
    backend.add_user(json!({
        "_id": "c3", "name": "Kabir", "email": "c3@dmhca.in", "role": "counselor", "branch": "delhi",
        "teamLeadId": "m1"
    }));
    backend.add_user(json!({
        "_id": "x1", "name": "Xavier", "email": "auditor@dmhca.in", "role": "auditor", "branch": "kashmir"
    }));
    backend.add_user(json!({
        "_id": "z1", "name": "Zoya", "email": "inactive@dmhca.in", "role": "counselor", "branch": "delhi",
        "isActive": false
    }));
    backend.set_leads(vec![
        lead("l1", "delhi", Some("c1")),
        lead("l2", "delhi", Some("t1")),
        lead("l3", "hyderabad", Some("c1")),
        lead("l4", "delhi", Some("c3")),
        lead("l5", "kashmir", Some("c2")),
        lead("l6", "delhi", Some("c1")),
        lead("l7", "delhi", None),
        lead("l8", "hyderabad", None),
        lead("l9", "delhi", Some("t1")),
        lead("l10", "kashmir", Some("c1")),
    ]);
    backend
}

pub fn app(backend: Arc<MemoryBackend>) -> Router {
    let config = Config {
        bind_addr: "127.0.0.1:0".to_string(),
        crm_api_url: "http://backend.invalid/api/v1".to_string(),
        jwt_secret: "test-secret".to_string(),
        api_timeout: Duration::from_secs(1),
        retry: RetryPolicy { attempts: 1, initial_delay: Duration::from_millis(1) },
    };
    build_router(AppState::with_backend(config, backend as Arc<dyn CrmBackend>))
}

pub fn json_request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.expect("response")
}

pub async fn read_json(response: Response<Body>) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

/// Logs in and returns the gateway token.
pub async fn login(app: &Router, email: &str) -> String {
    let response = send(
        app,
        json_request("POST", "/api/auth/login", None, Some(json!({ "email": email, "password": PASSWORD }))),
    )
    .await;
    assert_eq!(response.status(), 200, "login as {email}");
    let body = read_json(response).await;
    body["token"].as_str().expect("token").to_string()
}
