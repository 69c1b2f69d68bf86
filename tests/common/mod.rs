#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, Once};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::Value as JsonValue;
use tower::ServiceExt;
use uuid::Uuid;

use job_portal_backend::{
    api_router,
    middleware::auth::Claims,
    services::notification_service::{Notification, NotificationSink, SinkError},
    store::MemoryStore,
    AppState,
};

pub const TEST_JWT_SECRET: &str = "test_secret_key";

/// Sink that records everything it is asked to deliver; a one-shot failure
/// can be injected to exercise the best-effort contract.
#[derive(Default)]
pub struct RecordingSink {
    pub sent: Mutex<Vec<Notification>>,
    pub fail_next: AtomicBool,
}

impl RecordingSink {
    pub fn fail_next_delivery(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }

    pub fn delivered(&self) -> Vec<Notification> {
        self.sent.lock().expect("sink mutex poisoned").clone()
    }
}

#[async_trait]
impl NotificationSink for RecordingSink {
    async fn deliver(&self, notification: &Notification) -> Result<(), SinkError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(SinkError::Transport("injected delivery failure".into()));
        }
        self.sent
            .lock()
            .expect("sink mutex poisoned")
            .push(notification.clone());
        Ok(())
    }
}

pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub sink: Arc<RecordingSink>,
    pub app: Router,
}

fn init_test_config() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        std::env::set_var("SERVER_ADDRESS", "127.0.0.1:0");
        std::env::set_var("DATABASE_URL", "postgres://localhost/unused_in_tests");
        std::env::set_var("JWT_SECRET", TEST_JWT_SECRET);
        std::env::set_var("NOTIFICATION_WEBHOOK_URL", "http://localhost/webhook");
        job_portal_backend::config::init_config().expect("init config");
    });
}

pub fn setup() -> TestContext {
    init_test_config();
    let store = Arc::new(MemoryStore::new());
    let sink = Arc::new(RecordingSink::default());
    let state = AppState::new(store.clone(), sink.clone());
    let app = api_router(state);
    TestContext { store, sink, app }
}

pub fn token_for(user_id: Uuid, role: &str) -> String {
    let claims = Claims {
        sub: user_id.to_string(),
        exp: 4102444800, // 2100-01-01
        role: Some(role.to_string()),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("token encoding")
}

pub async fn request(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<JsonValue>,
) -> (StatusCode, JsonValue) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .expect("request build"),
        None => builder.body(Body::empty()).expect("request build"),
    };

    let response = app.clone().oneshot(request).await.expect("router call");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, json)
}
