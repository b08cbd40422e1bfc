// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use eatopia::config::Config;
use eatopia::db::{DocumentStore, FirestoreStore, MemoryStore};
use eatopia::middleware::auth::{create_jwt, Claims, SESSION_COOKIE};
use eatopia::routes::create_router;
use eatopia::AppState;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreStore {
    FirestoreStore::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

fn app_with_store(db: Arc<dyn DocumentStore>) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState {
        config: Config::test_default(),
        db,
    });
    (create_router(state.clone()), state)
}

/// Create a test app backed by a fresh in-memory store.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    app_with_store(Arc::new(MemoryStore::new()))
}

/// Create a test app whose store is not connected (every call fails).
#[allow(dead_code)]
pub fn create_offline_app() -> (axum::Router, Arc<AppState>) {
    app_with_store(Arc::new(FirestoreStore::new_offline()))
}

/// `Cookie` header value carrying a session for `email`.
#[allow(dead_code)]
pub fn session_cookie(email: &str, signing_key: &[u8]) -> String {
    let now = chrono::Utc::now().timestamp() as usize;
    let user = json!({ "email": email }).as_object().cloned().unwrap();
    let token = create_jwt(&Claims::from_login(user, now, 3600), signing_key).unwrap();
    format!("{SESSION_COOKIE}={token}")
}

/// Build a request with an optional JSON body.
#[allow(dead_code)]
pub fn request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Send one request through a clone of the router.
#[allow(dead_code)]
pub async fn send(app: &axum::Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

#[allow(dead_code)]
pub async fn read_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

/// POST a listing and return its inserted ID.
#[allow(dead_code)]
pub async fn create_food(app: &axum::Router, food: Value) -> String {
    let response = send(app, request(Method::POST, "/foods", Some(food))).await;
    assert_eq!(response.status(), axum::http::StatusCode::OK);
    read_json(response).await["insertedId"]
        .as_str()
        .expect("insertedId")
        .to_string()
}
