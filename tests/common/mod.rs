// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use snake_duel::config::Config;
use snake_duel::db::{Db, FirestoreDb};
use snake_duel::routes::create_router;
use snake_duel::AppState;
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
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a test app backed by a fresh in-memory store.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with(Config::test_default(), Db::memory())
}

#[allow(dead_code)]
pub fn create_test_app_with(config: Config, db: Db) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(config, db));
    (create_router(state.clone()), state)
}

/// Send a request and decode the JSON body (`Null` for empty bodies).
#[allow(dead_code)]
pub async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let json = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null)
    };
    (status, json)
}

#[allow(dead_code)]
pub fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

#[allow(dead_code)]
pub fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Sign up through the API and return the issued token.
#[allow(dead_code)]
pub async fn signup(app: &axum::Router, username: &str, email: &str) -> String {
    let (status, json) = send(
        app,
        json_request(
            "POST",
            "/auth/signup",
            None,
            serde_json::json!({ "username": username, "email": email, "password": "pw" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "signup failed: {}", json);
    json["token"].as_str().unwrap().to_string()
}

/// Submit a score through the API and return the reported rank.
#[allow(dead_code)]
pub async fn submit(app: &axum::Router, token: &str, score: i64, mode: &str) -> u64 {
    let (status, json) = send(
        app,
        json_request(
            "POST",
            "/leaderboard/score",
            Some(token),
            serde_json::json!({ "score": score, "mode": mode }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "submit failed: {}", json);
    assert_eq!(json["success"], true);
    json["rank"].as_u64().unwrap()
}
