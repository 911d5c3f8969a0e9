// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account and session routes.

use crate::error::{AppError, Result};
use crate::middleware::auth::{bearer_token, AuthUser};
use crate::models::User;
use crate::services::LoginOutcome;
use crate::AppState;
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;
use validator::Validate;

/// Public account routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/logout", post(logout))
}

/// Account routes that need a session (auth middleware applied in routes/mod.rs).
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new().route("/auth/me", get(get_me))
}

// ─── Response Types ──────────────────────────────────────────

/// Public view of a user (no credentials).
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "frontend/src/lib/generated/")
)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub created_at: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub high_score: i64,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            created_at: user.created_at,
            high_score: user.high_score,
        }
    }
}

/// Signup and login result.
#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "frontend/src/lib/generated/")
)]
pub struct AuthResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AuthResult {
    fn success(user: User, token: String) -> Self {
        Self {
            success: true,
            user: Some(user.into()),
            token: Some(token),
            error: None,
        }
    }
}

// ─── Signup / Login ──────────────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 1, max = 255))]
    username: String,
    #[validate(email)]
    email: String,
    #[validate(length(min = 1))]
    password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}

/// Create an account and log it in.
async fn signup(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResult>)> {
    request
        .validate()
        .map_err(|e| AppError::InvalidArgument(e.to_string()))?;

    let (user, token) = state
        .accounts
        .signup(&request.username, &request.email, &request.password)
        .await?;

    Ok((StatusCode::CREATED, Json(AuthResult::success(user, token))))
}

/// Check credentials. Bad credentials are a 200 with `success: false`.
async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResult>> {
    let result = match state
        .accounts
        .login(&request.email, &request.password)
        .await?
    {
        LoginOutcome::Success { user, token } => AuthResult::success(user, token),
        LoginOutcome::Failure { reason } => AuthResult {
            success: false,
            user: None,
            token: None,
            error: Some(reason.to_string()),
        },
    };
    Ok(Json(result))
}

/// End the presented session. Never fails.
async fn logout(State(state): State<Arc<AppState>>, headers: HeaderMap) -> StatusCode {
    if let Ok(token) = bearer_token(&headers) {
        if let Err(e) = state.sessions.revoke(token).await {
            tracing::warn!(error = %e, "Failed to revoke session on logout");
        }
    }
    StatusCode::NO_CONTENT
}

// ─── Current User ────────────────────────────────────────────

/// Get current user profile.
async fn get_me(Extension(auth): Extension<AuthUser>) -> Json<UserResponse> {
    Json(auth.user.into())
}
