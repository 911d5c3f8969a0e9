// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Why a request failed authentication.
///
/// Kept for logging and tests only. Every variant renders the same
/// response so callers cannot probe whether a token was ever valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    /// No `Authorization` header at all.
    MissingHeader,
    /// Header present but not `Bearer <token>`.
    MalformedScheme,
    /// Token has no session.
    UnknownToken,
    /// Session existed but its `expires_at` has passed.
    ExpiredToken,
}

impl std::fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            AuthFailure::MissingHeader => "missing authorization header",
            AuthFailure::MalformedScheme => "malformed authorization scheme",
            AuthFailure::UnknownToken => "unknown token",
            AuthFailure::ExpiredToken => "expired token",
        };
        f.write_str(reason)
    }
}

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required ({0})")]
    Unauthenticated(AuthFailure),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// The internal authentication failure reason, if this is an auth error.
    pub fn auth_failure(&self) -> Option<AuthFailure> {
        match self {
            AppError::Unauthenticated(reason) => Some(*reason),
            _ => None,
        }
    }
}

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            AppError::Unauthenticated(reason) => {
                tracing::debug!(reason = %reason, "Rejected unauthenticated request");
                (StatusCode::UNAUTHORIZED, "unauthenticated", None)
            }
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", Some(msg.clone())),
            AppError::InvalidArgument(msg) => (
                StatusCode::BAD_REQUEST,
                "invalid_argument",
                Some(msg.clone()),
            ),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", Some(msg.clone())),
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                (StatusCode::INTERNAL_SERVER_ERROR, "database_error", None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
