// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bearer token authentication middleware.

use crate::error::{AppError, AuthFailure};
use crate::models::User;
use crate::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Authenticated user resolved from the bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user: User,
}

/// Extract the token from `Authorization: Bearer <token>`.
///
/// The scheme is matched case-insensitively and must be followed by exactly
/// one token.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthFailure> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthFailure::MissingHeader)?
        .to_str()
        .map_err(|_| AuthFailure::MalformedScheme)?;

    let mut parts = value.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
        _ => Err(AuthFailure::MalformedScheme),
    }
}

/// Middleware that requires a valid session token.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers()).map_err(AppError::Unauthenticated)?;
    let user = state.sessions.resolve(token).await?;

    request.extensions_mut().insert(AuthUser { user });

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(&headers("Bearer abc")), Ok("abc"));
        assert_eq!(bearer_token(&headers("bearer abc")), Ok("abc"));
        assert_eq!(bearer_token(&HeaderMap::new()), Err(AuthFailure::MissingHeader));

        for bad in ["Basic abc", "Bearer", "Bearer a b", "abc", ""] {
            assert_eq!(
                bearer_token(&headers(bad)),
                Err(AuthFailure::MalformedScheme),
                "header {:?}",
                bad
            );
        }
    }
}
