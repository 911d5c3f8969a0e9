// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session registry: bearer tokens to users.

use crate::db::Db;
use crate::error::{AppError, AuthFailure, Result};
use crate::models::{Session, User};
use crate::services::ids;
use crate::time_utils::{format_utc_rfc3339, parse_utc_rfc3339};
use chrono::{Duration, Utc};

/// About a century; keeps `expires_at` arithmetic in range.
const MAX_TTL_HOURS: u64 = 24 * 365 * 100;

/// Issues, resolves and revokes bearer tokens.
///
/// Expiry is optional and checked lazily: an expired session is deleted the
/// first time someone presents its token.
#[derive(Clone)]
pub struct SessionRegistry {
    db: Db,
    ttl: Option<Duration>,
}

impl SessionRegistry {
    pub fn new(db: Db, ttl_hours: Option<u64>) -> Self {
        let ttl = ttl_hours.map(|h| Duration::hours(h.min(MAX_TTL_HOURS) as i64));
        Self { db, ttl }
    }

    /// Create a session for `user_id` and return its token.
    pub async fn issue(&self, user_id: &str) -> Result<String> {
        let token = ids::new_token()?;
        let now = Utc::now();

        let session = Session {
            token_digest: ids::token_digest(&token),
            user_id: user_id.to_string(),
            created_at: format_utc_rfc3339(now),
            expires_at: self.ttl.map(|ttl| format_utc_rfc3339(now + ttl)),
        };
        // A digest collision overwrites the older session.
        self.db.put_session(&session).await?;

        tracing::debug!(user_id, expires_at = ?session.expires_at, "Session issued");
        Ok(token)
    }

    /// Resolve a token to its user.
    ///
    /// Unknown, expired, and orphaned tokens all fail as `Unauthenticated`.
    pub async fn resolve(&self, token: &str) -> Result<User> {
        let digest = ids::token_digest(token);
        let session = self
            .db
            .get_session(&digest)
            .await?
            .ok_or(AppError::Unauthenticated(AuthFailure::UnknownToken))?;

        if let Some(expires_at) = &session.expires_at {
            // Unparseable expiry fails closed.
            let expired = parse_utc_rfc3339(expires_at).map_or(true, |exp| Utc::now() >= exp);
            if expired {
                self.db.delete_session(&digest).await?;
                tracing::debug!(user_id = %session.user_id, "Expired session removed");
                return Err(AppError::Unauthenticated(AuthFailure::ExpiredToken));
            }
        }

        self.db
            .get_user(&session.user_id)
            .await?
            .ok_or(AppError::Unauthenticated(AuthFailure::UnknownToken))
    }

    /// Revoke a token. Unknown or already-revoked tokens are a no-op.
    pub async fn revoke(&self, token: &str) -> Result<()> {
        self.db.delete_session(&ids::token_digest(token)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn registry_with_user(ttl_hours: Option<u64>) -> (SessionRegistry, Db, User) {
        let db = Db::memory();
        let user = User {
            id: "u1".to_string(),
            username: "alice".to_string(),
            email: "a@x.com".to_string(),
            secret: "pw".to_string(),
            high_score: 0,
            created_at: crate::time_utils::now_rfc3339(),
        };
        db.create_user(&user).await.unwrap();
        (SessionRegistry::new(db.clone(), ttl_hours), db, user)
    }

    #[tokio::test]
    async fn test_issue_then_resolve() {
        let (sessions, _, user) = registry_with_user(None).await;
        let token = sessions.issue(&user.id).await.unwrap();
        assert_eq!(sessions.resolve(&token).await.unwrap().id, user.id);
    }

    #[tokio::test]
    async fn test_tokens_are_unrelated_to_user_id() {
        let (sessions, _, user) = registry_with_user(None).await;
        let a = sessions.issue(&user.id).await.unwrap();
        let b = sessions.issue(&user.id).await.unwrap();
        assert_ne!(a, b);
        assert_ne!(ids::token_digest(&a), ids::token_digest(&b));
    }

    #[tokio::test]
    async fn test_revoke_is_idempotent() {
        let (sessions, _, user) = registry_with_user(None).await;
        let token = sessions.issue(&user.id).await.unwrap();

        sessions.revoke(&token).await.unwrap();
        sessions.revoke(&token).await.unwrap();
        sessions.revoke("never-issued").await.unwrap();

        let err = sessions.resolve(&token).await.unwrap_err();
        assert_eq!(err.auth_failure(), Some(AuthFailure::UnknownToken));
    }

    #[tokio::test]
    async fn test_expired_session_is_removed_lazily() {
        let (sessions, db, user) = registry_with_user(Some(1)).await;
        let token = sessions.issue(&user.id).await.unwrap();
        let digest = ids::token_digest(&token);

        let mut session = db.get_session(&digest).await.unwrap().unwrap();
        assert!(session.expires_at.is_some());
        session.expires_at = Some(format_utc_rfc3339(Utc::now() - Duration::seconds(1)));
        db.put_session(&session).await.unwrap();

        let err = sessions.resolve(&token).await.unwrap_err();
        assert_eq!(err.auth_failure(), Some(AuthFailure::ExpiredToken));
        assert!(db.get_session(&digest).await.unwrap().is_none());

        // Second attempt sees no session at all
        let err = sessions.resolve(&token).await.unwrap_err();
        assert_eq!(err.auth_failure(), Some(AuthFailure::UnknownToken));
    }

    #[tokio::test]
    async fn test_no_ttl_means_no_expiry() {
        let (sessions, db, user) = registry_with_user(None).await;
        let token = sessions.issue(&user.id).await.unwrap();
        let session = db
            .get_session(&ids::token_digest(&token))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(session.expires_at, None);
    }
}
