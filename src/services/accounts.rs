// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account store: signup, login and user lookups.

use crate::db::Db;
use crate::error::Result;
use crate::models::User;
use crate::services::{ids, SessionRegistry};
use crate::time_utils::now_rfc3339;
use subtle::ConstantTimeEq;

/// Message shown for any credential mismatch.
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Result of a login attempt that ran to completion.
///
/// A credential mismatch is a normal outcome, not an error.
#[derive(Debug)]
pub enum LoginOutcome {
    Success { user: User, token: String },
    Failure { reason: &'static str },
}

#[derive(Clone)]
pub struct AccountService {
    db: Db,
    sessions: SessionRegistry,
}

impl AccountService {
    pub fn new(db: Db, sessions: SessionRegistry) -> Self {
        Self { db, sessions }
    }

    /// Create a user with `high_score` 0.
    ///
    /// Fails with `Conflict` if the email or username is already present.
    /// Both comparisons are exact; no case folding or trimming.
    pub async fn create_user(&self, username: &str, email: &str, secret: &str) -> Result<User> {
        let user = User {
            id: ids::new_id()?,
            username: username.to_string(),
            email: email.to_string(),
            secret: secret.to_string(),
            high_score: 0,
            created_at: now_rfc3339(),
        };
        self.db.create_user(&user).await?;

        tracing::info!(user_id = %user.id, username = %user.username, "User created");
        Ok(user)
    }

    pub async fn find_by_id(&self, user_id: &str) -> Result<Option<User>> {
        self.db.get_user(user_id).await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        self.db.find_user_by_email(email).await
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        self.db.find_user_by_username(username).await
    }

    /// Create the account and open its first session.
    pub async fn signup(&self, username: &str, email: &str, secret: &str) -> Result<(User, String)> {
        let user = self.create_user(username, email, secret).await?;
        let token = self.sessions.issue(&user.id).await?;
        Ok((user, token))
    }

    /// Check credentials and open a session on success.
    pub async fn login(&self, email: &str, secret: &str) -> Result<LoginOutcome> {
        let Some(user) = self.db.find_user_by_email(email).await? else {
            tracing::info!("Login failed: unknown email");
            return Ok(LoginOutcome::Failure {
                reason: INVALID_CREDENTIALS,
            });
        };

        if !bool::from(user.secret.as_bytes().ct_eq(secret.as_bytes())) {
            tracing::info!(user_id = %user.id, "Login failed: bad credentials");
            return Ok(LoginOutcome::Failure {
                reason: INVALID_CREDENTIALS,
            });
        }

        let token = self.sessions.issue(&user.id).await?;
        tracing::info!(user_id = %user.id, "User logged in");
        Ok(LoginOutcome::Success { user, token })
    }
}
