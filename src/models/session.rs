// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session record backing an issued bearer token.

use serde::{Deserialize, Serialize};

/// Session stored in the `sessions` collection.
///
/// Keyed by the SHA-256 digest of the token; the raw token is never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Hex SHA-256 of the bearer token (also used as document ID)
    pub token_digest: String,
    /// Owning user
    pub user_id: String,
    /// When the token was issued (RFC3339)
    pub created_at: String,
    /// When the token stops resolving (RFC3339), if it expires at all
    #[serde(default)]
    pub expires_at: Option<String>,
}
