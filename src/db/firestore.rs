// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (accounts and cached high score)
//! - Sessions (keyed by token digest)
//! - Leaderboard entries (append-only ledger)
//! - Active players (watch-mode snapshots)

use crate::db::collections;
use crate::error::AppError;
use crate::models::{ActivePlayer, ActivePlayerDoc, LeaderboardEntry, Session, User};
use crate::time_utils::now_rfc3339;
use firestore::errors::FirestoreError;
use firestore::{FirestoreQueryDirection, FirestoreWritePrecondition};
use futures_util::FutureExt;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Claim document reserving a unique username or email for one user.
#[derive(Debug, Serialize, Deserialize)]
struct IdentityClaim {
    user_id: String,
}

/// Result of the signup transaction.
enum Signup {
    Created,
    Taken(&'static str),
}

/// Result row of a count aggregation.
#[derive(Debug, Deserialize)]
struct CountRow {
    count: u64,
}

/// Document ID for a claim. Raw usernames and emails may contain `/`.
fn claim_id(value: &str) -> String {
    hex::encode(Sha256::digest(value.as_bytes()))
}

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Insert a new user. Fails with `Conflict` if the email or username is taken.
    ///
    /// Uniqueness is enforced by claim documents in `usernames` and `emails`,
    /// created with the user in one transaction. The claims are read inside the
    /// transaction and written with an `exists: false` precondition, so of two
    /// racing signups for the same name exactly one commits.
    pub async fn create_user(&self, user: &User) -> Result<(), AppError> {
        let outcome = self
            .get_client()?
            .run_transaction::<Signup, _, FirestoreError>(|db, transaction| {
                let user = user.clone();
                async move {
                    let email_claim = claim_id(&user.email);
                    let username_claim = claim_id(&user.username);

                    let taken: Option<IdentityClaim> = db
                        .fluent()
                        .select()
                        .by_id_in(collections::EMAILS)
                        .obj()
                        .one(&email_claim)
                        .await?;
                    if taken.is_some() {
                        return Ok(Signup::Taken("Email already registered"));
                    }

                    let taken: Option<IdentityClaim> = db
                        .fluent()
                        .select()
                        .by_id_in(collections::USERNAMES)
                        .obj()
                        .one(&username_claim)
                        .await?;
                    if taken.is_some() {
                        return Ok(Signup::Taken("Username already taken"));
                    }

                    let claim = IdentityClaim {
                        user_id: user.id.clone(),
                    };
                    for (collection, doc_id) in [
                        (collections::EMAILS, &email_claim),
                        (collections::USERNAMES, &username_claim),
                    ] {
                        db.fluent()
                            .update()
                            .in_col(collection)
                            .precondition(FirestoreWritePrecondition::Exists(false))
                            .document_id(doc_id)
                            .object(&claim)
                            .add_to_transaction(transaction)?;
                    }

                    db.fluent()
                        .update()
                        .in_col(collections::USERS)
                        .precondition(FirestoreWritePrecondition::Exists(false))
                        .document_id(&user.id)
                        .object(&user)
                        .add_to_transaction(transaction)?;

                    Ok(Signup::Created)
                }
                .boxed()
            })
            .await
            .map_err(|e| match e {
                // A claim written by a concurrent commit fails the precondition.
                FirestoreError::DataConflictError(_) => {
                    AppError::Conflict("Username or email already taken".to_string())
                }
                FirestoreError::DatabaseError(ref db_err)
                    if db_err.public.code == "FailedPrecondition" =>
                {
                    AppError::Conflict("Username or email already taken".to_string())
                }
                other => AppError::Database(format!("Signup transaction failed: {}", other)),
            })?;

        match outcome {
            Signup::Created => {
                tracing::debug!(user_id = %user.id, "Stored new user");
                Ok(())
            }
            Signup::Taken(reason) => Err(AppError::Conflict(reason.to_string())),
        }
    }

    /// Get a user by ID.
    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(user_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        self.find_user_by_field("email", email).await
    }

    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        self.find_user_by_field("username", username).await
    }

    async fn find_user_by_field(&self, field: &str, value: &str) -> Result<Option<User>, AppError> {
        let users: Vec<User> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .filter(|q| q.for_all([q.field(field).eq(value)]))
            .limit(1)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(users.into_iter().next())
    }

    // ─── Session Operations ──────────────────────────────────────

    /// Store a session, replacing any session with the same digest.
    pub async fn put_session(&self, session: &Session) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::SESSIONS)
            .document_id(&session.token_digest)
            .object(session)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    pub async fn get_session(&self, token_digest: &str) -> Result<Option<Session>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::SESSIONS)
            .obj()
            .one(token_digest)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Delete a session. Deleting a missing document is not an error.
    pub async fn delete_session(&self, token_digest: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::SESSIONS)
            .document_id(token_digest)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Leaderboard Operations ──────────────────────────────────

    /// Atomically append a ledger entry and raise the owner's high score.
    ///
    /// Runs as a retried read-write transaction: the owner is read inside it,
    /// so a concurrent commit touching the same user aborts and replays this
    /// one. The high score is raised with a server-side `maximum` transform,
    /// which can only move it up.
    ///
    /// Returns `false` without writing if the owning user does not exist.
    pub async fn submit_score(&self, entry: &LeaderboardEntry) -> Result<bool, AppError> {
        let recorded = self
            .get_client()?
            .run_transaction::<bool, _, FirestoreError>(|db, transaction| {
                let entry = entry.clone();
                async move {
                    let owner: Option<User> = db
                        .fluent()
                        .select()
                        .by_id_in(collections::USERS)
                        .obj()
                        .one(&entry.user_id)
                        .await?;

                    if owner.is_none() {
                        return Ok(false);
                    }

                    db.fluent()
                        .update()
                        .in_col(collections::LEADERBOARD_ENTRIES)
                        .document_id(&entry.id)
                        .object(&entry)
                        .add_to_transaction(transaction)?;

                    let score = entry.score;
                    db.fluent()
                        .update()
                        .in_col(collections::USERS)
                        .precondition(FirestoreWritePrecondition::Exists(true))
                        .document_id(&entry.user_id)
                        .transforms(|t| t.fields([t.field("high_score").maximum(score)]))
                        .only_transform()
                        .add_to_transaction(transaction)?;

                    Ok(true)
                }
                .boxed()
            })
            .await
            .map_err(|e| AppError::Database(format!("Score transaction failed: {}", e)))?;

        if !recorded {
            tracing::warn!(
                user_id = %entry.user_id,
                "User not found, aborting score submission"
            );
        }
        Ok(recorded)
    }

    /// Competition rank of `score` within `mode`.
    ///
    /// Counted server-side, so the cost does not grow with the ledger.
    pub async fn rank_in_mode(&self, mode: &str, score: i64) -> Result<u64, AppError> {
        let rows: Vec<CountRow> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::LEADERBOARD_ENTRIES)
            .filter(|q| {
                q.for_all([
                    q.field("mode").eq(mode),
                    q.field("score").greater_than(score),
                ])
            })
            .aggregate(|a| a.fields([a.field("count").count()]))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let above = rows.first().map_or(0, |row| row.count);
        Ok(1 + above)
    }

    /// Entries sorted by score then date (both descending), optionally for one mode.
    pub async fn list_entries(
        &self,
        mode: Option<&str>,
        limit: usize,
    ) -> Result<Vec<LeaderboardEntry>, AppError> {
        let limit = u32::try_from(limit).unwrap_or(u32::MAX);
        let mode = mode.map(str::to_string);

        self.get_client()?
            .fluent()
            .select()
            .from(collections::LEADERBOARD_ENTRIES)
            .filter(move |q| q.for_all([mode.clone().and_then(|m| q.field("mode").eq(m))]))
            .order_by([
                ("score", FirestoreQueryDirection::Descending),
                ("date", FirestoreQueryDirection::Descending),
            ])
            .limit(limit)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    // ─── Active Player Operations ────────────────────────────────

    /// Replace the snapshot for this player. Last write wins.
    pub async fn upsert_player(&self, player: &ActivePlayer) -> Result<(), AppError> {
        let doc = ActivePlayerDoc::from_player(player, now_rfc3339())
            .map_err(|e| AppError::Internal(e.into()))?;

        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::ACTIVE_PLAYERS)
            .document_id(&player.id)
            .object(&doc)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    pub async fn get_player(&self, player_id: &str) -> Result<Option<ActivePlayer>, AppError> {
        let doc: Option<ActivePlayerDoc> = self
            .get_client()?
            .fluent()
            .select()
            .by_id_in(collections::ACTIVE_PLAYERS)
            .obj()
            .one(player_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        doc.map(decode_player).transpose()
    }

    /// All snapshots, or only those still playing.
    pub async fn list_players(&self, playing_only: bool) -> Result<Vec<ActivePlayer>, AppError> {
        let docs: Vec<ActivePlayerDoc> = self
            .get_client()?
            .fluent()
            .select()
            .from(collections::ACTIVE_PLAYERS)
            .filter(move |q| {
                q.for_all([playing_only
                    .then(|| q.field("is_playing").eq(true))
                    .flatten()])
            })
            .order_by([("id", FirestoreQueryDirection::Ascending)])
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        docs.into_iter().map(decode_player).collect()
    }

    /// Returns `true` if a snapshot was removed.
    pub async fn remove_player(&self, player_id: &str) -> Result<bool, AppError> {
        if self.get_player(player_id).await?.is_none() {
            return Ok(false);
        }

        self.get_client()?
            .fluent()
            .delete()
            .from(collections::ACTIVE_PLAYERS)
            .document_id(player_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(true)
    }
}

fn decode_player(doc: ActivePlayerDoc) -> Result<ActivePlayer, AppError> {
    let id = doc.id.clone();
    doc.into_player().map_err(|e| {
        AppError::Database(format!("Corrupt snake_json for player {}: {}", id, e))
    })
}
