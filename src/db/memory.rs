// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-process storage backend.
//!
//! Accounts and the leaderboard ledger share one lock so a score append and
//! the matching high-score raise land in a single critical section. Sessions
//! and active players are independent per key and live in concurrent maps.

use crate::error::AppError;
use crate::models::leaderboard::{competition_rank, sort_for_display};
use crate::models::{ActivePlayer, LeaderboardEntry, Session, User};
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Users plus the append-only score ledger.
#[derive(Default)]
struct Ledger {
    users: HashMap<String, User>,
    /// email -> user id
    emails: HashMap<String, String>,
    /// username -> user id
    usernames: HashMap<String, String>,
    /// Insertion order
    entries: Vec<LeaderboardEntry>,
}

#[derive(Default)]
struct Inner {
    ledger: RwLock<Ledger>,
    sessions: DashMap<String, Session>,
    players: DashMap<String, ActivePlayer>,
}

/// In-memory database handle. Clones share state.
#[derive(Clone, Default)]
pub struct MemoryDb {
    inner: Arc<Inner>,
}

impl MemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Insert a new user. Fails with `Conflict` if the email or username is taken.
    pub async fn create_user(&self, user: &User) -> Result<(), AppError> {
        let mut ledger = self.inner.ledger.write().await;

        if ledger.emails.contains_key(&user.email) {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }
        if ledger.usernames.contains_key(&user.username) {
            return Err(AppError::Conflict("Username already taken".to_string()));
        }

        ledger.emails.insert(user.email.clone(), user.id.clone());
        ledger
            .usernames
            .insert(user.username.clone(), user.id.clone());
        ledger.users.insert(user.id.clone(), user.clone());
        Ok(())
    }

    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        Ok(self.inner.ledger.read().await.users.get(user_id).cloned())
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let ledger = self.inner.ledger.read().await;
        Ok(ledger
            .emails
            .get(email)
            .and_then(|id| ledger.users.get(id))
            .cloned())
    }

    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let ledger = self.inner.ledger.read().await;
        Ok(ledger
            .usernames
            .get(username)
            .and_then(|id| ledger.users.get(id))
            .cloned())
    }

    // ─── Session Operations ──────────────────────────────────────

    /// Store a session, replacing any session with the same digest.
    pub async fn put_session(&self, session: &Session) -> Result<(), AppError> {
        self.inner
            .sessions
            .insert(session.token_digest.clone(), session.clone());
        Ok(())
    }

    pub async fn get_session(&self, token_digest: &str) -> Result<Option<Session>, AppError> {
        Ok(self
            .inner
            .sessions
            .get(token_digest)
            .map(|s| s.value().clone()))
    }

    pub async fn delete_session(&self, token_digest: &str) -> Result<(), AppError> {
        self.inner.sessions.remove(token_digest);
        Ok(())
    }

    // ─── Leaderboard Operations ──────────────────────────────────

    /// Append an entry and raise the owner's high score in one critical section.
    ///
    /// Returns `false` without writing if the owning user does not exist.
    pub async fn submit_score(&self, entry: &LeaderboardEntry) -> Result<bool, AppError> {
        let mut ledger = self.inner.ledger.write().await;

        let Some(user) = ledger.users.get_mut(&entry.user_id) else {
            return Ok(false);
        };
        user.record_score_if_higher(entry.score);
        ledger.entries.push(entry.clone());
        Ok(true)
    }

    /// Competition rank of `score` within `mode`.
    pub async fn rank_in_mode(&self, mode: &str, score: i64) -> Result<u64, AppError> {
        let ledger = self.inner.ledger.read().await;
        Ok(competition_rank(
            score,
            ledger
                .entries
                .iter()
                .filter(|e| e.mode == mode)
                .map(|e| e.score),
        ))
    }

    /// Entries in display order, optionally restricted to one mode.
    pub async fn list_entries(
        &self,
        mode: Option<&str>,
        limit: usize,
    ) -> Result<Vec<LeaderboardEntry>, AppError> {
        let mut entries: Vec<LeaderboardEntry> = {
            let ledger = self.inner.ledger.read().await;
            ledger
                .entries
                .iter()
                .filter(|e| mode.map_or(true, |m| e.mode == m))
                .cloned()
                .collect()
        };

        sort_for_display(&mut entries);
        entries.truncate(limit);
        Ok(entries)
    }

    // ─── Active Player Operations ────────────────────────────────

    /// Replace the snapshot for this player. Last write wins.
    pub async fn upsert_player(&self, player: &ActivePlayer) -> Result<(), AppError> {
        self.inner.players.insert(player.id.clone(), player.clone());
        Ok(())
    }

    pub async fn get_player(&self, player_id: &str) -> Result<Option<ActivePlayer>, AppError> {
        Ok(self.inner.players.get(player_id).map(|p| p.value().clone()))
    }

    /// All snapshots, or only those still playing.
    pub async fn list_players(&self, playing_only: bool) -> Result<Vec<ActivePlayer>, AppError> {
        let mut players: Vec<ActivePlayer> = self
            .inner
            .players
            .iter()
            .filter(|p| !playing_only || p.is_playing)
            .map(|p| p.value().clone())
            .collect();
        // DashMap iteration order is arbitrary; keep responses stable.
        players.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(players)
    }

    /// Returns `true` if a snapshot was removed.
    pub async fn remove_player(&self, player_id: &str) -> Result<bool, AppError> {
        Ok(self.inner.players.remove(player_id).is_some())
    }
}
