// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Leaderboard engine: score submission, ranking and ranked listings.

use crate::config::Config;
use crate::db::Db;
use crate::error::{AppError, Result};
use crate::models::LeaderboardEntry;
use crate::services::ids;
use crate::time_utils::now_rfc3339;

/// What a submission may contain.
///
/// The permissive default accepts any score sign and any mode tag.
#[derive(Debug, Clone)]
pub struct ScorePolicy {
    pub allow_negative: bool,
    pub allowed_modes: Option<Vec<String>>,
}

impl Default for ScorePolicy {
    fn default() -> Self {
        Self {
            allow_negative: true,
            allowed_modes: None,
        }
    }
}

impl ScorePolicy {
    pub fn from_config(config: &Config) -> Self {
        Self {
            allow_negative: config.allow_negative_scores,
            allowed_modes: config.allowed_modes.clone(),
        }
    }

    fn check(&self, score: i64, mode: &str) -> Result<()> {
        if !self.allow_negative && score < 0 {
            return Err(AppError::InvalidArgument(
                "score must not be negative".to_string(),
            ));
        }
        if let Some(allowed) = &self.allowed_modes {
            if !allowed.iter().any(|m| m == mode) {
                return Err(AppError::InvalidArgument(format!("unknown mode '{}'", mode)));
            }
        }
        Ok(())
    }
}

/// Accepted submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub entry_id: String,
    pub rank: u64,
}

#[derive(Clone)]
pub struct LeaderboardEngine {
    db: Db,
    policy: ScorePolicy,
}

impl LeaderboardEngine {
    pub fn new(db: Db, policy: ScorePolicy) -> Self {
        Self { db, policy }
    }

    /// Append an entry and raise the user's high score as one unit.
    ///
    /// `username` is stored as given and is not refreshed later.
    pub async fn submit(
        &self,
        user_id: &str,
        username: &str,
        score: i64,
        mode: &str,
    ) -> Result<String> {
        self.policy.check(score, mode)?;

        let entry = LeaderboardEntry {
            id: ids::new_id()?,
            user_id: user_id.to_string(),
            username: username.to_string(),
            score,
            mode: mode.to_string(),
            date: now_rfc3339(),
        };

        if !self.db.submit_score(&entry).await? {
            return Err(AppError::NotFound(format!("User {} not found", user_id)));
        }

        tracing::info!(user_id, mode, score, entry_id = %entry.id, "Score recorded");
        Ok(entry.id)
    }

    /// 1 + number of entries in `mode` with a strictly greater score.
    pub async fn rank(&self, score: i64, mode: &str) -> Result<u64> {
        self.db.rank_in_mode(mode, score).await
    }

    /// Submit, then rank the submitted score.
    ///
    /// The rank is read after the append commits, so it always counts this
    /// submission's own ledger state.
    pub async fn submit_and_rank(
        &self,
        user_id: &str,
        username: &str,
        score: i64,
        mode: &str,
    ) -> Result<Submission> {
        let entry_id = self.submit(user_id, username, score, mode).await?;
        let rank = self.rank(score, mode).await?;
        tracing::debug!(user_id, mode, score, rank, "Submission ranked");
        Ok(Submission { entry_id, rank })
    }

    /// Top `limit` entries by score desc, then date desc.
    ///
    /// `limit` must be positive. `mode`, if given, must match exactly.
    pub async fn list(&self, limit: i64, mode: Option<&str>) -> Result<Vec<LeaderboardEntry>> {
        if limit <= 0 {
            return Err(AppError::InvalidArgument(
                "limit must be a positive integer".to_string(),
            ));
        }
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        self.db.list_entries(mode, limit).await
    }
}
