// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Leaderboard routes.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::models::LeaderboardEntry;
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Public leaderboard routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/leaderboard", get(list_leaderboard))
}

/// Score submission (auth middleware applied in routes/mod.rs).
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new().route("/leaderboard/score", post(submit_score))
}

#[derive(Deserialize)]
struct LeaderboardQuery {
    /// Number of entries to return (must be positive)
    #[serde(default = "default_limit")]
    limit: i64,
    /// Restrict to one game mode
    mode: Option<String>,
}

fn default_limit() -> i64 {
    10
}

/// List top scores, optionally for one mode.
async fn list_leaderboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LeaderboardQuery>,
) -> Result<Json<Vec<LeaderboardEntry>>> {
    // `?mode=` with no value means no filter.
    let mode = params.mode.as_deref().filter(|m| !m.is_empty());
    let entries = state.leaderboard.list(params.limit, mode).await?;
    Ok(Json(entries))
}

#[derive(Deserialize)]
pub struct ScoreSubmissionRequest {
    score: i64,
    mode: String,
}

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "frontend/src/lib/generated/")
)]
pub struct ScoreSubmissionResult {
    pub success: bool,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub rank: u64,
}

/// Record a score for the authenticated user and report its rank.
async fn submit_score(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(request): Json<ScoreSubmissionRequest>,
) -> Result<Json<ScoreSubmissionResult>> {
    let submission = state
        .leaderboard
        .submit_and_rank(
            &auth.user.id,
            &auth.user.username,
            request.score,
            &request.mode,
        )
        .await?;

    Ok(Json(ScoreSubmissionResult {
        success: true,
        rank: submission.rank,
    }))
}
