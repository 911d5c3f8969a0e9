// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Watch-mode routes: read other players' snapshots, publish your own.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{ActivePlayer, Direction, Position};
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, put},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

/// Public spectator routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/players/active", get(list_active_players))
        .route("/players/{player_id}", get(get_player))
}

/// Publisher routes (auth middleware applied in routes/mod.rs).
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new().route(
        "/players/me",
        put(publish_snapshot).delete(remove_snapshot),
    )
}

/// Snapshots of games in progress.
async fn list_active_players(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<ActivePlayer>>> {
    Ok(Json(state.players.list_playing().await?))
}

/// One player's latest snapshot, playing or not.
async fn get_player(
    State(state): State<Arc<AppState>>,
    Path(player_id): Path<String>,
) -> Result<Json<ActivePlayer>> {
    let player = state
        .players
        .get(&player_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Player not found".to_string()))?;
    Ok(Json(player))
}

/// Game state published by the player's own client.
#[derive(Deserialize, Validate)]
pub struct PublishSnapshotRequest {
    current_score: i64,
    mode: String,
    #[validate(length(min = 1))]
    snake: Vec<Position>,
    food: Position,
    direction: Direction,
    #[serde(default = "default_playing")]
    is_playing: bool,
}

fn default_playing() -> bool {
    true
}

/// Replace the caller's snapshot.
async fn publish_snapshot(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
    Json(request): Json<PublishSnapshotRequest>,
) -> Result<Json<ActivePlayer>> {
    request
        .validate()
        .map_err(|e| AppError::InvalidArgument(e.to_string()))?;

    let snapshot = ActivePlayer {
        id: auth.user.id,
        username: auth.user.username,
        current_score: request.current_score,
        mode: request.mode,
        snake: request.snake,
        food: request.food,
        direction: request.direction,
        is_playing: request.is_playing,
    };
    state.players.upsert(&snapshot).await?;

    Ok(Json(snapshot))
}

#[derive(Serialize)]
pub struct RemoveSnapshotResponse {
    pub removed: bool,
}

/// Drop the caller's snapshot when their game ends.
async fn remove_snapshot(
    State(state): State<Arc<AppState>>,
    Extension(auth): Extension<AuthUser>,
) -> Result<Json<RemoveSnapshotResponse>> {
    let removed = state.players.remove(&auth.user.id).await?;
    Ok(Json(RemoveSnapshotResponse { removed }))
}
