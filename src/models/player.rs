// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Active player snapshots for watch mode.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "frontend/src/lib/generated/")
)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

/// Direction the snake head is facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "frontend/src/lib/generated/")
)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Last published game state for one player.
///
/// Replaced wholesale on every publish; there is no history or versioning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "frontend/src/lib/generated/")
)]
pub struct ActivePlayer {
    /// Player ID (the publishing user's ID)
    pub id: String,
    pub username: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub current_score: i64,
    pub mode: String,
    /// Body segments, head first
    pub snake: Vec<Position>,
    pub food: Position,
    pub direction: Direction,
    pub is_playing: bool,
}

/// Flattened storage form of [`ActivePlayer`].
///
/// The body is kept as a compact JSON string since it is not tabular.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivePlayerDoc {
    pub id: String,
    pub username: String,
    pub current_score: i64,
    pub mode: String,
    pub snake_json: String,
    pub food_x: i32,
    pub food_y: i32,
    pub direction: Direction,
    pub is_playing: bool,
    pub updated_at: String,
}

impl ActivePlayerDoc {
    pub fn from_player(player: &ActivePlayer, updated_at: String) -> serde_json::Result<Self> {
        Ok(Self {
            id: player.id.clone(),
            username: player.username.clone(),
            current_score: player.current_score,
            mode: player.mode.clone(),
            snake_json: serde_json::to_string(&player.snake)?,
            food_x: player.food.x,
            food_y: player.food.y,
            direction: player.direction,
            is_playing: player.is_playing,
            updated_at,
        })
    }

    pub fn into_player(self) -> serde_json::Result<ActivePlayer> {
        Ok(ActivePlayer {
            snake: serde_json::from_str(&self.snake_json)?,
            id: self.id,
            username: self.username,
            current_score: self.current_score,
            mode: self.mode,
            food: Position {
                x: self.food_x,
                y: self.food_y,
            },
            direction: self.direction,
            is_playing: self.is_playing,
        })
    }
}
