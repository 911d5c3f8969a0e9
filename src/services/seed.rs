// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Demo data for local development.

use crate::error::{AppError, Result};
use crate::models::{ActivePlayer, Direction, Position};
use crate::AppState;

const DEMO_SECRET: &str = "password";

const DEMO_USERS: [(&str, &str); 3] = [
    ("alice", "alice@example.com"),
    ("bob", "bob@example.com"),
    ("charlie", "charlie@example.com"),
];

const DEMO_SCORES: [(&str, i64, &str); 5] = [
    ("alice", 850, "walls"),
    ("bob", 650, "walls"),
    ("charlie", 420, "passthrough"),
    ("alice", 920, "passthrough"),
    ("bob", 580, "passthrough"),
];

const DIRECTIONS: [Direction; 4] = [
    Direction::Up,
    Direction::Down,
    Direction::Left,
    Direction::Right,
];

/// Create demo users, scores and playing snapshots.
///
/// Users that already exist are reused; their scores are still appended.
pub async fn seed_demo_data(state: &AppState) -> Result<()> {
    let mut users = Vec::with_capacity(DEMO_USERS.len());
    for (username, email) in DEMO_USERS {
        let user = match state
            .accounts
            .create_user(username, email, DEMO_SECRET)
            .await
        {
            Ok(user) => user,
            Err(AppError::Conflict(_)) => state
                .accounts
                .find_by_username(username)
                .await?
                .ok_or_else(|| AppError::Conflict(format!("Email {} taken", email)))?,
            Err(e) => return Err(e),
        };
        users.push(user);
    }

    for (username, score, mode) in DEMO_SCORES {
        if let Some(user) = users.iter().find(|u| u.username == username) {
            state
                .leaderboard
                .submit(&user.id, &user.username, score, mode)
                .await?;
        }
    }

    for (i, user) in users.iter().enumerate() {
        let offset = i as i32;
        let snapshot = ActivePlayer {
            id: user.id.clone(),
            username: user.username.clone(),
            current_score: 150 + (offset as i64) * 50,
            mode: if i % 2 == 0 { "walls" } else { "passthrough" }.to_string(),
            snake: vec![
                Position { x: 10 + offset, y: 10 },
                Position { x: 9 + offset, y: 10 },
                Position { x: 8 + offset, y: 10 },
            ],
            food: Position {
                x: 15 + offset,
                y: 15 + offset,
            },
            direction: DIRECTIONS[i % DIRECTIONS.len()],
            is_playing: true,
        };
        state.players.upsert(&snapshot).await?;
    }

    tracing::info!(users = users.len(), "Demo data seeded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::db::Db;

    #[tokio::test]
    async fn test_seed_populates_every_store() {
        let state = AppState::new(Config::test_default(), Db::memory());
        seed_demo_data(&state).await.unwrap();

        let walls = state.leaderboard.list(10, Some("walls")).await.unwrap();
        assert_eq!(walls[0].username, "alice");
        assert_eq!(walls[0].score, 850);
        assert_eq!(state.players.list_playing().await.unwrap().len(), 3);

        let alice = state.accounts.find_by_username("alice").await.unwrap().unwrap();
        assert_eq!(alice.high_score, 920);
    }

    #[tokio::test]
    async fn test_seed_twice_reuses_users() {
        let state = AppState::new(Config::test_default(), Db::memory());
        seed_demo_data(&state).await.unwrap();
        seed_demo_data(&state).await.unwrap();

        assert_eq!(state.players.list_playing().await.unwrap().len(), 3);
        assert_eq!(state.leaderboard.list(100, None).await.unwrap().len(), 10);
    }
}
