// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Active player snapshot store for watch mode.
//!
//! Snapshots are last-write-wins: concurrent publishes for one player may
//! interleave and the last one committed is what spectators see.

use crate::db::Db;
use crate::error::Result;
use crate::models::ActivePlayer;

#[derive(Clone)]
pub struct PlayerSnapshots {
    db: Db,
}

impl PlayerSnapshots {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Replace the player's snapshot wholesale.
    pub async fn upsert(&self, snapshot: &ActivePlayer) -> Result<()> {
        self.db.upsert_player(snapshot).await?;
        tracing::debug!(
            player_id = %snapshot.id,
            score = snapshot.current_score,
            playing = snapshot.is_playing,
            "Snapshot published"
        );
        Ok(())
    }

    pub async fn get(&self, player_id: &str) -> Result<Option<ActivePlayer>> {
        self.db.get_player(player_id).await
    }

    /// Snapshots whose game is still in progress.
    pub async fn list_playing(&self) -> Result<Vec<ActivePlayer>> {
        self.db.list_players(true).await
    }

    /// Returns `true` if a snapshot existed.
    pub async fn remove(&self, player_id: &str) -> Result<bool> {
        let removed = self.db.remove_player(player_id).await?;
        if removed {
            tracing::debug!(player_id, "Snapshot removed");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Direction, Position};

    fn snapshot(id: &str, score: i64, is_playing: bool) -> ActivePlayer {
        ActivePlayer {
            id: id.to_string(),
            username: format!("{id}-name"),
            current_score: score,
            mode: "passthrough".to_string(),
            snake: vec![Position { x: 10, y: 10 }, Position { x: 9, y: 10 }],
            food: Position { x: 15, y: 15 },
            direction: Direction::Right,
            is_playing,
        }
    }

    #[tokio::test]
    async fn test_upsert_replaces_wholesale() {
        let store = PlayerSnapshots::new(Db::memory());
        store.upsert(&snapshot("p1", 10, true)).await.unwrap();

        let mut next = snapshot("p1", 20, true);
        next.snake = vec![Position { x: 0, y: 0 }];
        next.direction = Direction::Down;
        store.upsert(&next).await.unwrap();

        assert_eq!(store.get("p1").await.unwrap(), Some(next));
    }

    #[tokio::test]
    async fn test_list_playing_skips_finished_games() {
        let store = PlayerSnapshots::new(Db::memory());
        store.upsert(&snapshot("p1", 10, true)).await.unwrap();
        store.upsert(&snapshot("p2", 10, true)).await.unwrap();
        store.upsert(&snapshot("p2", 30, false)).await.unwrap();

        let playing = store.list_playing().await.unwrap();
        assert_eq!(playing.len(), 1);
        assert_eq!(playing[0].id, "p1");
        // Finished games stay readable by id
        assert!(store.get("p2").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_remove_then_get() {
        let store = PlayerSnapshots::new(Db::memory());
        store.upsert(&snapshot("p1", 10, true)).await.unwrap();

        assert!(store.remove("p1").await.unwrap());
        assert_eq!(store.get("p1").await.unwrap(), None);
        assert!(!store.remove("p1").await.unwrap());
        assert!(!store.remove("nonexistent-id").await.unwrap());
    }
}
