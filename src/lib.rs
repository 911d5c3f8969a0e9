// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Snake Duel: accounts, leaderboard and watch-mode backend
//!
//! This crate provides the backend API for the Snake Duel arcade game:
//! session tokens, user accounts, a ranked score ledger and live
//! spectator snapshots. Game simulation happens elsewhere.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::Db;
use services::{AccountService, LeaderboardEngine, PlayerSnapshots, ScorePolicy, SessionRegistry};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Db,
    pub sessions: SessionRegistry,
    pub accounts: AccountService,
    pub leaderboard: LeaderboardEngine,
    pub players: PlayerSnapshots,
}

impl AppState {
    /// Wire every service to one storage handle.
    pub fn new(config: Config, db: Db) -> Self {
        let sessions = SessionRegistry::new(db.clone(), config.session_ttl_hours);
        let accounts = AccountService::new(db.clone(), sessions.clone());
        let leaderboard = LeaderboardEngine::new(db.clone(), ScorePolicy::from_config(&config));
        let players = PlayerSnapshots::new(db.clone());

        Self {
            config,
            db,
            sessions,
            accounts,
            leaderboard,
            players,
        }
    }
}
