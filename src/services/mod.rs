// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod accounts;
pub mod ids;
pub mod leaderboard;
pub mod players;
pub mod seed;
pub mod sessions;

pub use accounts::{AccountService, LoginOutcome};
pub use leaderboard::{LeaderboardEngine, ScorePolicy, Submission};
pub use players::PlayerSnapshots;
pub use sessions::SessionRegistry;
