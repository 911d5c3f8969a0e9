// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod leaderboard;
pub mod player;
pub mod session;
pub mod user;

pub use leaderboard::LeaderboardEntry;
pub use player::{ActivePlayer, ActivePlayerDoc, Direction, Position};
pub use session::Session;
pub use user::User;
