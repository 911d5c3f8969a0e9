//! Database layer (in-memory or Firestore).

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryDb;

use crate::error::AppError;
use crate::models::{ActivePlayer, LeaderboardEntry, Session, User};

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    /// Username claims (keyed by digest of the username)
    pub const USERNAMES: &str = "usernames";
    /// Email claims (keyed by digest of the email)
    pub const EMAILS: &str = "emails";
    pub const SESSIONS: &str = "sessions";
    pub const LEADERBOARD_ENTRIES: &str = "leaderboard_entries";
    pub const ACTIVE_PLAYERS: &str = "active_players";
}

/// Storage handle shared by all services. Cloning is cheap.
#[derive(Clone)]
pub enum Db {
    Memory(MemoryDb),
    Firestore(FirestoreDb),
}

macro_rules! dispatch {
    ($self:ident.$method:ident($($arg:expr),*)) => {
        match $self {
            Db::Memory(db) => db.$method($($arg),*).await,
            Db::Firestore(db) => db.$method($($arg),*).await,
        }
    };
}

impl Db {
    /// Fresh, empty in-memory store.
    pub fn memory() -> Self {
        Db::Memory(MemoryDb::new())
    }

    pub fn backend_name(&self) -> &'static str {
        match self {
            Db::Memory(_) => "memory",
            Db::Firestore(_) => "firestore",
        }
    }

    // ─── Users ───────────────────────────────────────────────────

    pub async fn create_user(&self, user: &User) -> Result<(), AppError> {
        dispatch!(self.create_user(user))
    }

    pub async fn get_user(&self, user_id: &str) -> Result<Option<User>, AppError> {
        dispatch!(self.get_user(user_id))
    }

    pub async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        dispatch!(self.find_user_by_email(email))
    }

    pub async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        dispatch!(self.find_user_by_username(username))
    }

    // ─── Sessions ────────────────────────────────────────────────

    pub async fn put_session(&self, session: &Session) -> Result<(), AppError> {
        dispatch!(self.put_session(session))
    }

    pub async fn get_session(&self, token_digest: &str) -> Result<Option<Session>, AppError> {
        dispatch!(self.get_session(token_digest))
    }

    pub async fn delete_session(&self, token_digest: &str) -> Result<(), AppError> {
        dispatch!(self.delete_session(token_digest))
    }

    // ─── Leaderboard ─────────────────────────────────────────────

    /// Append `entry` and raise its owner's high score atomically.
    /// Returns `false` if the owner does not exist.
    pub async fn submit_score(&self, entry: &LeaderboardEntry) -> Result<bool, AppError> {
        dispatch!(self.submit_score(entry))
    }

    pub async fn rank_in_mode(&self, mode: &str, score: i64) -> Result<u64, AppError> {
        dispatch!(self.rank_in_mode(mode, score))
    }

    pub async fn list_entries(
        &self,
        mode: Option<&str>,
        limit: usize,
    ) -> Result<Vec<LeaderboardEntry>, AppError> {
        dispatch!(self.list_entries(mode, limit))
    }

    // ─── Active players ──────────────────────────────────────────

    pub async fn upsert_player(&self, player: &ActivePlayer) -> Result<(), AppError> {
        dispatch!(self.upsert_player(player))
    }

    pub async fn get_player(&self, player_id: &str) -> Result<Option<ActivePlayer>, AppError> {
        dispatch!(self.get_player(player_id))
    }

    pub async fn list_players(&self, playing_only: bool) -> Result<Vec<ActivePlayer>, AppError> {
        dispatch!(self.list_players(playing_only))
    }

    pub async fn remove_player(&self, player_id: &str) -> Result<bool, AppError> {
        dispatch!(self.remove_player(player_id))
    }
}
