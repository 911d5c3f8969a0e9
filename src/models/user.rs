//! User account model for storage and API.

use serde::{Deserialize, Serialize};

/// User account stored in the `users` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Opaque user ID (also used as document ID)
    pub id: String,
    /// Unique display name (exact match, no normalization)
    pub username: String,
    /// Unique email address (exact match, no normalization)
    pub email: String,
    /// Credential secret as supplied at signup
    pub secret: String,
    /// Best score ever submitted, never below 0
    pub high_score: i64,
    /// When the account was created (RFC3339)
    pub created_at: String,
}

impl User {
    /// Raise the cached high score if `score` beats it.
    ///
    /// Returns `true` if the record changed. Callers must apply this in the
    /// same critical section as the leaderboard append it belongs to.
    pub fn record_score_if_higher(&mut self, score: i64) -> bool {
        if score > self.high_score {
            self.high_score = score;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: "u1".to_string(),
            username: "alice".to_string(),
            email: "a@x.com".to_string(),
            secret: "pw".to_string(),
            high_score: 0,
            created_at: "2024-01-01T00:00:00.000000000Z".to_string(),
        }
    }

    #[test]
    fn test_high_score_only_rises() {
        let mut u = user();
        assert!(u.record_score_if_higher(850));
        assert!(!u.record_score_if_higher(850));
        assert!(!u.record_score_if_higher(10));
        assert_eq!(u.high_score, 850);
    }

    #[test]
    fn test_negative_score_never_lowers_initial_zero() {
        let mut u = user();
        assert!(!u.record_score_if_higher(-40));
        assert_eq!(u.high_score, 0);
    }
}
