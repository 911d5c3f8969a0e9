// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Leaderboard ledger entries and the ordering rules shared by every backend.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Immutable score record in the `leaderboard_entries` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "frontend/src/lib/generated/")
)]
pub struct LeaderboardEntry {
    /// Entry ID (also used as document ID)
    pub id: String,
    /// Submitting user
    pub user_id: String,
    /// Username captured at submission time; not refreshed on rename
    pub username: String,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub score: i64,
    /// Free-form game variant tag ("walls", "passthrough", ...)
    pub mode: String,
    /// Submission time (fixed-width RFC3339)
    pub date: String,
}

/// Display order: score descending, then most recent first.
pub fn display_order(a: &LeaderboardEntry, b: &LeaderboardEntry) -> Ordering {
    b.score.cmp(&a.score).then_with(|| b.date.cmp(&a.date))
}

/// Sort a ledger slice (given in insertion order) for display.
///
/// Entries with identical score and date end up newest-inserted first, so the
/// order is deterministic for a given ledger.
pub fn sort_for_display(entries: &mut [LeaderboardEntry]) {
    entries.reverse();
    entries.sort_by(display_order);
}

/// Competition rank of `score`: 1 + number of strictly greater scores.
///
/// Ties share a rank, so [200, 150, 150, 50] rank as [1, 2, 2, 4].
pub fn competition_rank<I>(score: i64, scores: I) -> u64
where
    I: IntoIterator<Item = i64>,
{
    1 + scores.into_iter().filter(|s| *s > score).count() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, score: i64, date: &str) -> LeaderboardEntry {
        LeaderboardEntry {
            id: id.to_string(),
            user_id: format!("user-{id}"),
            username: id.to_string(),
            score,
            mode: "classic".to_string(),
            date: date.to_string(),
        }
    }

    #[test]
    fn test_competition_rank_ties_share_rank() {
        let scores = [200, 150, 150, 50];
        let ranks: Vec<u64> = scores
            .iter()
            .map(|s| competition_rank(*s, scores))
            .collect();
        assert_eq!(ranks, vec![1, 2, 2, 4]);
    }

    #[test]
    fn test_rank_of_new_high_score_is_one() {
        assert_eq!(competition_rank(1000, [200, 150, 999]), 1);
        assert_eq!(competition_rank(0, std::iter::empty()), 1);
    }

    #[test]
    fn test_sort_score_then_recency() {
        let mut entries = vec![
            entry("old500", 500, "2024-01-01T00:00:00.000000000Z"),
            entry("low", 100, "2024-01-03T00:00:00.000000000Z"),
            entry("new500", 500, "2024-01-02T00:00:00.000000000Z"),
            entry("top", 900, "2023-12-31T00:00:00.000000000Z"),
        ];
        sort_for_display(&mut entries);

        let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["top", "new500", "old500", "low"]);
    }

    #[test]
    fn test_identical_score_and_date_newest_inserted_first() {
        let same = "2024-01-01T00:00:00.000000000Z";
        let mut entries = vec![entry("first", 10, same), entry("second", 10, same)];
        sort_for_display(&mut entries);
        assert_eq!(entries[0].id, "second");
        assert_eq!(entries[1].id, "first");
    }
}
