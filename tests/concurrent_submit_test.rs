// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Concurrent score submissions through the HTTP layer.

mod common;
use common::{signup, submit};

const NUM_PLAYERS: usize = 4;
const SUBMISSIONS_PER_PLAYER: i64 = 10;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_submissions_keep_high_scores_and_order() {
    let (app, state) = common::create_test_app();

    let mut tokens = vec![];
    for i in 0..NUM_PLAYERS {
        tokens.push(signup(&app, &format!("p{i}"), &format!("p{i}@x.com")).await);
    }

    let mut handles = vec![];
    for (i, token) in tokens.iter().enumerate() {
        for n in 0..SUBMISSIONS_PER_PLAYER {
            let app = app.clone();
            let token = token.clone();
            let score = (i as i64) * 100 + n;
            handles.push(tokio::spawn(async move {
                let rank = submit(&app, &token, score, "walls").await;
                (score, rank)
            }));
        }
    }

    for handle in handles {
        let (score, rank) = handle.await.expect("Task join failed");
        // Later submissions can only push a score down, never up.
        let final_rank = state.leaderboard.rank(score, "walls").await.unwrap();
        assert!(rank >= 1 && rank <= final_rank);
    }

    let entries = state.leaderboard.list(i64::MAX, Some("walls")).await.unwrap();
    assert_eq!(
        entries.len(),
        NUM_PLAYERS * SUBMISSIONS_PER_PLAYER as usize
    );
    assert!(entries
        .windows(2)
        .all(|w| w[0].score > w[1].score || (w[0].score == w[1].score && w[0].date >= w[1].date)));

    for i in 0..NUM_PLAYERS {
        let user = state
            .accounts
            .find_by_username(&format!("p{i}"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            user.high_score,
            (i as i64) * 100 + SUBMISSIONS_PER_PLAYER - 1,
            "high score lost under concurrency"
        );
    }
}
