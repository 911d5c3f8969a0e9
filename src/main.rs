// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Snake Duel API Server
//!
//! Serves accounts, the score leaderboard and watch-mode snapshots for
//! the Snake Duel arcade game.

use snake_duel::{
    config::{Config, StorageBackend},
    db::{Db, FirestoreDb},
    services::seed::seed_demo_data,
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting Snake Duel API");

    // Initialize storage
    let db = match config.storage_backend {
        StorageBackend::Memory => Db::memory(),
        StorageBackend::Firestore => Db::Firestore(FirestoreDb::new(&config.gcp_project_id).await?),
    };
    tracing::info!(backend = db.backend_name(), "Storage initialized");

    // Build shared state
    let state = Arc::new(AppState::new(config.clone(), db));

    if config.seed_demo_data {
        seed_demo_data(&state).await?;
    }

    // Build router
    let app = snake_duel::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("snake_duel=debug,info"));

    tracing_subscriber::registry().with(filter).with(format).init();
}
