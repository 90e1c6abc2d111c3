// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Morning Glory API Server
//!
//! Records one wake-up photo check-in per day and tracks streaks for users
//! who sign in with Google.

use morning_glory::{config::Config, db::Database, services::GoogleOAuthClient, AppState};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        production = config.production,
        local_utc_offset = %config.local_utc_offset,
        "Starting Morning Glory API"
    );

    if config.google_client_id.is_none() || config.google_client_secret.is_none() {
        tracing::warn!("Google OAuth credentials are not set; sign-in will fail");
    }

    let db = Database::connect(&config.database_url).await?;

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        google: GoogleOAuthClient::new(),
    });

    // Build router
    let app = morning_glory::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("morning_glory=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
