// SPDX-License-Identifier: MIT
// Copyright 2026 LifeHub contributors

//! LifeHub API Server

use lifehub::{
    config::Config,
    db::Database,
    services::{GeminiClient, MealLogService, NutritionAnalyzer},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting LifeHub API");

    // Open the database and create missing tables
    let db = Database::connect(&config.database_url).await?;

    let seeded = db.seed_exercises().await?;
    tracing::info!(seeded, "Exercise catalog ready");

    let gemini = GeminiClient::new(config.gemini_api_key.clone(), config.gemini_model.clone());
    let analyzer = NutritionAnalyzer::new(Arc::new(gemini), config.ai_timeout);
    tracing::info!(model = %config.gemini_model, "Meal analyzer initialized");

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        meal_logs: MealLogService::new(db.clone()),
        db,
        analyzer,
    });

    // Build router
    let app = lifehub::routes::create_router(state);

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

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lifehub=debug,info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(format)
        .init();
}
