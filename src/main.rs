// src/main.rs

use std::sync::Arc;

use sqlx::sqlite::SqlitePoolOptions;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use triage::config::CONFIG;
use triage::llm::Classifier;
use triage::server::{self, AppState};
use triage::store::{TriageStore, run_migrations};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let level = CONFIG.log_level.parse::<Level>().unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting triage service");
    info!("Model: {}", CONFIG.model);
    info!("Database: {}", CONFIG.database_url);

    let pool = SqlitePoolOptions::new()
        .max_connections(CONFIG.sqlite_max_connections)
        .connect(&CONFIG.database_url)
        .await?;

    run_migrations(&pool).await?;

    let store = Arc::new(TriageStore::new(pool));
    let classifier = Arc::new(Classifier::new()?);

    let app = server::router(AppState::new(store, classifier));

    let bind_address = CONFIG.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("Triage API listening on http://{}", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
