// src/server/mod.rs

//! HTTP transport for the triage pipeline:
//! - POST /api/triage  - classify an issue and persist the decision
//! - GET  /api/triage  - look up a stored decision by issue_url
//! - GET  /api/status  - health check

mod error;
mod handlers;

pub use error::ApiError;
pub use handlers::{TriageQuery, TriageRequest};

use std::sync::Arc;

use axum::{
    Router,
    http::HeaderValue,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::CONFIG;
use crate::llm::Classifier;
use crate::store::TriageStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<TriageStore>,
    pub classifier: Arc<Classifier>,
}

impl AppState {
    pub fn new(store: Arc<TriageStore>, classifier: Arc<Classifier>) -> Self {
        Self { store, classifier }
    }
}

pub fn router(state: AppState) -> Router {
    let cors = match CONFIG.cors_origin.parse::<HeaderValue>() {
        Ok(origin) if CONFIG.cors_origin != "*" => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(Any)
            .allow_headers(Any),
        _ => CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    };

    Router::new()
        .route("/api/status", get(handlers::status_handler))
        .route(
            "/api/triage",
            post(handlers::triage_handler).get(handlers::get_triage_handler),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
