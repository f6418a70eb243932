// src/server/handlers.rs

//! HTTP handlers: thin transport over the classify-then-persist pipeline.

use axum::{
    extract::{Query, State},
    response::Json,
};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use super::AppState;
use super::error::ApiError;
use crate::config::CONFIG;
use crate::llm::IssueInput;
use crate::store::{NewTriage, TriageRecord};

#[derive(Debug, Deserialize)]
pub struct TriageRequest {
    pub issue_url: String,
    #[serde(flatten)]
    pub issue: IssueInput,
}

#[derive(Debug, Deserialize)]
pub struct TriageQuery {
    pub issue_url: String,
}

/// Classify an issue and persist the decision. One record per issue_url;
/// a repeat submission gets 409 and the original record stays as it was.
pub async fn triage_handler(
    State(state): State<AppState>,
    Json(req): Json<TriageRequest>,
) -> Result<Json<TriageRecord>, ApiError> {
    if req.issue_url.trim().is_empty() {
        return Err(ApiError::unprocessable_entity("issue_url must not be empty"));
    }

    let decision = state.classifier.classify(&req.issue).await?;

    let record = state
        .store
        .save(&NewTriage::new(
            &req.issue_url,
            &req.issue.title,
            &req.issue.body,
            decision,
        ))
        .await?;

    info!(
        issue_url = %record.issue_url,
        severity = %record.severity,
        priority = %record.priority,
        "issue triaged"
    );

    Ok(Json(record))
}

/// Fetch the stored decision for an issue.
pub async fn get_triage_handler(
    State(state): State<AppState>,
    Query(query): Query<TriageQuery>,
) -> Result<Json<TriageRecord>, ApiError> {
    let record = state
        .store
        .find_by_issue(&query.issue_url)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("no triage record for {}", query.issue_url)))?;

    Ok(Json(record))
}

/// Health check and status endpoint
pub async fn status_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "model": CONFIG.model,
        "database": state.store.ping().await.is_ok(),
    }))
}
