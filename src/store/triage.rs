// src/store/triage.rs

//! Persistence for triage records. One record per issue identity, enforced by
//! the UNIQUE constraint inside the insert itself rather than by a
//! check-then-insert at the application layer.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use sqlx::{Row, SqlitePool, sqlite::SqliteRow};
use thiserror::Error;

use crate::llm::schema::TriageDecision;
use crate::llm::taxonomy::{Category, Priority, Severity};

#[derive(Debug, Error)]
pub enum StoreError {
    /// The insert collided with an existing record (issue identity or a
    /// caller-supplied id). The existing record is untouched.
    #[error("triage record already exists: {0}")]
    AlreadyExists(String),
    #[error("stored triage record could not be decoded: {0}")]
    Decode(String),
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

/// Fields for a record about to be inserted. `id` and `created_at` are
/// normally left unset and assigned by the store.
#[derive(Debug, Clone)]
pub struct NewTriage {
    pub id: Option<i64>,
    pub issue_url: String,
    pub title: String,
    pub body: String,
    pub decision: TriageDecision,
    pub created_at: Option<DateTime<Utc>>,
}

impl NewTriage {
    pub fn new(
        issue_url: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
        decision: TriageDecision,
    ) -> Self {
        Self {
            id: None,
            issue_url: issue_url.into(),
            title: title.into(),
            body: body.into(),
            decision,
            created_at: None,
        }
    }
}

/// A persisted triage record, id and timestamp assigned.
#[derive(Debug, Clone, serde::Serialize, PartialEq)]
pub struct TriageRecord {
    pub id: i64,
    pub issue_url: String,
    pub title: String,
    pub body: String,
    pub severity: Severity,
    pub category: Category,
    pub priority: Priority,
    pub labels: Vec<String>,
    pub reasoning: String,
    pub confidence: f64,
    pub created_at: DateTime<Utc>,
}

pub struct TriageStore {
    pool: SqlitePool,
}

impl TriageStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a triage record. Duplicate issue_url, or a supplied id that is
    /// already taken, fails with `AlreadyExists` and leaves the store
    /// unchanged. Records are never updated or deleted.
    pub async fn save(&self, new: &NewTriage) -> Result<TriageRecord, StoreError> {
        let created_at = new.created_at.unwrap_or_else(Utc::now);
        let labels_json =
            serde_json::to_string(&new.decision.labels).unwrap_or_else(|_| "[]".to_string());

        let row = sqlx::query(
            r#"
            INSERT INTO triages (
                id, issue_url, title, body,
                severity, category, priority, labels, reasoning, confidence,
                created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(new.id)
        .bind(&new.issue_url)
        .bind(&new.title)
        .bind(&new.body)
        .bind(new.decision.severity.as_str())
        .bind(new.decision.category.as_str())
        .bind(new.decision.priority.as_str())
        .bind(labels_json)
        .bind(&new.decision.reasoning)
        .bind(new.decision.confidence)
        .bind(created_at.naive_utc())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                StoreError::AlreadyExists(db.message().to_string())
            }
            _ => StoreError::Database(e),
        })?;

        let id: i64 = row.get("id");

        Ok(TriageRecord {
            id,
            issue_url: new.issue_url.clone(),
            title: new.title.clone(),
            body: new.body.clone(),
            severity: new.decision.severity,
            category: new.decision.category,
            priority: new.decision.priority,
            labels: new.decision.labels.clone(),
            reasoning: new.decision.reasoning.clone(),
            confidence: new.decision.confidence,
            created_at,
        })
    }

    /// Look up the record for an issue identity, if one was ever saved.
    pub async fn find_by_issue(&self, issue_url: &str) -> Result<Option<TriageRecord>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT id, issue_url, title, body,
                   severity, category, priority, labels, reasoning, confidence,
                   created_at
            FROM triages
            WHERE issue_url = ?
            "#,
        )
        .bind(issue_url)
        .fetch_optional(&self.pool)
        .await?;

        row.map(record_from_row).transpose()
    }

    /// Cheap liveness probe for the status endpoint.
    pub async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }
}

fn record_from_row(row: SqliteRow) -> Result<TriageRecord, StoreError> {
    let severity: String = row.get("severity");
    let category: String = row.get("category");
    let priority: String = row.get("priority");
    let labels: String = row.get("labels");
    let created_at: NaiveDateTime = row.get("created_at");

    Ok(TriageRecord {
        id: row.get("id"),
        issue_url: row.get("issue_url"),
        title: row.get("title"),
        body: row.get("body"),
        severity: severity
            .parse()
            .map_err(|_| StoreError::Decode(format!("severity '{severity}'")))?,
        category: category
            .parse()
            .map_err(|_| StoreError::Decode(format!("category '{category}'")))?,
        priority: priority
            .parse()
            .map_err(|_| StoreError::Decode(format!("priority '{priority}'")))?,
        labels: serde_json::from_str(&labels)
            .map_err(|e| StoreError::Decode(format!("labels: {e}")))?,
        reasoning: row.get("reasoning"),
        confidence: row.get("confidence"),
        created_at: Utc.from_utc_datetime(&created_at),
    })
}
