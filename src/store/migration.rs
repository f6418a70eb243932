// src/store/migration.rs
//! Startup migrations for the triage store. Safe to run at every boot
//! (idempotent).

use anyhow::Result;
use sqlx::{Executor, SqlitePool};

/// One row per triaged issue. The UNIQUE constraint on issue_url is what
/// guarantees a single record per issue, even under concurrent inserts.
const CREATE_TRIAGES: &str = r#"
CREATE TABLE IF NOT EXISTS triages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    issue_url TEXT NOT NULL UNIQUE,
    title TEXT NOT NULL,
    body TEXT NOT NULL,
    severity TEXT NOT NULL,
    category TEXT NOT NULL,
    priority TEXT NOT NULL,
    labels TEXT NOT NULL,
    reasoning TEXT NOT NULL,
    confidence REAL NOT NULL,
    created_at DATETIME NOT NULL
);
"#;

const CREATE_TRIAGE_INDICES: &str = r#"
CREATE INDEX IF NOT EXISTS idx_triages_created_at ON triages(created_at);
"#;

pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    pool.execute(CREATE_TRIAGES).await?;
    pool.execute(CREATE_TRIAGE_INDICES).await?;

    Ok(())
}
