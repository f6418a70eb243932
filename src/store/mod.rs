// src/store/mod.rs

pub mod migration;
pub mod triage;

pub use migration::run_migrations;
pub use triage::{NewTriage, StoreError, TriageRecord, TriageStore};
