// src/lib.rs

pub mod config;
pub mod llm;
pub mod server;
pub mod store;

pub use config::CONFIG;
pub use llm::{Classifier, ClassifyError, IssueInput, TriageDecision};
pub use store::{NewTriage, StoreError, TriageRecord, TriageStore};
