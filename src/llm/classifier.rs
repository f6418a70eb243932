// src/llm/classifier.rs

//! Turns a validated issue into a validated triage decision with exactly one
//! outbound completion call. No retries, no caching, no shared state between
//! concurrent classifications.

use std::sync::Arc;

use anyhow::Result;
use thiserror::Error;
use tracing::{debug, warn};

use super::client::{CompletionClient, CompletionError, CompletionRequest, OpenAiClient};
use super::prompt::{triage_system_prompt, user_message};
use super::schema::{IssueInput, TriageDecision, decision_schema};

#[derive(Debug, Error)]
pub enum ClassifyError {
    /// The outbound call failed; connectivity or endpoint problem.
    #[error(transparent)]
    Completion(#[from] CompletionError),
    /// The endpoint answered, but the content does not satisfy the triage
    /// decision schema. The raw content is kept for inspection.
    #[error("completion content failed triage schema: {reason}")]
    ResponseSchema { reason: String, raw: String },
}

pub struct Classifier {
    client: Arc<dyn CompletionClient>,
}

impl Classifier {
    /// Classifier backed by the default completion client.
    pub fn new() -> Result<Self> {
        Ok(Self {
            client: Arc::new(OpenAiClient::new()?),
        })
    }

    /// Classifier backed by an injected client, for exercising the pipeline
    /// without a live endpoint.
    pub fn with_client(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    pub async fn classify(&self, issue: &IssueInput) -> Result<TriageDecision, ClassifyError> {
        let request = CompletionRequest {
            system: triage_system_prompt(),
            user: user_message(issue),
            schema: decision_schema(),
        };

        debug!(client = self.client.name(), title = %issue.title, "classifying issue");
        let response = self.client.complete(&request).await?;

        // First choice's message content, as a JSON string.
        let content = response["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| ClassifyError::ResponseSchema {
                reason: "no message content in first choice".to_string(),
                raw: response.to_string(),
            })?;

        TriageDecision::from_json(content).map_err(|e| {
            warn!(raw = content, "completion content failed triage schema: {e}");
            ClassifyError::ResponseSchema {
                reason: e.to_string(),
                raw: content.to_string(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::taxonomy::{Category, Priority, Severity};
    use async_trait::async_trait;
    use serde_json::{Value, json};

    /// Canned-response client standing in for the live endpoint.
    struct MockClient {
        content: String,
    }

    #[async_trait]
    impl CompletionClient for MockClient {
        async fn complete(&self, _request: &CompletionRequest) -> Result<Value, CompletionError> {
            Ok(json!({
                "id": "test-id",
                "object": "chat.completion",
                "model": "gpt-4o-mini",
                "choices": [{
                    "index": 0,
                    "message": { "role": "assistant", "content": self.content },
                    "finish_reason": "stop"
                }]
            }))
        }

        fn name(&self) -> &'static str {
            "mock"
        }
    }

    struct DownClient;

    #[async_trait]
    impl CompletionClient for DownClient {
        async fn complete(&self, _request: &CompletionRequest) -> Result<Value, CompletionError> {
            Err(CompletionError::Api {
                status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                body: "overloaded".to_string(),
            })
        }

        fn name(&self) -> &'static str {
            "down"
        }
    }

    fn issue() -> IssueInput {
        IssueInput::new("Test Title", "Test Body").unwrap()
    }

    #[tokio::test]
    async fn test_classify_returns_decision_from_mock_response() {
        let classifier = Classifier::with_client(Arc::new(MockClient {
            content: r#"{"severity": "low", "category": "feature", "priority": "P0", "labels": ["test", "test2"], "reasoning": "Test reasoning", "confidence": 0.95}"#.to_string(),
        }));

        let decision = classifier.classify(&issue()).await.unwrap();

        let expected = TriageDecision::new(
            Severity::Low,
            Category::Feature,
            Priority::P0,
            vec!["test".to_string(), "test2".to_string()],
            "Test reasoning".to_string(),
            0.95,
        )
        .unwrap();
        assert_eq!(decision, expected);
    }

    #[tokio::test]
    async fn test_classify_rejects_non_json_content() {
        let classifier = Classifier::with_client(Arc::new(MockClient {
            content: "the issue looks pretty bad to me".to_string(),
        }));

        let err = classifier.classify(&issue()).await.unwrap_err();
        assert!(matches!(err, ClassifyError::ResponseSchema { .. }));
    }

    #[tokio::test]
    async fn test_classify_rejects_schema_violating_content() {
        // Valid JSON, invalid decision: confidence out of range.
        let classifier = Classifier::with_client(Arc::new(MockClient {
            content: r#"{"severity": "low", "category": "bug", "priority": "P1", "labels": [], "reasoning": "r", "confidence": 2.0}"#.to_string(),
        }));

        let err = classifier.classify(&issue()).await.unwrap_err();
        match err {
            ClassifyError::ResponseSchema { reason, raw } => {
                assert!(reason.contains("confidence"), "{reason}");
                assert!(raw.contains("2.0"));
            }
            other => panic!("expected ResponseSchema, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_classify_propagates_endpoint_failure() {
        let classifier = Classifier::with_client(Arc::new(DownClient));

        let err = classifier.classify(&issue()).await.unwrap_err();
        assert!(matches!(
            err,
            ClassifyError::Completion(CompletionError::Api { .. })
        ));
    }
}
