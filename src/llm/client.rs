// src/llm/client.rs

//! Completion-endpoint client. `CompletionClient` is the replaceable seam;
//! `OpenAiClient` is the default implementation speaking the chat-completions
//! wire format with a schema-constrained response.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use thiserror::Error;

use crate::config::CONFIG;

/// One triage classification request: fixed system instruction, user message
/// carrying the issue, and the schema the response must conform to.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub schema: Value,
}

/// The outbound call could not complete, or the endpoint refused it.
/// Distinct from schema problems with otherwise-delivered content.
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("completion endpoint returned {status}: {body}")]
    Api { status: StatusCode, body: String },
}

/// Abstraction over "produce a raw completion response for a triage request".
/// Tests substitute their own implementation; no live call required.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<Value, CompletionError>;

    /// Client name for logging.
    fn name(&self) -> &'static str;
}

pub struct OpenAiClient {
    client: Client,
    api_key: String,
    api_base: String,
}

impl OpenAiClient {
    pub fn new() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").context("OPENAI_API_KEY not set")?;

        let client = Client::builder()
            .timeout(Duration::from_secs(CONFIG.openai_timeout))
            .build()?;

        Ok(Self {
            client,
            api_key,
            api_base: CONFIG.openai_base_url.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.api_base.trim_end_matches('/'))
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<Value, CompletionError> {
        let body = json!({
            "model": CONFIG.model,
            "messages": [
                { "role": "system", "content": request.system },
                { "role": "user", "content": request.user },
            ],
            "temperature": CONFIG.temperature,
            "max_tokens": CONFIG.max_output_tokens,
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": "triage_decision",
                    "strict": true,
                    "schema": request.schema
                }
            }
        });

        let resp = self
            .client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(CompletionError::Api { status, body });
        }

        Ok(resp.json::<Value>().await?)
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}
