//! Commentary augmentation client
//!
//! Asks an external language model for short qualitative notes on a verse.
//! The endpoint speaks the OpenAI-compatible chat completions protocol
//! (Groq by default). Commentary is strictly optional: the analysis cache
//! runs it off the scoring path, under a timeout, and drops any failure.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use versus_common::config::AugmentationConfig;

use crate::types::CompositeScore;

const USER_AGENT: &str = concat!("versus-engine/", env!("CARGO_PKG_VERSION"));

/// Environment variables checked for an API key, in priority order
pub const API_KEY_ENV_VARS: &[&str] = &["VERSUS_LLM_API_KEY", "GROQ_API_KEY"];

/// Commentary client errors
#[derive(Debug, Error)]
pub enum CommentaryError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request timeout")]
    Timeout,
}

impl From<CommentaryError> for versus_common::Error {
    fn from(err: CommentaryError) -> Self {
        versus_common::Error::Augmentation(err.to_string())
    }
}

/// Source of free-form commentary on a scored verse
#[async_trait]
pub trait CommentaryProvider: Send + Sync {
    /// Provider name for logging
    fn name(&self) -> &str;

    async fn commentary(
        &self,
        verse: &str,
        score: &CompositeScore,
    ) -> Result<String, CommentaryError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

/// OpenAI-compatible chat completions client
pub struct OpenAiCompatClient {
    http_client: reqwest::Client,
    base_url: String,
    model: String,
    api_key: String,
    max_tokens: u32,
}

impl OpenAiCompatClient {
    pub fn new(config: &AugmentationConfig, api_key: String) -> Result<Self, CommentaryError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            // The cache applies its own, tighter budget; this only bounds stray sockets
            .timeout(Duration::from_millis(config.timeout_ms.saturating_mul(2)))
            .build()
            .map_err(|e| CommentaryError::Connection(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
            max_tokens: config.max_tokens,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_prompt(verse: &str, score: &CompositeScore) -> Vec<ChatMessage> {
        vec![
            ChatMessage {
                role: "system".to_string(),
                content: "You are a battle rap judge. Reply with two or three short sentences \
                          of concrete feedback on the verse. Do not restate the numbers."
                    .to_string(),
            },
            ChatMessage {
                role: "user".to_string(),
                content: format!(
                    "Verse:\n{}\n\nScores: overall {}, rhyme {}, flow {}, creativity {}.",
                    verse,
                    score.overall,
                    score.rhyme.density_score,
                    score.flow.score,
                    score.creativity.score
                ),
            },
        ]
    }
}

#[async_trait]
impl CommentaryProvider for OpenAiCompatClient {
    fn name(&self) -> &str {
        "openai-compatible"
    }

    async fn commentary(
        &self,
        verse: &str,
        score: &CompositeScore,
    ) -> Result<String, CommentaryError> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest {
            model: &self.model,
            messages: Self::build_prompt(verse, score),
            max_tokens: self.max_tokens,
            temperature: 0.7,
        };

        debug!(model = %self.model, url = %url, "Requesting verse commentary");

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CommentaryError::Timeout
                } else {
                    CommentaryError::Connection(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CommentaryError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| CommentaryError::InvalidResponse(e.to_string()))?;

        extract_content(body)
    }
}

fn extract_content(body: ChatResponse) -> Result<String, CommentaryError> {
    body.choices
        .into_iter()
        .next()
        .map(|choice| choice.message.content.trim().to_string())
        .filter(|content| !content.is_empty())
        .ok_or_else(|| CommentaryError::InvalidResponse("response has no content".to_string()))
}

/// Resolve the augmentation API key
///
/// **Priority:** `VERSUS_LLM_API_KEY` → `GROQ_API_KEY` → TOML `augmentation.api_key`
pub fn resolve_api_key(config: &AugmentationConfig) -> Option<String> {
    let env_keys: Vec<(&str, String)> = API_KEY_ENV_VARS
        .iter()
        .filter_map(|name| {
            std::env::var(name)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(|v| (*name, v))
        })
        .collect();
    let toml_key = config.api_key.clone().filter(|k| !k.trim().is_empty());

    let source_count = env_keys.len() + usize::from(toml_key.is_some());
    if source_count > 1 {
        tracing::warn!(
            "Augmentation API key found in {} sources, using highest priority",
            source_count
        );
    }

    if let Some((name, key)) = env_keys.into_iter().next() {
        tracing::info!("Augmentation API key loaded from {}", name);
        return Some(key);
    }
    if toml_key.is_some() {
        tracing::info!("Augmentation API key loaded from TOML config");
    }
    toml_key
}
