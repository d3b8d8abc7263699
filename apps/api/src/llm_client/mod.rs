//! LLM client: the single point of entry for all model calls.
//!
//! No other module may call the Gemini API directly. Core code depends on the
//! `LanguageModel` trait; `GeminiClient` is the production implementation.
//!
//! Model: gemini-2.0-flash (hardcoded, not configurable)

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::models::chat::{ChatTurn, Speaker};

pub mod prompts;

use prompts::{fill_placeholders, GUIDE_REQUEST_TEMPLATE};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
/// The model used for all LLM calls.
pub const MODEL: &str = "gemini-2.0-flash";

const TEMPERATURE: f32 = 0.7;
const TOP_P: f32 = 0.95;
const TOP_K: u32 = 40;
const MAX_OUTPUT_TOKENS: u32 = 2048;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request timed out after {secs}s")]
    Timeout { secs: u64 },

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("response blocked by safety filter ({reason})")]
    Blocked { reason: String },

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("LLM response too short ({len} chars)")]
    ResponseTooShort { len: usize },

    #[error("LLM access is disabled")]
    Disabled,
}

/// Request/response contract the core consumes. Implementations must report
/// every failure as an `LlmError`; callers decide between fallback and error.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Single-shot interview guide generation for `role`.
    async fn generate(&self, prompt: &str, role: &str) -> Result<String, LlmError>;

    /// Answers `message` given the prior turns of a conversation.
    async fn converse(&self, history: &[ChatTurn], message: &str) -> Result<String, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_output_tokens: u32,
    candidate_count: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: TEMPERATURE,
            top_p: TOP_P,
            top_k: TOP_K,
            max_output_tokens: MAX_OUTPUT_TOKENS,
            candidate_count: 1,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate. Safety blocks and empty
    /// candidates are errors, never an empty success.
    pub fn into_text(self) -> Result<String, LlmError> {
        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(LlmError::Blocked { reason });
        }

        let candidate = self
            .candidates
            .into_iter()
            .next()
            .ok_or(LlmError::EmptyContent)?;

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return match candidate.finish_reason.as_deref() {
                Some("SAFETY") => Err(LlmError::Blocked {
                    reason: "SAFETY".to_string(),
                }),
                _ => Err(LlmError::EmptyContent),
            };
        }
        Ok(text)
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

fn wire_role(speaker: Speaker) -> &'static str {
    match speaker {
        Speaker::User => "user",
        Speaker::Assistant => "model",
    }
}

fn conversation_contents<'a>(history: &'a [ChatTurn], message: &'a str) -> Vec<Content<'a>> {
    history
        .iter()
        .map(|turn| Content {
            role: wire_role(turn.speaker),
            parts: vec![Part { text: &turn.text }],
        })
        .chain(std::iter::once(Content {
            role: "user",
            parts: vec![Part { text: message }],
        }))
        .collect()
}

/// Wraps the résumé prompt as the context of a structured guide request.
pub fn guide_request(prompt: &str, role: &str) -> String {
    fill_placeholders(GUIDE_REQUEST_TEMPLATE, &[("role", role), ("context", prompt)])
}

// ────────────────────────────────────────────────────────────────────────────
// Gemini client
// ────────────────────────────────────────────────────────────────────────────

/// Gemini `generateContent` client. One attempt per call; the caller's
/// timeout bounds it and any failure is returned as-is.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    timeout_secs: u64,
}

impl GeminiClient {
    pub fn new(api_key: String, timeout_secs: u64) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            client,
            api_key,
            timeout_secs,
        })
    }

    async fn call(&self, contents: Vec<Content<'_>>) -> Result<String, LlmError> {
        let request_body = GenerateContentRequest {
            contents,
            generation_config: GenerationConfig::default(),
        };
        let url = format!("{GEMINI_API_BASE}/{MODEL}:generateContent");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await.map_err(|e| self.classify(e))?;
        let parsed: GenerateContentResponse = serde_json::from_str(&body)?;

        if let Some(usage) = &parsed.usage_metadata {
            debug!(
                "LLM call succeeded: prompt_tokens={}, output_tokens={}",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        parsed.into_text()
    }

    fn classify(&self, e: reqwest::Error) -> LlmError {
        if e.is_timeout() {
            LlmError::Timeout {
                secs: self.timeout_secs,
            }
        } else {
            LlmError::Http(e)
        }
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    async fn generate(&self, prompt: &str, role: &str) -> Result<String, LlmError> {
        let request = guide_request(prompt, role);
        self.call(vec![Content {
            role: "user",
            parts: vec![Part { text: &request }],
        }])
        .await
    }

    async fn converse(&self, history: &[ChatTurn], message: &str) -> Result<String, LlmError> {
        self.call(conversation_contents(history, message)).await
    }
}
