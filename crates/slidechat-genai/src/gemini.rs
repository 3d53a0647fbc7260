//! Client for the Generative Language REST API.
//!
//! # Model selection
//!
//! Hosted model identifiers come and go, and an API key may not have access
//! to every model. The client is configured with an ordered preference list
//! and uses the first model that initializes. A model counts as initialized
//! when `GET /models/{id}` answers with a success status, meaning the model
//! exists and the key may use it. The choice is made on first use and
//! cached for the life of the client.
//!
//! # Requests
//!
//! Generation is a single-turn `POST /models/{id}:generateContent` with the
//! whole instruction payload as one user part. The reply text is the
//! concatenation of the text parts of the first candidate.
//!
//! The key travels in the `x-goog-api-key` header, never in the URL, so it
//! does not end up in logs.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::client::TextGenerator;
use crate::error::GenaiError;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Tried in order; the first that initializes is used.
pub const DEFAULT_MODELS: &[&str] = &["gemini-2.5-flash", "gemini-2.0-flash", "gemini-1.5-flash"];

const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub models: Vec<String>,
    pub base_url: String,
    pub request_timeout: Duration,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            models: DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(60),
        }
    }
}

pub struct GeminiClient {
    http: reqwest::Client,
    config: GeminiConfig,
    selected: OnceCell<String>,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Result<Self, GenaiError> {
        if config.api_key.trim().is_empty() {
            return Err(GenaiError::Config("API key is empty".to_string()));
        }
        if config.models.is_empty() {
            return Err(GenaiError::Config("no candidate models configured".to_string()));
        }

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| GenaiError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            config,
            selected: OnceCell::new(),
        })
    }

    /// The model in use, selecting it on first call.
    pub async fn model(&self) -> Result<&str, GenaiError> {
        self.selected
            .get_or_try_init(|| self.select_model())
            .await
            .map(String::as_str)
    }

    async fn select_model(&self) -> Result<String, GenaiError> {
        for model in &self.config.models {
            let url = format!("{}/models/{model}", self.config.base_url);
            let outcome = self
                .http
                .get(&url)
                .header(API_KEY_HEADER, &self.config.api_key)
                .send()
                .await;

            match outcome {
                Ok(resp) if resp.status().is_success() => {
                    info!(model = %model, "selected generation model");
                    return Ok(model.clone());
                }
                Ok(resp) => {
                    warn!(model = %model, status = %resp.status(), "model candidate rejected");
                }
                Err(e) => {
                    warn!(model = %model, error = %e, "model candidate unreachable");
                }
            }
        }

        Err(GenaiError::Generation(format!(
            "none of the configured models initialized: {}",
            self.config.models.join(", ")
        )))
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenaiError> {
        let model = self.model().await?;
        let url = format!("{}/models/{model}:generateContent", self.config.base_url);

        let resp = self
            .http
            .post(&url)
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(&GenerateContentRequest::single_turn(prompt))
            .send()
            .await
            .map_err(|e| GenaiError::Generation(format!("request failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GenaiError::Generation(format!(
                "generateContent returned {status}: {body}"
            )));
        }

        let body: GenerateContentResponse = resp
            .json()
            .await
            .map_err(|e| GenaiError::Generation(format!("unreadable response body: {e}")))?;

        let text = body.text().ok_or_else(|| {
            GenaiError::Generation(format!(
                "response had no text (block reason: {})",
                body.block_reason().unwrap_or("none")
            ))
        })?;

        debug!(model, text_len = text.len(), "generateContent complete");
        Ok(text)
    }
}

// ── Wire types ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
}

impl GenerateContentRequest {
    pub fn single_turn(prompt: &str) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    #[serde(default)]
    pub block_reason: Option<String>,
}

impl GenerateContentResponse {
    /// Joined text parts of the first candidate, or `None` if it has none.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text = content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect::<Vec<_>>()
            .join("");
        if text.is_empty() { None } else { Some(text) }
    }

    pub fn block_reason(&self) -> Option<&str> {
        self.prompt_feedback.as_ref()?.block_reason.as_deref()
    }
}
