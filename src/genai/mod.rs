pub mod dto;

use std::env;
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use thiserror::Error;

use crate::error::AppError;

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

pub const SYSTEM_INSTRUCTION: &str = "You are an assistant for a teacher. Your goal is to provide helpful, concise, and classroom-appropriate content. This could include lesson plan ideas, summaries of topics, quiz questions, or positive feedback for students.";
pub const TEMPERATURE: f32 = 0.7;
pub const TOP_P: f32 = 0.9;

pub const NOT_CONFIGURED_MESSAGE: &str =
    "AI service is not configured. Please set the API_KEY environment variable.";
pub const EMPTY_RESPONSE_MESSAGE: &str = "No content generated. The response was empty.";
pub const UNKNOWN_ERROR_MESSAGE: &str =
    "An unknown error occurred while contacting the AI service.";

#[derive(Clone, Debug)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// `None` when neither `GEMINI_API_KEY` nor `API_KEY` holds a non-blank value.
    pub fn new_from_env() -> Option<Self> {
        let api_key = env::var("GEMINI_API_KEY")
            .or_else(|_| env::var("API_KEY"))
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())?;

        let mut config = Self::new(api_key);
        if let Ok(model) = env::var("GEMINI_MODEL") {
            config.model = model;
        }
        if let Ok(base) = env::var("GEMINI_API_BASE") {
            config.api_base = base.trim_end_matches('/').to_string();
        }
        Some(config)
    }
}

/// Turns a prompt into display text. Implementations never fail: every
/// failure mode resolves to an explanatory string.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> String;
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("{message}")]
    Service { status: StatusCode, message: String },

    #[error("{0}")]
    Decode(String),
}

pub struct GeminiHttpClient {
    client: Client,
    config: GeminiConfig,
}

impl GeminiHttpClient {
    pub fn new(config: GeminiConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build http client: {}", e)))?;
        Ok(Self { client, config })
    }

    async fn generate_content(&self, prompt: &str) -> Result<String, GenerationError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.config.api_base, self.config.model
        );

        let request_body = dto::GenerateContentRequest {
            system_instruction: dto::Content::text(None, SYSTEM_INSTRUCTION),
            contents: vec![dto::Content::text(Some("user"), prompt)],
            generation_config: dto::GenerationConfig {
                temperature: TEMPERATURE,
                top_p: TOP_P,
            },
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<dto::ErrorResponse>(&body)
                .ok()
                .map(|e| e.error.message)
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| format!("{} {}", status, body).trim().to_string());
            return Err(GenerationError::Service { status, message });
        }

        let parsed: dto::GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| GenerationError::Decode(format!("Failed to parse response: {}", e)))?;

        Ok(parsed.text())
    }
}

#[async_trait]
impl TextGenerator for GeminiHttpClient {
    async fn generate(&self, prompt: &str) -> String {
        match self.generate_content(prompt).await {
            Ok(text) if !text.is_empty() => text,
            Ok(_) => {
                tracing::warn!("Gemini returned an empty response");
                EMPTY_RESPONSE_MESSAGE.to_string()
            }
            Err(e) => {
                tracing::error!("Error generating text with Gemini API: {}", e);
                describe_failure(&e.to_string())
            }
        }
    }
}

/// Stands in for the real client when no credential is configured.
pub struct UnconfiguredGenerator;

#[async_trait]
impl TextGenerator for UnconfiguredGenerator {
    async fn generate(&self, _prompt: &str) -> String {
        NOT_CONFIGURED_MESSAGE.to_string()
    }
}

pub fn describe_failure(message: &str) -> String {
    if message.trim().is_empty() {
        UNKNOWN_ERROR_MESSAGE.to_string()
    } else {
        format!(
            "An error occurred while contacting the AI service: {}",
            message
        )
    }
}

pub fn build_generator(config: Option<GeminiConfig>) -> Result<Arc<dyn TextGenerator>, AppError> {
    match config {
        Some(config) => {
            tracing::info!("AI assistant enabled (model: {})", config.model);
            Ok(Arc::new(GeminiHttpClient::new(config)?))
        }
        None => {
            tracing::warn!("API_KEY environment variable not set. AI features will not work.");
            Ok(Arc::new(UnconfiguredGenerator))
        }
    }
}
