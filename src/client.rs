use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{LlmProvider, LlmSettings};

/// OpenAI-compatible endpoints used by the generation and embedding collaborators.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse>;

    async fn embeddings(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse>;
}

pub type DynLlmClient = dyn LlmClient;

#[derive(Debug, Clone)]
pub struct AIClient {
    http: Client,
    base_url: String,
    api_key: String,
    user_agent: String,
    provider: LlmProvider,
}

impl AIClient {
    pub fn new(settings: &LlmSettings) -> Result<Self> {
        let timeout = Duration::from_secs(settings.timeout_secs);
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            user_agent: settings.user_agent.clone(),
            provider: settings.provider,
        })
    }

    async fn post<T: Serialize + ?Sized>(&self, path: &str, body: &T) -> Result<Response> {
        let url = format!("{}/{}", self.base_url, path);

        let mut req_builder = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .header("User-Agent", &self.user_agent)
            .header("Content-Type", "application/json")
            .json(body);

        // OpenRouter attributes traffic to the calling app through this header
        if matches!(self.provider, LlmProvider::OpenRouter) {
            req_builder = req_builder.header("X-Title", "weave");
        }

        let response = req_builder
            .send()
            .await
            .with_context(|| format!("Failed to send request to {path} endpoint"))?;

        check_status(response).await
    }
}

async fn check_status(response: Response) -> Result<Response> {
    match response.status() {
        reqwest::StatusCode::OK => Ok(response),
        reqwest::StatusCode::TOO_MANY_REQUESTS => {
            let error_text = response.text().await.unwrap_or_default();
            let error_msg = if error_text.contains("quota") {
                "Quota exceeded for the configured API key."
            } else {
                "Too many requests. Please wait before trying again."
            };
            Err(anyhow!("{} (API response: {})", error_msg, error_text))
        }
        reqwest::StatusCode::UNAUTHORIZED => Err(anyhow!(
            "Invalid API key. Please check your API key configuration."
        )),
        reqwest::StatusCode::BAD_REQUEST => {
            let error_text = response.text().await.unwrap_or_default();
            Err(anyhow!("Invalid request: {}", error_text))
        }
        reqwest::StatusCode::INTERNAL_SERVER_ERROR | reqwest::StatusCode::SERVICE_UNAVAILABLE => {
            Err(anyhow!(
                "Service is temporarily unavailable. Please try again later."
            ))
        }
        status => {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            Err(anyhow!("API error (status {}): {}", status, error_text))
        }
    }
}

#[async_trait]
impl LlmClient for AIClient {
    async fn chat_completion(
        &self,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse> {
        debug!(
            model = %request.model,
            messages = request.messages.len(),
            max_tokens = ?request.max_tokens,
            "sending chat completion request"
        );

        self.post("chat/completions", &request)
            .await?
            .json::<ChatCompletionResponse>()
            .await
            .context("Failed to parse chat completion response JSON")
    }

    async fn embeddings(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse> {
        debug!(
            model = %request.model,
            inputs = request.input.len(),
            "sending embeddings request"
        );

        self.post("embeddings", &request)
            .await?
            .json::<EmbeddingResponse>()
            .await
            .context("Failed to parse embeddings response JSON")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatMessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatMessageRole::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatMessageRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    pub message: ChatMessage,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmbeddingRequest {
    pub model: String,
    pub input: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingResponse {
    pub data: Vec<EmbeddingData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmbeddingData {
    pub index: usize,
    pub embedding: Vec<f32>,
}

#[cfg(test)]
mod tests;
