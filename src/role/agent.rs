use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::client::{ChatCompletionRequest, ChatMessage, DynLlmClient};
use crate::config::ModelSettings;
use crate::error::{Result, WeaveError};
use crate::tokens::{completion_budget, estimate_prompt_tokens};

use super::config::{RoleConfig, RoleKind};
use super::parsing::strip_reasoning;

/// Stateless generator for one workflow role.
#[async_trait]
pub trait RoleAgent: Send + Sync {
    fn kind(&self) -> RoleKind;

    /// Produces the role's first output from grounding context and its primary input.
    async fn generate_initial(&self, context: &str, primary_input: &str) -> Result<String>;

    /// Revises `previous_output` according to `feedback`, without fresh context.
    async fn refine(&self, previous_output: &str, feedback: &str) -> Result<String>;
}

/// What a single generation call asks of the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest<'a> {
    pub organization: &'a str,
    /// Text the model builds on: retrieved context for an initial generation,
    /// the previous output for a refinement.
    pub grounding: &'a str,
    pub primary_input_or_feedback: &'a str,
    pub is_refinement: bool,
}

impl GenerationRequest<'_> {
    pub fn render(&self, config: &RoleConfig) -> Result<String> {
        if self.is_refinement {
            config.refine_template().render(&[
                ("organization", self.organization),
                ("previous_output", self.grounding),
                ("feedback", self.primary_input_or_feedback),
            ])
        } else {
            config.initial_template().render(&[
                ("organization", self.organization),
                ("context", self.grounding),
                ("input", self.primary_input_or_feedback),
            ])
        }
    }
}

/// Role agent backed by an OpenAI-compatible chat completion endpoint.
pub struct LlmRoleAgent {
    config: RoleConfig,
    client: Arc<DynLlmClient>,
    model: String,
    max_tokens: u32,
    context_tokens: u32,
}

impl LlmRoleAgent {
    pub fn new(config: RoleConfig, client: Arc<DynLlmClient>, models: &ModelSettings) -> Self {
        Self {
            config,
            client,
            model: models.generation.clone(),
            max_tokens: models.max_tokens,
            context_tokens: models.context_tokens,
        }
    }

    pub fn config(&self) -> &RoleConfig {
        &self.config
    }

    async fn complete(&self, request: GenerationRequest<'_>) -> Result<String> {
        let role = self.config.kind();
        let prompt = request.render(&self.config)?;
        let messages = vec![ChatMessage::user(prompt)];

        let max_tokens = completion_budget(self.context_tokens, self.max_tokens, &messages)
            .ok_or_else(|| {
                WeaveError::generation(format!(
                    "{} prompt needs about {} tokens, which does not fit the {}-token context window",
                    role.display_name(),
                    estimate_prompt_tokens(&messages),
                    self.context_tokens
                ))
            })?;

        debug!(
            %role,
            refinement = request.is_refinement,
            max_tokens,
            "requesting generation"
        );

        let response = self
            .client
            .chat_completion(ChatCompletionRequest {
                model: self.model.clone(),
                messages,
                max_tokens: Some(max_tokens),
                temperature: Some(0.0),
            })
            .await
            .map_err(|err| {
                WeaveError::generation(format!("{} call failed: {err:#}", role.display_name()))
            })?;

        let choice = response.choices.into_iter().next().ok_or_else(|| {
            WeaveError::generation(format!("{} returned no choices", role.display_name()))
        })?;

        let content = strip_reasoning(&choice.message.content);
        if content.is_empty() {
            return Err(WeaveError::generation(format!(
                "{} returned an empty response",
                role.display_name()
            )));
        }

        info!(
            %role,
            refinement = request.is_refinement,
            chars = content.len(),
            finish_reason = choice.finish_reason.as_deref().unwrap_or("unknown"),
            "generation finished"
        );
        Ok(content)
    }
}

#[async_trait]
impl RoleAgent for LlmRoleAgent {
    fn kind(&self) -> RoleKind {
        self.config.kind()
    }

    async fn generate_initial(&self, context: &str, primary_input: &str) -> Result<String> {
        self.complete(GenerationRequest {
            organization: self.config.organization(),
            grounding: context,
            primary_input_or_feedback: primary_input,
            is_refinement: false,
        })
        .await
    }

    async fn refine(&self, previous_output: &str, feedback: &str) -> Result<String> {
        self.complete(GenerationRequest {
            organization: self.config.organization(),
            grounding: previous_output,
            primary_input_or_feedback: feedback,
            is_refinement: true,
        })
        .await
    }
}
