use anyhow::anyhow;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::retrieval::SplitterKind;

use super::constants::{DEFAULT_OPENAI_BASE_URL, DEFAULT_OPENROUTER_BASE_URL};

#[derive(Debug, Clone)]
pub struct Config {
    pub llm: LlmSettings,
    pub models: ModelSettings,
    pub retrieval: RetrievalSettings,
    pub workflow: WorkflowSettings,
}

#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub provider: LlmProvider,
    pub api_key: String,
    pub timeout_secs: u64,
    pub base_url: String,
    pub user_agent: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    OpenAI,
    OpenRouter,
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmProvider::OpenAI => write!(f, "openai"),
            LlmProvider::OpenRouter => write!(f, "openrouter"),
        }
    }
}

impl std::str::FromStr for LlmProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "openai" => Ok(LlmProvider::OpenAI),
            "openrouter" => Ok(LlmProvider::OpenRouter),
            other => Err(anyhow!("Unknown LLM provider '{other}'")),
        }
    }
}

impl LlmProvider {
    pub fn default_base_url(self) -> &'static str {
        match self {
            LlmProvider::OpenAI => DEFAULT_OPENAI_BASE_URL,
            LlmProvider::OpenRouter => DEFAULT_OPENROUTER_BASE_URL,
        }
    }

    pub fn api_key_env_var(self) -> &'static str {
        match self {
            LlmProvider::OpenAI => "OPENAI_API_KEY",
            LlmProvider::OpenRouter => "OPENROUTER_API_KEY",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            LlmProvider::OpenAI => "OpenAI",
            LlmProvider::OpenRouter => "OpenRouter",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ModelSettings {
    pub generation: String,
    pub embedding: String,
    /// Completion token ceiling per generation call.
    pub max_tokens: u32,
    /// Context window of the generation model, prompt and completion combined.
    pub context_tokens: u32,
}

/// Which embedding function backs the context index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbedderKind {
    Remote,
    Hashing,
}

impl fmt::Display for EmbedderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmbedderKind::Remote => write!(f, "remote"),
            EmbedderKind::Hashing => write!(f, "hashing"),
        }
    }
}

impl std::str::FromStr for EmbedderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "remote" => Ok(EmbedderKind::Remote),
            "hashing" => Ok(EmbedderKind::Hashing),
            other => Err(anyhow!("Unknown embedder '{other}'")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RetrievalSettings {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub top_k: usize,
    pub splitter: SplitterKind,
    pub embedder: EmbedderKind,
    pub embedding_batch_size: usize,
    pub corpus: Vec<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct WorkflowSettings {
    pub organization: String,
}

// File configuration types
#[derive(Debug, Default, Deserialize)]
pub(super) struct FileConfig {
    #[serde(default)]
    pub llm: Option<FileLlmSettings>,
    #[serde(default)]
    pub models: Option<FileModelSettings>,
    #[serde(default)]
    pub retrieval: Option<FileRetrievalSettings>,
    #[serde(default)]
    pub workflow: Option<FileWorkflowSettings>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct FileLlmSettings {
    pub provider: Option<String>,
    pub api_key: Option<String>,
    pub timeout_secs: Option<u64>,
    pub base_url: Option<String>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct FileModelSettings {
    pub generation: Option<String>,
    pub embedding: Option<String>,
    pub max_tokens: Option<u32>,
    pub context_tokens: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct FileRetrievalSettings {
    pub chunk_size: Option<usize>,
    pub chunk_overlap: Option<usize>,
    pub top_k: Option<usize>,
    pub splitter: Option<String>,
    pub embedder: Option<String>,
    pub embedding_batch_size: Option<usize>,
    pub corpus: Option<Vec<PathBuf>>,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct FileWorkflowSettings {
    pub organization: Option<String>,
}

// Serialization helpers
#[derive(Serialize)]
pub(super) struct PersistedConfig<'a> {
    pub llm: PersistedLlm<'a>,
    pub models: PersistedModels<'a>,
    pub retrieval: PersistedRetrieval<'a>,
    pub workflow: PersistedWorkflow<'a>,
}

#[derive(Serialize)]
pub(super) struct PersistedLlm<'a> {
    pub provider: LlmProvider,
    pub api_key: &'a str,
    pub timeout_secs: u64,
    pub base_url: &'a str,
    pub user_agent: &'a str,
}

#[derive(Serialize)]
pub(super) struct PersistedModels<'a> {
    pub generation: &'a str,
    pub embedding: &'a str,
    pub max_tokens: u32,
    pub context_tokens: u32,
}

#[derive(Serialize)]
pub(super) struct PersistedRetrieval<'a> {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub top_k: usize,
    pub splitter: String,
    pub embedder: EmbedderKind,
    pub embedding_batch_size: usize,
    pub corpus: &'a [PathBuf],
}

#[derive(Serialize)]
pub(super) struct PersistedWorkflow<'a> {
    pub organization: &'a str,
}

impl<'a> From<&'a Config> for PersistedConfig<'a> {
    fn from(config: &'a Config) -> Self {
        PersistedConfig {
            llm: PersistedLlm {
                provider: config.llm.provider,
                api_key: &config.llm.api_key,
                timeout_secs: config.llm.timeout_secs,
                base_url: &config.llm.base_url,
                user_agent: &config.llm.user_agent,
            },
            models: PersistedModels {
                generation: &config.models.generation,
                embedding: &config.models.embedding,
                max_tokens: config.models.max_tokens,
                context_tokens: config.models.context_tokens,
            },
            retrieval: PersistedRetrieval {
                chunk_size: config.retrieval.chunk_size,
                chunk_overlap: config.retrieval.chunk_overlap,
                top_k: config.retrieval.top_k,
                splitter: config.retrieval.splitter.to_string(),
                embedder: config.retrieval.embedder,
                embedding_batch_size: config.retrieval.embedding_batch_size,
                corpus: &config.retrieval.corpus,
            },
            workflow: PersistedWorkflow {
                organization: &config.workflow.organization,
            },
        }
    }
}
