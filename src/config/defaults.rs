use crate::retrieval::SplitterKind;

use super::constants::*;
use super::types::{
    EmbedderKind, LlmProvider, LlmSettings, ModelSettings, RetrievalSettings, WorkflowSettings,
};

pub fn default_user_agent() -> String {
    format!("weave/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for LlmSettings {
    fn default() -> Self {
        let provider = LlmProvider::OpenAI;
        Self {
            provider,
            api_key: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            base_url: provider.default_base_url().to_string(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for ModelSettings {
    fn default() -> Self {
        Self {
            generation: DEFAULT_GENERATION_MODEL.to_string(),
            embedding: DEFAULT_EMBEDDING_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            context_tokens: DEFAULT_CONTEXT_TOKENS,
        }
    }
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            top_k: DEFAULT_TOP_K,
            splitter: SplitterKind::Recursive,
            embedder: EmbedderKind::Remote,
            embedding_batch_size: DEFAULT_EMBEDDING_BATCH_SIZE,
            corpus: Vec::new(),
        }
    }
}

impl Default for WorkflowSettings {
    fn default() -> Self {
        Self {
            organization: DEFAULT_ORGANIZATION.to_string(),
        }
    }
}
