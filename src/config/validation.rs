use anyhow::{Result, anyhow};

use crate::retrieval::ChunkParams;

use super::types::Config;

pub fn validate(config: &Config) -> Result<()> {
    if config.llm.api_key.trim().is_empty() {
        let provider = config.llm.provider;
        return Err(anyhow!(
            "{} API key not found. Set {} or add it to {}",
            provider.display_name(),
            provider.api_key_env_var(),
            Config::config_path()?.display()
        ));
    }

    validate_retrieval(config)
}

/// Checks the settings the index build depends on, independently of credentials.
pub fn validate_retrieval(config: &Config) -> Result<()> {
    let retrieval = &config.retrieval;
    ChunkParams::new(retrieval.chunk_size, retrieval.chunk_overlap)?;

    if retrieval.top_k == 0 {
        return Err(anyhow!("top_k must be greater than zero"));
    }
    if retrieval.embedding_batch_size == 0 {
        return Err(anyhow!("embedding_batch_size must be greater than zero"));
    }
    if config.workflow.organization.trim().is_empty() {
        return Err(anyhow!("organization name cannot be empty"));
    }

    Ok(())
}
