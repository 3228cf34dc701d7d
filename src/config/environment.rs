use anyhow::{Context, Result, anyhow};
use std::env;
use std::str::FromStr;

use crate::retrieval::SplitterKind;

use super::builder::ConfigBuilder;
use super::types::{EmbedderKind, LlmProvider};

pub fn apply_env_overrides(mut builder: ConfigBuilder) -> Result<ConfigBuilder> {
    if let Some(provider_raw) = env_string("WEAVE_PROVIDER")? {
        let provider = provider_raw
            .parse::<LlmProvider>()
            .with_context(|| format!("Failed to parse WEAVE_PROVIDER value '{provider_raw}'"))?;
        builder = builder.with_llm(|llm| {
            if llm.provider != provider {
                llm.provider = provider;
                llm.base_url = provider.default_base_url().to_string();
            }
        });
    }

    if let Some(base_url) = env_string("WEAVE_LLM_BASE_URL")? {
        builder = builder.with_llm(|llm| llm.base_url = base_url);
    }

    for provider in [LlmProvider::OpenAI, LlmProvider::OpenRouter] {
        if let Some(api_key) = env_string(provider.api_key_env_var())? {
            builder = builder.with_llm(|llm| {
                if llm.provider == provider {
                    llm.api_key = api_key;
                }
            });
        }
    }

    if let Some(timeout) = env_parse::<u64>("WEAVE_TIMEOUT_SECS")? {
        builder = builder.with_llm(|llm| llm.timeout_secs = timeout);
    }

    if let Some(max_tokens) = env_parse::<u32>("WEAVE_MAX_TOKENS")? {
        builder = builder.with_models(|models| models.max_tokens = max_tokens);
    }

    if let Some(context_tokens) = env_parse::<u32>("WEAVE_CONTEXT_TOKENS")? {
        builder = builder.with_models(|models| models.context_tokens = context_tokens);
    }

    if let Some(model) = env_string("WEAVE_GENERATION_MODEL")? {
        builder = builder.with_models(|models| models.generation = model);
    }

    if let Some(model) = env_string("WEAVE_EMBEDDING_MODEL")? {
        builder = builder.with_models(|models| models.embedding = model);
    }

    if let Some(organization) = env_string("WEAVE_ORGANIZATION")? {
        builder = builder.with_workflow(|workflow| workflow.organization = organization);
    }

    if let Some(chunk_size) = env_parse::<usize>("WEAVE_CHUNK_SIZE")? {
        builder = builder.with_retrieval(|retrieval| retrieval.chunk_size = chunk_size);
    }

    if let Some(overlap) = env_parse::<usize>("WEAVE_CHUNK_OVERLAP")? {
        builder = builder.with_retrieval(|retrieval| retrieval.chunk_overlap = overlap);
    }

    if let Some(top_k) = env_parse::<usize>("WEAVE_TOP_K")? {
        builder = builder.with_retrieval(|retrieval| retrieval.top_k = top_k);
    }

    if let Some(splitter) = env_parse::<SplitterKind>("WEAVE_SPLITTER")? {
        builder = builder.with_retrieval(|retrieval| retrieval.splitter = splitter);
    }

    if let Some(embedder) = env_parse::<EmbedderKind>("WEAVE_EMBEDDER")? {
        builder = builder.with_retrieval(|retrieval| retrieval.embedder = embedder);
    }

    Ok(builder)
}

pub fn env_string(key: &str) -> Result<Option<String>> {
    match env::var(key) {
        Ok(val) => Ok(Some(val)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => Err(anyhow!("{key} contains invalid UTF-8")),
    }
}

pub fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env_string(key)? {
        Some(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|err| anyhow!("Failed to parse {key} value '{value}': {err}")),
        None => Ok(None),
    }
}
