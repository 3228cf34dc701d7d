use anyhow::{Context, Result};
use dirs::home_dir;
use std::{fs, path::Path};

use super::Config;
use super::builder::ConfigBuilder;
use super::environment::apply_env_overrides;
use super::types::{EmbedderKind, FileConfig, LlmProvider, PersistedConfig};
use super::validation::{validate, validate_retrieval};
use crate::retrieval::SplitterKind;

impl Config {
    pub fn config_path() -> Result<std::path::PathBuf> {
        let mut path = home_dir().context("Could not determine home directory")?;
        path.push(".weave/config");
        Ok(path)
    }

    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Loads defaults, the config file and environment overrides, then validates.
    pub fn load() -> Result<Self> {
        let config = Self::load_unvalidated()?;
        validate(&config)?;
        Ok(config)
    }

    /// Same layering as [`Config::load`] without requiring credentials.
    pub fn load_unvalidated() -> Result<Self> {
        let path = Self::config_path()?;
        let mut builder = ConfigBuilder::new();

        if path.exists() {
            builder = Self::apply_file(builder, &path)?;
        }

        builder = apply_env_overrides(builder)?;
        builder.build()
    }

    pub fn save(&self) -> Result<()> {
        validate_retrieval(self)?;

        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Unable to create config directory {}", parent.display())
            })?;
        }

        let payload = PersistedConfig::from(self);
        let json = serde_json::to_string_pretty(&payload)
            .context("Failed to serialize configuration to JSON")?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        validate(self)
    }

    fn apply_file(builder: ConfigBuilder, path: &Path) -> Result<ConfigBuilder> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed reading config at {}", path.display()))?;

        if contents.trim().is_empty() {
            return Ok(builder);
        }

        let raw: FileConfig = serde_json::from_str(&contents)
            .with_context(|| format!("Failed parsing JSON config at {}", path.display()))?;

        raw.apply(builder)
            .with_context(|| format!("Invalid settings in config at {}", path.display()))
    }
}

impl FileConfig {
    pub fn apply(self, mut builder: ConfigBuilder) -> Result<ConfigBuilder> {
        if let Some(llm_file) = self.llm {
            let provider = llm_file
                .provider
                .as_deref()
                .map(str::parse::<LlmProvider>)
                .transpose()?;

            builder = builder.with_llm(|llm| {
                if let Some(parsed) = provider {
                    if llm.provider != parsed {
                        llm.provider = parsed;
                        llm.base_url = parsed.default_base_url().to_string();
                    }
                }
                if let Some(api_key) = llm_file.api_key {
                    llm.api_key = api_key;
                }
                if let Some(timeout) = llm_file.timeout_secs {
                    llm.timeout_secs = timeout;
                }
                if let Some(base_url) = llm_file.base_url {
                    llm.base_url = base_url;
                }
                if let Some(user_agent) = llm_file.user_agent {
                    llm.user_agent = user_agent;
                }
            });
        }

        if let Some(models_file) = self.models {
            builder = builder.with_models(|models| {
                if let Some(generation) = models_file.generation {
                    models.generation = generation;
                }
                if let Some(embedding) = models_file.embedding {
                    models.embedding = embedding;
                }
                if let Some(max_tokens) = models_file.max_tokens {
                    models.max_tokens = max_tokens;
                }
                if let Some(context_tokens) = models_file.context_tokens {
                    models.context_tokens = context_tokens;
                }
            });
        }

        if let Some(retrieval_file) = self.retrieval {
            let splitter = retrieval_file
                .splitter
                .as_deref()
                .map(str::parse::<SplitterKind>)
                .transpose()?;
            let embedder = retrieval_file
                .embedder
                .as_deref()
                .map(str::parse::<EmbedderKind>)
                .transpose()?;

            builder = builder.with_retrieval(|retrieval| {
                if let Some(chunk_size) = retrieval_file.chunk_size {
                    retrieval.chunk_size = chunk_size;
                }
                if let Some(overlap) = retrieval_file.chunk_overlap {
                    retrieval.chunk_overlap = overlap;
                }
                if let Some(top_k) = retrieval_file.top_k {
                    retrieval.top_k = top_k;
                }
                if let Some(splitter) = splitter {
                    retrieval.splitter = splitter;
                }
                if let Some(embedder) = embedder {
                    retrieval.embedder = embedder;
                }
                if let Some(batch) = retrieval_file.embedding_batch_size {
                    retrieval.embedding_batch_size = batch;
                }
                if let Some(corpus) = retrieval_file.corpus {
                    retrieval.corpus = corpus;
                }
            });
        }

        if let Some(workflow_file) = self.workflow {
            builder = builder.with_workflow(|workflow| {
                if let Some(organization) = workflow_file.organization {
                    workflow.organization = organization;
                }
            });
        }

        Ok(builder)
    }
}
