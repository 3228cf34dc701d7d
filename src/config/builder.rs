use anyhow::Result;

use super::types::{Config, LlmSettings, ModelSettings, RetrievalSettings, WorkflowSettings};

#[derive(Debug)]
pub struct ConfigBuilder {
    pub(super) llm: LlmSettings,
    pub(super) models: ModelSettings,
    pub(super) retrieval: RetrievalSettings,
    pub(super) workflow: WorkflowSettings,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            llm: LlmSettings::default(),
            models: ModelSettings::default(),
            retrieval: RetrievalSettings::default(),
            workflow: WorkflowSettings::default(),
        }
    }

    pub fn from_config(config: Config) -> Self {
        Self {
            llm: config.llm,
            models: config.models,
            retrieval: config.retrieval,
            workflow: config.workflow,
        }
    }

    pub fn with_llm<F>(mut self, update: F) -> Self
    where
        F: FnOnce(&mut LlmSettings),
    {
        update(&mut self.llm);
        self
    }

    pub fn with_models<F>(mut self, update: F) -> Self
    where
        F: FnOnce(&mut ModelSettings),
    {
        update(&mut self.models);
        self
    }

    pub fn with_retrieval<F>(mut self, update: F) -> Self
    where
        F: FnOnce(&mut RetrievalSettings),
    {
        update(&mut self.retrieval);
        self
    }

    pub fn with_workflow<F>(mut self, update: F) -> Self
    where
        F: FnOnce(&mut WorkflowSettings),
    {
        update(&mut self.workflow);
        self
    }

    pub fn build(self) -> Result<Config> {
        Ok(Config {
            llm: self.llm,
            models: self.models,
            retrieval: self.retrieval,
            workflow: self.workflow,
        })
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
