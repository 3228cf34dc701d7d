use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use super::commands;

/// Entry point for the `weave` command-line interface.
#[derive(Debug, Parser)]
#[command(
    name = "weave",
    about = "Turn feature requests into user stories and test plans",
    version,
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Product documentation to ground generation in (repeatable)
    #[arg(short = 'c', long = "corpus", value_name = "FILE")]
    pub corpus: Vec<PathBuf>,

    /// Organization named in the role prompts
    #[arg(short = 'o', long = "organization")]
    pub organization: Option<String>,

    /// Embed the corpus locally instead of calling the embeddings endpoint
    #[arg(long = "offline")]
    pub offline: bool,

    /// Number of corpus chunks retrieved per feature request
    #[arg(short = 'k', long = "top-k")]
    pub top_k: Option<usize>,

    /// Enable debug logging on stderr
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the effective configuration, or update and save it.
    Config(ConfigArgs),
}

#[derive(Debug, Default, Args)]
pub struct ConfigArgs {
    /// LLM provider (openai or openrouter)
    #[arg(long)]
    pub provider: Option<String>,

    /// Set the API key
    #[arg(long)]
    pub api_key: Option<String>,

    /// Set timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Set the generation model
    #[arg(long)]
    pub model: Option<String>,

    /// Set the embedding model
    #[arg(long)]
    pub embedding_model: Option<String>,

    /// Set the completion max tokens
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Set the organization named in prompts
    #[arg(long)]
    pub organization: Option<String>,
}

impl ConfigArgs {
    pub(crate) fn has_updates(&self) -> bool {
        self.provider.is_some()
            || self.api_key.is_some()
            || self.timeout.is_some()
            || self.model.is_some()
            || self.embedding_model.is_some()
            || self.max_tokens.is_some()
            || self.organization.is_some()
    }
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        commands::run(self).await
    }
}
