use anyhow::Result;

use crate::config::{Config, ConfigBuilder, LlmProvider};

use super::args::ConfigArgs;
use super::util::mask_api_key;

pub(crate) fn handle_config(args: &ConfigArgs) -> Result<()> {
    let existing = Config::load_unvalidated()?;

    if !args.has_updates() {
        println!("📋 Current configuration ({}):", Config::config_path()?.display());
        print_config(&existing);
        return Ok(());
    }

    let updated = apply_config_args(existing, args)?;
    updated.save()?;

    println!(
        "✅ Configuration saved to {}",
        Config::config_path()?.display()
    );
    println!("📋 Current configuration:");
    print_config(&updated);

    Ok(())
}

pub(crate) fn apply_config_args(config: Config, args: &ConfigArgs) -> Result<Config> {
    let provider = args
        .provider
        .as_deref()
        .map(str::parse::<LlmProvider>)
        .transpose()?;

    ConfigBuilder::from_config(config)
        .with_llm(|llm| {
            if let Some(parsed) = provider {
                if llm.provider != parsed {
                    llm.provider = parsed;
                    llm.base_url = parsed.default_base_url().to_string();
                }
            }
            if let Some(api_key) = &args.api_key {
                llm.api_key = api_key.clone();
            }
            if let Some(timeout) = args.timeout {
                llm.timeout_secs = timeout;
            }
        })
        .with_models(|models| {
            if let Some(model) = &args.model {
                models.generation = model.clone();
            }
            if let Some(embedding) = &args.embedding_model {
                models.embedding = embedding.clone();
            }
            if let Some(max_tokens) = args.max_tokens {
                models.max_tokens = max_tokens;
            }
        })
        .with_workflow(|workflow| {
            if let Some(organization) = &args.organization {
                workflow.organization = organization.clone();
            }
        })
        .build()
}

fn print_config(config: &Config) {
    println!("   Provider: {}", config.llm.provider.display_name());
    println!("   Base URL: {}", config.llm.base_url);
    println!("   API Key: {}", mask_api_key(&config.llm.api_key));
    println!("   Timeout: {}s", config.llm.timeout_secs);
    println!("   Generation Model: {}", config.models.generation);
    println!("   Embedding Model: {}", config.models.embedding);
    println!("   Max Tokens: {}", config.models.max_tokens);
    println!("   Context Window: {} tokens", config.models.context_tokens);
    println!("   Organization: {}", config.workflow.organization);
    println!(
        "   Chunking: {} chars, {} overlap ({} splitter)",
        config.retrieval.chunk_size, config.retrieval.chunk_overlap, config.retrieval.splitter
    );
    println!("   Top K: {}", config.retrieval.top_k);
    println!("   Embedder: {}", config.retrieval.embedder);
    if !config.retrieval.corpus.is_empty() {
        let corpus: Vec<String> = config
            .retrieval
            .corpus
            .iter()
            .map(|path| path.display().to_string())
            .collect();
        println!("   Corpus: {}", corpus.join(", "));
    }
}
