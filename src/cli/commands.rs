use anyhow::Result;

use crate::config::{Config, ConfigBuilder, EmbedderKind};

use super::args::{Cli, Command};
use super::config_cmd;
use super::session;

pub(crate) async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Command::Config(ref args)) => config_cmd::handle_config(args),
        None => {
            let config = apply_cli_overrides(Config::load()?, &cli)?;
            session::run(&config, &cli.corpus).await
        }
    }
}

/// Command-line flags win over the file and environment layers.
pub(crate) fn apply_cli_overrides(config: Config, cli: &Cli) -> Result<Config> {
    let config = ConfigBuilder::from_config(config)
        .with_workflow(|workflow| {
            if let Some(organization) = &cli.organization {
                workflow.organization = organization.clone();
            }
        })
        .with_retrieval(|retrieval| {
            if cli.offline {
                retrieval.embedder = EmbedderKind::Hashing;
            }
            if let Some(top_k) = cli.top_k {
                retrieval.top_k = top_k;
            }
        })
        .build()?;

    config.validate()?;
    Ok(config)
}
