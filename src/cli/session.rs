use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use colored::*;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::info;

use crate::client::{AIClient, DynLlmClient};
use crate::config::{Config, DEFAULT_HASHING_DIMENSIONS, EmbedderKind};
use crate::corpus::{corpus_paths, load_corpus};
use crate::retrieval::{
    ChunkParams, ContextIndex, DocumentChunker, Embedder, HashingEmbedder, RemoteEmbedder,
};
use crate::role::{LlmRoleAgent, RoleConfig};
use crate::workflow::{Stage, TransitionOutcome, WorkflowController};

use super::util::{next_step_hint, outcome_heading, progress_message, welcome_message};

const EXIT_COMMANDS: &[&str] = &["exit", "quit"];
const NEW_CONVERSATION_COMMAND: &str = "new";

pub(crate) async fn run(config: &Config, cli_corpus: &[PathBuf]) -> Result<()> {
    let mut controller = build_controller(config, cli_corpus).await?;
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = io::stdout();
    drive(
        &mut controller,
        &config.workflow.organization,
        stdin,
        &mut stdout,
    )
    .await
}

/// Loads the corpus, builds the index and wires both role agents.
pub(crate) async fn build_controller(
    config: &Config,
    cli_corpus: &[PathBuf],
) -> Result<WorkflowController> {
    let paths = corpus_paths(cli_corpus, &config.retrieval.corpus);
    let corpus = load_corpus(&paths)?;

    let client: Arc<DynLlmClient> = Arc::new(AIClient::new(&config.llm)?);
    let index = build_index(config, &corpus, client.clone()).await?;

    let analyst = LlmRoleAgent::new(
        RoleConfig::analyst(config.workflow.organization.clone())?,
        client.clone(),
        &config.models,
    );
    let tester = LlmRoleAgent::new(
        RoleConfig::tester(config.workflow.organization.clone())?,
        client,
        &config.models,
    );

    Ok(
        WorkflowController::new(Arc::new(index), Arc::new(analyst), Arc::new(tester))
            .with_top_k(config.retrieval.top_k),
    )
}

pub(crate) async fn build_index(
    config: &Config,
    corpus: &str,
    client: Arc<DynLlmClient>,
) -> Result<ContextIndex> {
    let retrieval = &config.retrieval;
    let params = ChunkParams::new(retrieval.chunk_size, retrieval.chunk_overlap)?;
    let chunks = DocumentChunker::new(params, retrieval.splitter).chunk(corpus);

    let embedder: Arc<dyn Embedder> = match retrieval.embedder {
        EmbedderKind::Remote => Arc::new(RemoteEmbedder::new(
            client,
            config.models.embedding.clone(),
            retrieval.embedding_batch_size,
        )),
        EmbedderKind::Hashing => Arc::new(HashingEmbedder::new(DEFAULT_HASHING_DIMENSIONS)),
    };

    let index = ContextIndex::build(chunks, embedder)
        .await
        .context("Failed to build the context index")?;
    info!(
        chunks = index.len(),
        dimensions = index.dimensions(),
        embedder = %retrieval.embedder,
        "context index ready"
    );
    Ok(index)
}

/// Line-oriented conversation loop; returns on `exit`, `quit` or end of input.
pub(crate) async fn drive<R, W>(
    controller: &mut WorkflowController,
    organization: &str,
    reader: R,
    out: &mut W,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    writeln!(out, "{}", welcome_message(organization).bold())?;

    let mut lines = reader.lines();
    loop {
        write!(out, "{} ", ">".cyan())?;
        out.flush()?;

        let Some(line) = lines
            .next_line()
            .await
            .context("Failed to read from stdin")?
        else {
            writeln!(out)?;
            break;
        };

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if EXIT_COMMANDS
            .iter()
            .any(|command| input.eq_ignore_ascii_case(command))
        {
            break;
        }
        if controller.stage() == Stage::Completed
            && input.eq_ignore_ascii_case(NEW_CONVERSATION_COMMAND)
        {
            controller.reset();
            writeln!(out, "{}", welcome_message(organization).bold())?;
            continue;
        }

        if let Some(progress) = progress_message(controller.preview(input), input) {
            writeln!(out, "{progress}")?;
            out.flush()?;
        }

        match controller.handle(input).await {
            Ok(outcome) => render_outcome(out, &outcome)?,
            Err(err) => {
                writeln!(out, "{}", format!("❌ An error occurred: {err}").red())?;
                writeln!(out, "{}", welcome_message(organization).bold())?;
            }
        }
    }

    writeln!(out, "👋 Goodbye!")?;
    Ok(())
}

fn render_outcome<W: Write>(out: &mut W, outcome: &TransitionOutcome) -> Result<()> {
    writeln!(out, "{}", outcome_heading(outcome).bold().green())?;
    if let Some(text) = outcome.text() {
        writeln!(out, "{text}")?;
    }
    writeln!(out, "{}", next_step_hint(outcome))?;
    Ok(())
}
