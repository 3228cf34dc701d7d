use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::error::WeaveError;

/// Reads every corpus file and joins their contents with a newline.
///
/// Fails with [`WeaveError::EmptyCorpus`] when no paths are given or the
/// joined text is blank.
pub fn load_corpus<P: AsRef<Path>>(paths: &[P]) -> Result<String> {
    let mut documents = Vec::with_capacity(paths.len());
    for path in paths {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read corpus file {}", path.display()))?;
        documents.push(text);
    }

    let corpus = documents.join("\n");
    if corpus.trim().is_empty() {
        return Err(WeaveError::EmptyCorpus.into());
    }

    info!(
        files = paths.len(),
        chars = corpus.chars().count(),
        "loaded corpus"
    );
    Ok(corpus)
}

/// Command-line paths take precedence over the configured ones.
pub fn corpus_paths(cli_paths: &[PathBuf], configured: &[PathBuf]) -> Vec<PathBuf> {
    if cli_paths.is_empty() {
        configured.to_vec()
    } else {
        cli_paths.to_vec()
    }
}
