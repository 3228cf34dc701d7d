use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::{Result, WeaveError};

use super::chunker::DocumentChunk;
use super::embedding::Embedder;

/// Separator placed between retrieved chunks in a context string.
pub const CONTEXT_SEPARATOR: &str = "\n\n";

/// Supplies grounding text for a generation step.
#[async_trait]
pub trait ContextProvider: Send + Sync {
    async fn retrieve_context(&self, query: &str, k: usize) -> Result<String>;
}

/// A chunk returned by [`ContextIndex::query`] with its similarity score.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk<'a> {
    pub chunk: &'a DocumentChunk,
    pub score: f32,
    pub position: usize,
}

/// Exact cosine-similarity index over a fixed set of chunks.
///
/// Built once and never mutated afterwards, so it can be shared behind an
/// `Arc` by any number of conversations.
pub struct ContextIndex {
    chunks: Vec<DocumentChunk>,
    embeddings: Vec<Vec<f32>>,
    embedder: Arc<dyn Embedder>,
}

impl std::fmt::Debug for ContextIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContextIndex")
            .field("chunks", &self.chunks.len())
            .field("dimensions", &self.dimensions())
            .finish()
    }
}

impl ContextIndex {
    pub async fn build(chunks: Vec<DocumentChunk>, embedder: Arc<dyn Embedder>) -> Result<Self> {
        if chunks.is_empty() {
            return Err(WeaveError::EmptyCorpus);
        }

        let texts: Vec<String> = chunks.iter().map(|chunk| chunk.text.clone()).collect();
        let embeddings = embedder.embed(&texts).await?;
        validate_embeddings(&embeddings, chunks.len())?;

        info!(
            chunks = chunks.len(),
            dimensions = embeddings.first().map(Vec::len).unwrap_or(0),
            "context index built"
        );

        Ok(Self {
            chunks,
            embeddings,
            embedder,
        })
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    pub fn dimensions(&self) -> usize {
        self.embeddings.first().map(Vec::len).unwrap_or(0)
    }

    pub fn chunks(&self) -> &[DocumentChunk] {
        &self.chunks
    }

    /// Returns up to `k` chunks, most similar first; equal scores keep insertion order.
    pub async fn query(&self, text: &str, k: usize) -> Result<Vec<ScoredChunk<'_>>> {
        if k == 0 {
            return Err(WeaveError::invalid_argument("k must be greater than zero"));
        }

        let query_vector = self
            .embedder
            .embed(&[text.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| WeaveError::embedding("embedder returned no vector for query"))?;

        if query_vector.len() != self.dimensions() {
            return Err(WeaveError::embedding(format!(
                "query embedding has {} dimensions, index has {}",
                query_vector.len(),
                self.dimensions()
            )));
        }

        let mut scored: Vec<ScoredChunk<'_>> = self
            .chunks
            .iter()
            .zip(&self.embeddings)
            .enumerate()
            .map(|(position, (chunk, embedding))| {
                let score = cosine_similarity(&query_vector, embedding);
                ScoredChunk {
                    chunk,
                    score: if score.is_finite() { score } else { f32::MIN },
                    position,
                }
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(Ordering::Equal)
                .then(a.position.cmp(&b.position))
        });
        scored.truncate(k);

        debug!(k, returned = scored.len(), "context index queried");
        Ok(scored)
    }
}

#[async_trait]
impl ContextProvider for ContextIndex {
    /// Joins the ranked chunk texts; `k == 0` yields an empty context.
    async fn retrieve_context(&self, query: &str, k: usize) -> Result<String> {
        if k == 0 {
            return Ok(String::new());
        }

        let results = self.query(query, k).await?;
        Ok(results
            .iter()
            .map(|scored| scored.chunk.text.as_str())
            .collect::<Vec<_>>()
            .join(CONTEXT_SEPARATOR))
    }
}

fn validate_embeddings(embeddings: &[Vec<f32>], expected: usize) -> Result<()> {
    if embeddings.len() != expected {
        return Err(WeaveError::embedding(format!(
            "expected {expected} embeddings, received {}",
            embeddings.len()
        )));
    }

    let dimensions = embeddings.first().map(Vec::len).unwrap_or(0);
    if dimensions == 0 {
        return Err(WeaveError::embedding("embeddings have zero dimensions"));
    }

    for (position, embedding) in embeddings.iter().enumerate() {
        if embedding.len() != dimensions {
            return Err(WeaveError::embedding(format!(
                "chunk {position}: expected {dimensions} dimensions, got {}",
                embedding.len()
            )));
        }
        if let Some(value) = embedding.iter().find(|value| !value.is_finite()) {
            return Err(WeaveError::embedding(format!(
                "chunk {position}: invalid value {value}"
            )));
        }
    }

    Ok(())
}

/// Cosine similarity; zero when either vector has zero norm.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
