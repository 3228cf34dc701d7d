use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::client::{DynLlmClient, EmbeddingRequest};
use crate::error::{Result, WeaveError};

/// Maps texts to fixed-dimension vectors, one per input, in input order.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// Embeds through an OpenAI-compatible `/embeddings` endpoint.
pub struct RemoteEmbedder {
    client: Arc<DynLlmClient>,
    model: String,
    batch_size: usize,
}

impl RemoteEmbedder {
    pub fn new(client: Arc<DynLlmClient>, model: impl Into<String>, batch_size: usize) -> Self {
        Self {
            client,
            model: model.into(),
            batch_size: batch_size.max(1),
        }
    }
}

#[async_trait]
impl Embedder for RemoteEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());

        for batch in texts.chunks(self.batch_size) {
            debug!(model = %self.model, batch = batch.len(), "embedding batch");
            let response = self
                .client
                .embeddings(EmbeddingRequest {
                    model: self.model.clone(),
                    input: batch.to_vec(),
                })
                .await
                .map_err(|err| WeaveError::embedding(format!("{err:#}")))?;

            if response.data.len() != batch.len() {
                return Err(WeaveError::embedding(format!(
                    "expected {} embeddings, received {}",
                    batch.len(),
                    response.data.len()
                )));
            }

            let mut data = response.data;
            data.sort_by_key(|item| item.index);
            if data.iter().enumerate().any(|(pos, item)| item.index != pos) {
                return Err(WeaveError::embedding(
                    "embedding response indices do not match the request",
                ));
            }
            vectors.extend(data.into_iter().map(|item| item.embedding));
        }

        Ok(vectors)
    }
}

/// Local feature-hashing embedder: lower-cased alphanumeric terms are hashed
/// into a fixed number of buckets and the counts L2-normalized.
///
/// Deterministic and network-free; backs offline sessions.
#[derive(Debug, Clone, Copy)]
pub struct HashingEmbedder {
    dimensions: usize,
}

impl HashingEmbedder {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }

    pub fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0_f32; self.dimensions];

        for term in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|term| !term.is_empty())
        {
            let bucket = (fnv1a(&term.to_lowercase()) % self.dimensions as u64) as usize;
            vector[bucket] += 1.0;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|v| *v /= norm);
        }
        vector
    }
}

#[async_trait]
impl Embedder for HashingEmbedder {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.embed_text(text)).collect())
    }
}

fn fnv1a(term: &str) -> u64 {
    term.bytes().fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
    })
}
