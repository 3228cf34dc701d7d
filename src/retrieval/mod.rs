//! Retrieval-augmented context: chunking raw documentation, embedding the
//! chunks and answering top-k similarity queries.

pub mod chunker;
pub mod embedding;
pub mod index;

pub use chunker::{ChunkParams, DocumentChunk, DocumentChunker, SplitterKind, chunk};
pub use embedding::{Embedder, HashingEmbedder, RemoteEmbedder};
pub use index::{CONTEXT_SEPARATOR, ContextIndex, ContextProvider, ScoredChunk, cosine_similarity};
