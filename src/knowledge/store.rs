//! Immutable chunk store with optional dense vectors
//!
//! The store is built once and shared behind an `Arc`. Vector structures are
//! either complete (one embedding row per chunk, indexed) or absent.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::errors::{DeskError, Result};
use crate::ingestion::{ChunkOrigin, DocCategory};
use crate::knowledge::index::FlatIndex;
use crate::models::Embedder;

/// Unit of retrieval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    /// URL or synthetic document id
    pub source: String,
    pub category: DocCategory,
    pub origin: ChunkOrigin,
}

/// Lowercase word set with leading/trailing ASCII punctuation trimmed
pub fn keyword_set(text: &str) -> HashSet<String> {
    text.split_whitespace()
        .map(|w| w.trim_matches(|c: char| c.is_ascii_punctuation()).to_lowercase())
        .filter(|w| !w.is_empty())
        .collect()
}

/// Embedder, embedding rows and index, kept together
struct DenseVectors {
    embedder: Arc<dyn Embedder>,
    embeddings: Vec<Vec<f32>>,
    index: FlatIndex,
}

pub struct KnowledgeStore {
    chunks: Vec<Chunk>,
    keywords: Vec<HashSet<String>>,
    dense: Option<DenseVectors>,
}

impl KnowledgeStore {
    /// Store served by keyword retrieval only
    pub fn chunks_only(chunks: Vec<Chunk>) -> Self {
        let keywords = chunks.iter().map(|c| keyword_set(&c.text)).collect();
        Self {
            chunks,
            keywords,
            dense: None,
        }
    }

    /// Store with a dense index; `embeddings[i]` must belong to `chunks[i]`
    pub fn with_vectors(
        chunks: Vec<Chunk>,
        embedder: Arc<dyn Embedder>,
        embeddings: Vec<Vec<f32>>,
    ) -> Result<Self> {
        if embeddings.len() != chunks.len() {
            return Err(DeskError::IndexError(format!(
                "{} embedding rows for {} chunks",
                embeddings.len(),
                chunks.len()
            )));
        }

        let dimension = embeddings
            .first()
            .map(|row| row.len())
            .unwrap_or_else(|| embedder.dimension());
        let mut index = FlatIndex::new(dimension);
        index.add(&embeddings)?;

        let mut store = Self::chunks_only(chunks);
        store.dense = Some(DenseVectors {
            embedder,
            embeddings,
            index,
        });
        Ok(store)
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn chunk(&self, idx: usize) -> Option<&Chunk> {
        self.chunks.get(idx)
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Precomputed keyword set of chunk `idx`
    pub fn keywords(&self, idx: usize) -> Option<&HashSet<String>> {
        self.keywords.get(idx)
    }

    pub fn has_vectors(&self) -> bool {
        self.dense.is_some()
    }

    /// Embedder the vectors were built with
    pub fn embedder(&self) -> Option<&Arc<dyn Embedder>> {
        self.dense.as_ref().map(|d| &d.embedder)
    }

    pub fn index(&self) -> Option<&FlatIndex> {
        self.dense.as_ref().map(|d| &d.index)
    }

    /// Embedding row count; zero without vectors
    pub fn embedding_rows(&self) -> usize {
        self.dense.as_ref().map(|d| d.embeddings.len()).unwrap_or(0)
    }

    /// Number of chunks per origin, `(bundled, scraped)`
    pub fn origin_counts(&self) -> (usize, usize) {
        let bundled = self
            .chunks
            .iter()
            .filter(|c| c.origin == ChunkOrigin::Bundled)
            .count();
        (bundled, self.chunks.len() - bundled)
    }
}

impl std::fmt::Debug for KnowledgeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KnowledgeStore")
            .field("chunks", &self.chunks.len())
            .field("has_vectors", &self.has_vectors())
            .finish()
    }
}
