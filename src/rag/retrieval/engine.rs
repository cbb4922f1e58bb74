//! Retrieval over the knowledge store
//!
//! Dense search when the store carries vectors, keyword overlap otherwise.
//! A query that cannot be encoded falls back to keywords for that call only.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::RetrievalConfig;
use crate::errors::{ModelError, ModelResult};
use crate::knowledge::{keyword_set, KnowledgeStore};
use crate::types::RetrievalResult;

/// Which path answered a retrieval
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalMode {
    Vector,
    Keyword,
}

/// Top-k chunk retrieval
#[derive(Debug, Clone)]
pub struct Retriever {
    store: Arc<KnowledgeStore>,
    top_k: usize,
    similarity_threshold: f32,
}

impl Retriever {
    pub fn new(store: Arc<KnowledgeStore>, config: &RetrievalConfig) -> Self {
        Self {
            store,
            top_k: config.top_k,
            similarity_threshold: config.similarity_threshold,
        }
    }

    pub fn store(&self) -> &Arc<KnowledgeStore> {
        &self.store
    }

    /// Configured default `k`
    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Mode used when the query can be encoded
    pub fn mode(&self) -> RetrievalMode {
        if self.store.has_vectors() {
            RetrievalMode::Vector
        } else {
            RetrievalMode::Keyword
        }
    }

    /// At most `k` chunks ordered by descending score, ranks starting at 1
    pub fn retrieve(&self, query: &str, k: usize) -> Vec<RetrievalResult> {
        if k == 0 {
            return Vec::new();
        }

        if self.store.has_vectors() {
            match self.vector_search(query, k) {
                Ok(results) => return results,
                Err(e) => warn!("vector retrieval failed, using keyword overlap: {}", e),
            }
        }

        self.keyword_search(query, k)
    }

    fn vector_search(&self, query: &str, k: usize) -> ModelResult<Vec<RetrievalResult>> {
        let (embedder, index) = match (self.store.embedder(), self.store.index()) {
            (Some(embedder), Some(index)) => (embedder, index),
            _ => return Ok(self.keyword_search(query, k)),
        };

        let vector = embedder.embed(query)?;
        let (scores, ids) = index
            .search(&vector, k)
            .map_err(|e| ModelError::inference(embedder.name(), e))?;

        let results: Vec<RetrievalResult> = ids
            .into_iter()
            .zip(scores)
            .filter_map(|(id, score)| {
                let idx = usize::try_from(id).ok()?;
                let chunk = self.store.chunk(idx)?;
                (score >= self.similarity_threshold).then(|| (chunk, score))
            })
            .enumerate()
            .map(|(i, (chunk, score))| RetrievalResult {
                text: chunk.text.clone(),
                source: chunk.source.clone(),
                category: chunk.category,
                score,
                rank: i + 1,
            })
            .collect();

        debug!(hits = results.len(), "vector retrieval");
        Ok(results)
    }

    /// Keyword-overlap retrieval; score is the share of query words matched
    pub fn keyword_search(&self, query: &str, k: usize) -> Vec<RetrievalResult> {
        let query_words = keyword_set(query);
        if query_words.is_empty() || k == 0 {
            return Vec::new();
        }

        let mut scored: Vec<(usize, f32)> = (0..self.store.len())
            .filter_map(|idx| {
                let words = self.store.keywords(idx)?;
                let overlap = query_words.intersection(words).count();
                (overlap > 0).then(|| (idx, overlap as f32 / query_words.len() as f32))
            })
            .collect();

        // Stable: equal scores keep chunk order
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        let results: Vec<RetrievalResult> = scored
            .into_iter()
            .take(k)
            .filter_map(|(idx, score)| self.store.chunk(idx).map(|chunk| (chunk, score)))
            .enumerate()
            .map(|(i, (chunk, score))| RetrievalResult {
                text: chunk.text.clone(),
                source: chunk.source.clone(),
                category: chunk.category,
                score,
                rank: i + 1,
            })
            .collect();

        debug!(hits = results.len(), "keyword retrieval");
        results
    }
}
