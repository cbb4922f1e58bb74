//! One-time knowledge store construction
//!
//! Bundled documents are always included. Scraped pages are added when
//! scraping is enabled. Dense vectors are added when an embedder is present
//! and every step of encoding and indexing succeeds; otherwise the store is
//! built chunks-only.

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::Config;
use crate::errors::{ModelResult, Result};
use crate::ingestion::{bundled_documents, Chunker, PageScraper, SourceDocument};
use crate::knowledge::store::{Chunk, KnowledgeStore};
use crate::models::Embedder;

pub struct KnowledgeStoreBuilder {
    config: Config,
    embedder: Option<Arc<dyn Embedder>>,
    extra: Vec<SourceDocument>,
}

impl KnowledgeStoreBuilder {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            embedder: None,
            extra: Vec::new(),
        }
    }

    /// Embedder used for chunk vectors; `None` builds a keyword-only store
    pub fn embedder(mut self, embedder: Option<Arc<dyn Embedder>>) -> Self {
        self.embedder = embedder;
        self
    }

    /// Additional documents indexed after the bundled ones
    pub fn documents(mut self, documents: Vec<SourceDocument>) -> Self {
        self.extra.extend(documents);
        self
    }

    /// Assemble, chunk and (optionally) embed the corpus
    ///
    /// Only invalid chunking parameters fail; every backend problem degrades.
    pub async fn build(self) -> Result<KnowledgeStore> {
        let chunker = Chunker::new(
            self.config.retrieval.chunk_size,
            self.config.retrieval.chunk_overlap,
        )?;

        let mut documents = bundled_documents();
        documents.extend(self.extra);
        if self.config.scrape.enabled {
            documents.extend(scrape(&self.config).await);
        }

        let chunks = chunk_documents(&chunker, &documents);
        info!(
            documents = documents.len(),
            chunks = chunks.len(),
            "chunked knowledge corpus"
        );

        let embedder = match self.embedder {
            Some(embedder) => embedder,
            None => {
                info!("no embedder available, knowledge store uses keyword retrieval");
                return Ok(KnowledgeStore::chunks_only(chunks));
            }
        };

        let embeddings = match embed_chunks(embedder.as_ref(), &chunks, self.config.embedding.batch_size) {
            Ok(embeddings) => embeddings,
            Err(e) => {
                warn!("chunk encoding failed, falling back to keyword retrieval: {}", e);
                return Ok(KnowledgeStore::chunks_only(chunks));
            }
        };

        let fallback_chunks = chunks.clone();
        match KnowledgeStore::with_vectors(chunks, embedder, embeddings) {
            Ok(store) => {
                info!(rows = store.embedding_rows(), "built dense vector index");
                Ok(store)
            }
            Err(e) => {
                warn!("vector index build failed, falling back to keyword retrieval: {}", e);
                Ok(KnowledgeStore::chunks_only(fallback_chunks))
            }
        }
    }
}

async fn scrape(config: &Config) -> Vec<SourceDocument> {
    match PageScraper::new(config.scrape.clone()) {
        Ok(mut scraper) => {
            let documents = scraper.scrape_all(&config.scrape.urls).await;
            info!(pages = documents.len(), "scraping finished");
            documents
        }
        Err(e) => {
            warn!("scraper unavailable, using bundled documents only: {}", e);
            Vec::new()
        }
    }
}

/// Chunk every document, tagging chunks with their document's metadata
pub fn chunk_documents(chunker: &Chunker, documents: &[SourceDocument]) -> Vec<Chunk> {
    documents
        .iter()
        .flat_map(|doc| {
            chunker.chunk(&doc.text).into_iter().map(move |text| Chunk {
                text,
                source: doc.source.clone(),
                category: doc.category,
                origin: doc.origin,
            })
        })
        .collect()
}

/// Encode chunk texts in batches, preserving order
fn embed_chunks(embedder: &dyn Embedder, chunks: &[Chunk], batch_size: usize) -> ModelResult<Vec<Vec<f32>>> {
    let mut rows = Vec::with_capacity(chunks.len());
    for batch in chunks.chunks(batch_size.max(1)) {
        let texts: Vec<&str> = batch.iter().map(|c| c.text.as_str()).collect();
        rows.extend(embedder.embed_batch(&texts)?);
    }
    Ok(rows)
}
