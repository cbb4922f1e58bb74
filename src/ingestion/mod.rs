//! Corpus ingestion
//!
//! Bundled fallback documentation, optional page scraping, and word-window
//! chunking.

pub mod chunker;
pub mod corpus;
pub mod pages;

pub use chunker::{chunk, Chunker};
pub use corpus::{bundled_documents, ChunkOrigin, DocCategory, SourceDocument};
pub use pages::{extract_text, PageScraper};
