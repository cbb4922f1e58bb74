//! Chunk retrieval
pub mod engine;

pub use engine::{RetrievalMode, Retriever};
