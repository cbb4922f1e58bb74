//! Retrieval-augmented answers
//!
//! Components:
//! - Retriever: dense or keyword-overlap search over the knowledge store
//! - Context: assembly of retrieved chunks and prompts
//! - Templates: intent-based answers built from context sentences
//! - Pipeline: answer-or-route decision and degradation on generator failure

pub mod context;
pub mod pipeline;
pub mod retrieval;
pub mod templates;

pub use context::AssembledContext;
pub use pipeline::{
    generate_routing_message, routing_response, should_use_rag, ResponseGenerator,
};
pub use retrieval::{RetrievalMode, Retriever};
pub use templates::{compose_answer, detect_intent, extract_relevant_info, Intent};
