//! supportdesk - Support Ticket Triage
//!
//! Classifies customer support tickets by topic, sentiment and priority, and
//! answers documentation questions with retrieval-augmented generation.
//!
//! # Architecture
//!
//! - **Models**: embedder, topic, sentiment and answer roles, each with a
//!   rule-based fallback held by [`ModelContext`]
//! - **Knowledge**: chunked documentation with an optional dense index
//! - **Classifier**: generative, model-backed or keyword classification
//! - **RAG**: retrieval, context assembly and answer-or-route decisions
//! - **Triage**: classification followed by an answer or a routing message

pub mod errors;
pub mod types;
pub mod config;

pub use errors::{DeskError, ModelError, ModelErrorKind, ModelResult, Result};

// Documentation corpus and search
pub mod ingestion;
pub mod knowledge;

// Model roles
pub mod models;
pub use models::ModelContext;

// Classification and answers
pub mod classifier;
pub mod rag;
pub mod triage;

pub use classifier::TicketClassifier;
pub use config::Config;
pub use rag::{ResponseGenerator, Retriever};
pub use triage::{TriageOutcome, TriageService};
pub use types::{Classification, Priority, RAGResponse, Sentiment, Ticket, Topic};

pub mod cli;
