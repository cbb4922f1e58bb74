//! Model roles and their backends
//!
//! Each role (embedder, topic classifier, sentiment classifier, answer
//! generator) is a trait with a model-backed and a rule-based
//! implementation. [`ModelContext`] holds the chosen one for each role.

pub mod chat;
pub mod context;
pub mod embedding;
pub mod generator;
pub mod sentiment;
pub mod topic;

pub use chat::{ChatClient, ChatRequest};
pub use context::{ModelContext, ModelContextBuilder, ModelStatus, RoleStatus};
pub use embedding::{CandleEmbedder, Embedder};
pub use generator::{AnswerGenerator, LlmAnswerGenerator, TemplateAnswerGenerator};
pub use sentiment::{KeywordSentimentClassifier, LlmSentimentClassifier, SentimentClassifier};
pub use topic::{KeywordTopicClassifier, TopicClassifier, ZeroShotTopicClassifier};
