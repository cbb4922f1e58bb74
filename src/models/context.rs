//! Model context: one implementation per model role, chosen once
//!
//! Load failures are resolved here, at construction. Every role always has
//! an implementation afterwards; the rule-based one when its model could not
//! be brought up.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::config::Config;
use crate::errors::{ModelError, ModelResult};
use crate::models::chat::ChatClient;
use crate::models::embedding::{CandleEmbedder, Embedder};
use crate::models::generator::{AnswerGenerator, LlmAnswerGenerator, TemplateAnswerGenerator};
use crate::models::sentiment::{
    KeywordSentimentClassifier, LlmSentimentClassifier, SentimentClassifier,
};
use crate::models::topic::{KeywordTopicClassifier, TopicClassifier, ZeroShotTopicClassifier};

/// Which implementation serves a role
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum RoleStatus {
    /// Backed by a model; carries the backend name
    Model(String),
    /// Backed by rules; carries the reason the model is missing
    Fallback(String),
}

impl RoleStatus {
    pub fn is_model(&self) -> bool {
        matches!(self, RoleStatus::Model(_))
    }
}

impl fmt::Display for RoleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoleStatus::Model(name) => write!(f, "model ({})", name),
            RoleStatus::Fallback(reason) => write!(f, "rule-based fallback ({})", reason),
        }
    }
}

/// Status of every role
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelStatus {
    pub embedder: RoleStatus,
    pub topic: RoleStatus,
    pub sentiment: RoleStatus,
    pub generator: RoleStatus,
}

/// Owned set of model-role implementations
#[derive(Clone)]
pub struct ModelContext {
    embedder: Option<Arc<dyn Embedder>>,
    topic: Arc<dyn TopicClassifier>,
    sentiment: Arc<dyn SentimentClassifier>,
    generator: Arc<dyn AnswerGenerator>,
    chat: Option<ChatClient>,
    status: ModelStatus,
}

impl ModelContext {
    /// Bring up every backend enabled in `config`, falling back per role
    pub async fn load(config: &Config) -> Self {
        let embedder = if config.embedding.enabled {
            load_embedder(config.embedding.model_id.clone()).await
        } else {
            Err(ModelError::unavailable(
                &config.embedding.model_id,
                "disabled by configuration",
            ))
        };

        let topic: ModelResult<Arc<dyn TopicClassifier>> = match &embedder {
            Ok(embedder) => ZeroShotTopicClassifier::new(
                Arc::clone(embedder),
                config.classifier.confidence_threshold,
                config.classifier.max_topics,
            )
            .map(|c| Arc::new(c) as Arc<dyn TopicClassifier>),
            Err(e) => Err(ModelError::unavailable("zero-shot-topic", e)),
        };

        let chat = if config.generator.enabled {
            connect_chat(config).await
        } else {
            Err(ModelError::unavailable(
                &config.generator.model,
                "disabled by configuration",
            ))
        };

        let (sentiment, generator, chat) = match chat {
            Ok(chat) => (
                Ok(Arc::new(LlmSentimentClassifier::new(
                    chat.clone(),
                    config.classifier.sentiment_max_chars,
                )) as Arc<dyn SentimentClassifier>),
                Ok(Arc::new(LlmAnswerGenerator::new(
                    chat.clone(),
                    config.generator.temperature,
                    config.generator.max_tokens,
                )) as Arc<dyn AnswerGenerator>),
                Some(chat),
            ),
            Err(e) => (Err(e.clone()), Err(e), None),
        };

        ModelContext::builder()
            .embedder(embedder)
            .topic(topic)
            .sentiment(sentiment)
            .generator(generator)
            .chat(chat)
            .build()
    }

    /// Every role on rules; no network, no downloads
    pub fn rule_based() -> Self {
        ModelContext::builder().build()
    }

    pub fn builder() -> ModelContextBuilder {
        ModelContextBuilder::default()
    }

    pub fn embedder(&self) -> Option<Arc<dyn Embedder>> {
        self.embedder.clone()
    }

    pub fn topic(&self) -> &dyn TopicClassifier {
        self.topic.as_ref()
    }

    pub fn sentiment(&self) -> &dyn SentimentClassifier {
        self.sentiment.as_ref()
    }

    pub fn generator(&self) -> &dyn AnswerGenerator {
        self.generator.as_ref()
    }

    /// Chat client, when the generative backend passed its health check
    pub fn chat(&self) -> Option<&ChatClient> {
        self.chat.as_ref()
    }

    pub fn status(&self) -> &ModelStatus {
        &self.status
    }
}

impl fmt::Debug for ModelContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelContext")
            .field("status", &self.status)
            .field("chat", &self.chat)
            .finish()
    }
}

async fn load_embedder(model_id: String) -> ModelResult<Arc<dyn Embedder>> {
    info!("Loading embedding model {}", model_id);
    let id = model_id.clone();
    match tokio::task::spawn_blocking(move || CandleEmbedder::load(&id)).await {
        Ok(Ok(embedder)) => Ok(Arc::new(embedder) as Arc<dyn Embedder>),
        Ok(Err(e)) => Err(e),
        Err(join) => Err(ModelError::unavailable(model_id, join)),
    }
}

async fn connect_chat(config: &Config) -> ModelResult<ChatClient> {
    let chat = ChatClient::from_config(&config.generator)
        .map_err(|e| ModelError::unavailable(&config.generator.model, e))?;
    info!("Checking chat backend at {}", chat.base_url());
    chat.health_check().await?;
    Ok(chat)
}

/// Assembles a [`ModelContext`] from per-role load results
///
/// Roles left unset, or set to an error, get their rule-based variant.
#[derive(Default)]
pub struct ModelContextBuilder {
    embedder: Option<ModelResult<Arc<dyn Embedder>>>,
    topic: Option<ModelResult<Arc<dyn TopicClassifier>>>,
    sentiment: Option<ModelResult<Arc<dyn SentimentClassifier>>>,
    generator: Option<ModelResult<Arc<dyn AnswerGenerator>>>,
    chat: Option<ChatClient>,
}

impl ModelContextBuilder {
    pub fn embedder(mut self, embedder: ModelResult<Arc<dyn Embedder>>) -> Self {
        self.embedder = Some(embedder);
        self
    }

    pub fn topic(mut self, topic: ModelResult<Arc<dyn TopicClassifier>>) -> Self {
        self.topic = Some(topic);
        self
    }

    pub fn sentiment(mut self, sentiment: ModelResult<Arc<dyn SentimentClassifier>>) -> Self {
        self.sentiment = Some(sentiment);
        self
    }

    pub fn generator(mut self, generator: ModelResult<Arc<dyn AnswerGenerator>>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn chat(mut self, chat: Option<ChatClient>) -> Self {
        self.chat = chat;
        self
    }

    pub fn build(self) -> ModelContext {
        let (embedder, embedder_status) = match resolve("embedder", self.embedder) {
            Ok(embedder) => {
                let status = RoleStatus::Model(embedder.name().to_string());
                (Some(embedder), status)
            }
            Err(reason) => (None, RoleStatus::Fallback(reason)),
        };

        let (topic, topic_status) = match resolve("topic classifier", self.topic) {
            Ok(topic) => {
                let status = role_status(topic.is_rule_based(), topic.name());
                (topic, status)
            }
            Err(reason) => (
                Arc::new(KeywordTopicClassifier) as Arc<dyn TopicClassifier>,
                RoleStatus::Fallback(reason),
            ),
        };

        let (sentiment, sentiment_status) = match resolve("sentiment classifier", self.sentiment) {
            Ok(sentiment) => {
                let status = role_status(sentiment.is_rule_based(), sentiment.name());
                (sentiment, status)
            }
            Err(reason) => (
                Arc::new(KeywordSentimentClassifier) as Arc<dyn SentimentClassifier>,
                RoleStatus::Fallback(reason),
            ),
        };

        let (generator, generator_status) = match resolve("answer generator", self.generator) {
            Ok(generator) => {
                let status = role_status(generator.is_rule_based(), generator.name());
                (generator, status)
            }
            Err(reason) => (
                Arc::new(TemplateAnswerGenerator) as Arc<dyn AnswerGenerator>,
                RoleStatus::Fallback(reason),
            ),
        };

        ModelContext {
            embedder,
            topic,
            sentiment,
            generator,
            chat: self.chat,
            status: ModelStatus {
                embedder: embedder_status,
                topic: topic_status,
                sentiment: sentiment_status,
                generator: generator_status,
            },
        }
    }
}

/// Injected rule-based implementations still count as a fallback
fn role_status(rule_based: bool, name: &str) -> RoleStatus {
    if rule_based {
        RoleStatus::Fallback(format!("{} selected", name))
    } else {
        RoleStatus::Model(name.to_string())
    }
}

fn resolve<T>(role: &str, slot: Option<ModelResult<T>>) -> std::result::Result<T, String> {
    match slot {
        Some(Ok(value)) => Ok(value),
        Some(Err(e)) => {
            warn!("{} falling back to rules: {}", role, e);
            Err(e.to_string())
        }
        None => Err("not configured".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_based_context() {
        let ctx = ModelContext::rule_based();
        assert!(ctx.embedder().is_none());
        assert!(ctx.chat().is_none());
        assert!(ctx.topic().is_rule_based());
        assert!(ctx.sentiment().is_rule_based());
        assert!(ctx.generator().is_rule_based());
        assert!(!ctx.status().topic.is_model());
    }

    #[test]
    fn test_load_failure_becomes_fallback_with_reason() {
        let ctx = ModelContext::builder()
            .topic(Err(ModelError::unavailable("zero-shot-topic", "weights missing")))
            .build();
        assert!(ctx.topic().is_rule_based());
        match &ctx.status().topic {
            RoleStatus::Fallback(reason) => assert!(reason.contains("weights missing")),
            other => panic!("unexpected status {:?}", other),
        }
    }

    #[test]
    fn test_injected_rule_backend_reports_fallback() {
        let ctx = ModelContext::builder()
            .topic(Ok(Arc::new(KeywordTopicClassifier) as Arc<dyn TopicClassifier>))
            .build();
        assert!(!ctx.status().topic.is_model());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(RoleStatus::Model("m".into()).to_string(), "model (m)");
        assert!(RoleStatus::Fallback("x".into())
            .to_string()
            .starts_with("rule-based fallback"));
    }

    #[tokio::test]
    async fn test_load_offline_config_is_fully_rule_based() {
        let ctx = ModelContext::load(&Config::offline()).await;
        assert!(ctx.embedder().is_none());
        assert!(ctx.chat().is_none());
        match &ctx.status().generator {
            RoleStatus::Fallback(reason) => assert!(reason.contains("disabled")),
            other => panic!("unexpected status {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_load_unreachable_chat_falls_back() {
        let mut config = Config::offline();
        config.generator.enabled = true;
        config.generator.base_url = "http://127.0.0.1:9".to_string();
        config.generator.timeout_secs = 2;
        let ctx = ModelContext::load(&config).await;
        assert!(ctx.chat().is_none());
        assert!(ctx.sentiment().is_rule_based());
        assert!(ctx.generator().is_rule_based());
    }
}
