//! Ticket classification with per-axis fallback
//!
//! Topic and sentiment each come from their model when one is loaded and the
//! call succeeds, from keyword rules otherwise. Priority always comes from
//! the keyword tiers.

use tracing::{debug, warn};

use crate::classifier::generative::classify_with_chat;
use crate::classifier::rules::{rule_priority, rule_sentiment, rule_topic};
use crate::config::{ClassificationStrategy, ClassifierConfig};
use crate::errors::ModelErrorKind;
use crate::models::context::RoleStatus;
use crate::models::{ChatClient, ModelContext};
use crate::types::{combine_text, Classification, ClassifiedTicket, Priority, Sentiment, Ticket, Topic};

/// Confidence when topic and sentiment both came from models
pub const CONFIDENCE_BOTH_MODELS: f32 = 0.9;

/// Confidence when exactly one axis came from a model
pub const CONFIDENCE_ONE_MODEL: f32 = 0.7;

/// Confidence when both axes came from rules
pub const CONFIDENCE_RULES: f32 = 0.6;

/// Confidence after an unparseable generative answer
pub const CONFIDENCE_PARSE_FAILURE: f32 = 0.1;

/// Where one axis got its label
#[derive(Debug, Clone, PartialEq)]
enum Provenance {
    Model(String),
    Rules(String),
}

impl Provenance {
    fn is_model(&self) -> bool {
        matches!(self, Provenance::Model(_))
    }

    fn describe(&self) -> String {
        match self {
            Provenance::Model(name) => format!("model ({})", name),
            Provenance::Rules(reason) => format!("keyword rules ({})", reason),
        }
    }
}

/// Classifies tickets using the implementations held by a [`ModelContext`]
#[derive(Debug, Clone)]
pub struct TicketClassifier {
    models: ModelContext,
    config: ClassifierConfig,
}

impl TicketClassifier {
    pub fn new(models: ModelContext, config: &ClassifierConfig) -> Self {
        Self {
            models,
            config: config.clone(),
        }
    }

    /// Classifier backed by rules only
    pub fn rule_based() -> Self {
        Self::new(ModelContext::rule_based(), &ClassifierConfig::default())
    }

    pub fn models(&self) -> &ModelContext {
        &self.models
    }

    /// Classify one ticket; never fails
    pub async fn classify(&self, subject: &str, description: &str) -> Classification {
        if self.config.strategy == ClassificationStrategy::Generative {
            if let Some(chat) = self.models.chat() {
                return self.classify_generative(chat, subject, description).await;
            }
            debug!("generative strategy configured without a chat backend, using pipeline");
        }
        self.classify_pipeline(subject, description).await
    }

    pub async fn classify_ticket(&self, ticket: &Ticket) -> ClassifiedTicket {
        ClassifiedTicket {
            classification: self.classify(&ticket.subject, &ticket.description).await,
            ticket: ticket.clone(),
        }
    }

    /// Classify tickets one after another, keeping input order
    pub async fn classify_many(&self, tickets: &[Ticket]) -> Vec<ClassifiedTicket> {
        let mut classified = Vec::with_capacity(tickets.len());
        for ticket in tickets {
            classified.push(self.classify_ticket(ticket).await);
        }
        classified
    }

    async fn classify_pipeline(&self, subject: &str, description: &str) -> Classification {
        let text = combine_text(subject, description);
        let priority = rule_priority(&text);

        let (topic_tags, topic_source) = self.classify_topic(&text);
        let (sentiment, sentiment_source) = self.classify_sentiment(&text).await;

        let confidence = match (topic_source.is_model(), sentiment_source.is_model()) {
            (true, true) => CONFIDENCE_BOTH_MODELS,
            (true, false) | (false, true) => CONFIDENCE_ONE_MODEL,
            (false, false) => CONFIDENCE_RULES,
        };

        Classification {
            topic_tags,
            sentiment,
            priority,
            confidence,
            reasoning: format!(
                "Topic from {}; sentiment from {}; {}",
                topic_source.describe(),
                sentiment_source.describe(),
                priority_reason(priority)
            ),
        }
    }

    fn classify_topic(&self, text: &str) -> (Vec<Topic>, Provenance) {
        let topic = self.models.topic();
        if topic.is_rule_based() {
            return (
                vec![rule_topic(text)],
                Provenance::Rules(fallback_reason(&self.models.status().topic)),
            );
        }

        match topic.classify(text) {
            Ok(tags) => (
                self.normalize_topics(tags),
                Provenance::Model(topic.name().to_string()),
            ),
            Err(e) => {
                warn!("topic model failed for this ticket, using rules: {}", e);
                (
                    vec![rule_topic(text)],
                    Provenance::Rules(format!("fallback after model failure: {}", e)),
                )
            }
        }
    }

    /// Ordered, duplicate-free, capped at `max_topics`; `Product` when empty
    fn normalize_topics(&self, tags: Vec<Topic>) -> Vec<Topic> {
        let mut topics: Vec<Topic> = Vec::with_capacity(tags.len());
        for tag in tags {
            if !topics.contains(&tag) {
                topics.push(tag);
            }
        }
        topics.truncate(self.config.max_topics.max(1));
        if topics.is_empty() {
            topics.push(Topic::Product);
        }
        topics
    }

    async fn classify_sentiment(&self, text: &str) -> (Sentiment, Provenance) {
        let sentiment = self.models.sentiment();
        if sentiment.is_rule_based() {
            return (
                rule_sentiment(text),
                Provenance::Rules(fallback_reason(&self.models.status().sentiment)),
            );
        }

        match sentiment.classify(text).await {
            Ok(label) => (label, Provenance::Model(sentiment.name().to_string())),
            Err(e) => {
                warn!("sentiment model failed for this ticket, using rules: {}", e);
                (
                    rule_sentiment(text),
                    Provenance::Rules(format!("fallback after model failure: {}", e)),
                )
            }
        }
    }

    async fn classify_generative(
        &self,
        chat: &ChatClient,
        subject: &str,
        description: &str,
    ) -> Classification {
        let text = combine_text(subject, description);
        let priority = rule_priority(&text);

        match classify_with_chat(chat, subject, description, self.config.max_topics).await {
            Ok(labels) => Classification {
                topic_tags: labels.topic_tags,
                sentiment: labels.sentiment,
                priority,
                confidence: labels.confidence,
                reasoning: format!("{} ({})", labels.reasoning, priority_reason(priority)),
            },
            Err(e) if e.kind() == ModelErrorKind::Parse => {
                warn!("generative classification unparseable: {}", e);
                Classification {
                    topic_tags: vec![Topic::Product],
                    sentiment: Sentiment::Neutral,
                    priority,
                    confidence: CONFIDENCE_PARSE_FAILURE,
                    reasoning: format!("LLM response parsing failed: {}", e),
                }
            }
            Err(e) => {
                warn!("generative classification failed, using rules: {}", e);
                let reason = if e.is_quota() {
                    format!("LLM quota exceeded, using rule-based classification: {}", e)
                } else {
                    format!("LLM unavailable, using rule-based classification: {}", e)
                };
                Classification {
                    topic_tags: vec![rule_topic(&text)],
                    sentiment: rule_sentiment(&text),
                    priority,
                    confidence: CONFIDENCE_RULES,
                    reasoning: format!("{}; {}", reason, priority_reason(priority)),
                }
            }
        }
    }
}

fn fallback_reason(status: &RoleStatus) -> String {
    match status {
        RoleStatus::Fallback(reason) => format!("fallback: {}", reason),
        RoleStatus::Model(name) => format!("selected over {}", name),
    }
}

fn priority_reason(priority: Priority) -> String {
    format!("priority {} from keyword tiers", priority.label())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;

    use crate::errors::{ModelError, ModelResult};
    use crate::models::{SentimentClassifier, TopicClassifier};

    struct FixedTopic(Vec<Topic>);

    impl TopicClassifier for FixedTopic {
        fn name(&self) -> &str {
            "fixed-topic"
        }

        fn classify(&self, _text: &str) -> ModelResult<Vec<Topic>> {
            Ok(self.0.clone())
        }
    }

    struct FailingTopic;

    impl TopicClassifier for FailingTopic {
        fn name(&self) -> &str {
            "failing-topic"
        }

        fn classify(&self, _text: &str) -> ModelResult<Vec<Topic>> {
            Err(ModelError::inference("failing-topic", "tensor shape mismatch"))
        }
    }

    struct FixedSentiment(Sentiment);

    #[async_trait]
    impl SentimentClassifier for FixedSentiment {
        fn name(&self) -> &str {
            "fixed-sentiment"
        }

        async fn classify(&self, _text: &str) -> ModelResult<Sentiment> {
            Ok(self.0)
        }
    }

    fn classifier(models: ModelContext) -> TicketClassifier {
        TicketClassifier::new(models, &ClassifierConfig::default())
    }

    #[tokio::test]
    async fn test_rule_based_classification() {
        let result = TicketClassifier::rule_based()
            .classify(
                "Connecting Snowflake to Atlan",
                "I keep getting authentication errors. This is frustrating!",
            )
            .await;
        assert_eq!(result.topic_tags, vec![Topic::Connector]);
        assert_eq!(result.priority, Priority::P1);
        assert_eq!(result.confidence, CONFIDENCE_RULES);
        assert!(result.reasoning.contains("keyword rules"));
    }

    #[tokio::test]
    async fn test_both_models_confidence() {
        let models = ModelContext::builder()
            .topic(Ok(Arc::new(FixedTopic(vec![Topic::Lineage, Topic::Connector])) as Arc<dyn TopicClassifier>))
            .sentiment(Ok(Arc::new(FixedSentiment(Sentiment::Curious)) as Arc<dyn SentimentClassifier>))
            .build();
        let result = classifier(models).classify("Lineage", "How does it work?").await;
        assert_eq!(result.topic_tags, vec![Topic::Lineage, Topic::Connector]);
        assert_eq!(result.sentiment, Sentiment::Curious);
        assert_eq!(result.confidence, CONFIDENCE_BOTH_MODELS);
    }

    #[tokio::test]
    async fn test_model_topics_deduplicated_and_capped() {
        let models = ModelContext::builder()
            .topic(Ok(Arc::new(FixedTopic(vec![
                Topic::Lineage,
                Topic::Lineage,
                Topic::Connector,
                Topic::Glossary,
            ])) as Arc<dyn TopicClassifier>))
            .build();
        let result = classifier(models).classify("Lineage", "Upstream tables").await;
        assert_eq!(result.topic_tags, vec![Topic::Lineage, Topic::Connector]);
    }

    #[tokio::test]
    async fn test_empty_model_topics_become_product() {
        let models = ModelContext::builder()
            .topic(Ok(Arc::new(FixedTopic(Vec::new())) as Arc<dyn TopicClassifier>))
            .build();
        let result = classifier(models).classify("Hello", "Anything new?").await;
        assert_eq!(result.topic_tags, vec![Topic::Product]);
    }

    #[tokio::test]
    async fn test_one_model_confidence() {
        let models = ModelContext::builder()
            .sentiment(Ok(Arc::new(FixedSentiment(Sentiment::Neutral)) as Arc<dyn SentimentClassifier>))
            .build();
        let result = classifier(models).classify("Glossary", "Export terms").await;
        assert_eq!(result.confidence, CONFIDENCE_ONE_MODEL);
    }

    #[tokio::test]
    async fn test_per_call_topic_failure_falls_back() {
        let models = ModelContext::builder()
            .topic(Ok(Arc::new(FailingTopic) as Arc<dyn TopicClassifier>))
            .build();
        let result = classifier(models).classify("Okta login", "SSO is broken").await;
        assert_eq!(result.topic_tags, vec![Topic::Sso]);
        assert_eq!(result.priority, Priority::P0);
        assert!(result.reasoning.contains("tensor shape mismatch"));
    }

    #[tokio::test]
    async fn test_topic_load_failure_is_reported() {
        let models = ModelContext::builder()
            .topic(Err(ModelError::unavailable("zero-shot-topic", "download failed")))
            .build();
        let result = classifier(models).classify("Question", "Where are docs?").await;
        assert!(!result.topic_tags.is_empty());
        assert!(result.reasoning.contains("fallback"));
        assert!(result.reasoning.contains("download failed"));
    }

    #[tokio::test]
    async fn test_generative_without_chat_uses_pipeline() {
        let config = ClassifierConfig {
            strategy: ClassificationStrategy::Generative,
            ..ClassifierConfig::default()
        };
        let result = TicketClassifier::new(ModelContext::rule_based(), &config)
            .classify("API", "Python SDK question")
            .await;
        assert_eq!(result.topic_tags, vec![Topic::ApiSdk]);
        assert_eq!(result.confidence, CONFIDENCE_RULES);
    }

    #[tokio::test]
    async fn test_classify_many_keeps_order() {
        let tickets = vec![
            Ticket::new("Lineage missing", "Upstream tables are gone"),
            Ticket::new("SSO", "Okta setup"),
            Ticket::new("Hello", "Dark mode?"),
        ];
        let results = TicketClassifier::rule_based().classify_many(&tickets).await;
        let primaries: Vec<Topic> = results.iter().map(|r| r.classification.primary_topic()).collect();
        assert_eq!(primaries, vec![Topic::Lineage, Topic::Sso, Topic::Product]);
        assert_eq!(results[1].ticket.subject, "SSO");
    }
}
