//! End-to-end ticket handling: classify, then answer or route

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::classifier::TicketClassifier;
use crate::config::Config;
use crate::errors::Result;
use crate::knowledge::KnowledgeStoreBuilder;
use crate::models::ModelContext;
use crate::rag::{routing_response, should_use_rag, ResponseGenerator, Retriever};
use crate::types::{combine_text, Classification, RAGResponse, Ticket};

/// Classification plus the answer or routing notice it led to
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageOutcome {
    pub ticket: Ticket,
    pub classification: Classification,
    pub response: RAGResponse,
}

impl TriageOutcome {
    pub fn was_routed(&self) -> bool {
        !should_use_rag(&self.classification.topic_tags)
    }
}

pub struct TriageService {
    classifier: TicketClassifier,
    responder: ResponseGenerator,
}

impl TriageService {
    pub fn new(classifier: TicketClassifier, responder: ResponseGenerator) -> Self {
        Self {
            classifier,
            responder,
        }
    }

    /// Load models, build the knowledge store, and wire everything up
    ///
    /// Fails only on invalid chunking settings.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let models = ModelContext::load(config).await;
        Self::with_models(config, models).await
    }

    /// Wire up around an existing model context
    pub async fn with_models(config: &Config, models: ModelContext) -> Result<Self> {
        let store = KnowledgeStoreBuilder::new(config)
            .embedder(models.embedder())
            .build()
            .await?;
        info!(chunks = store.len(), vectors = store.has_vectors(), "knowledge store ready");

        let retriever = Retriever::new(Arc::new(store), &config.retrieval);
        Ok(Self::new(
            TicketClassifier::new(models.clone(), &config.classifier),
            ResponseGenerator::new(retriever, models),
        ))
    }

    pub fn classifier(&self) -> &TicketClassifier {
        &self.classifier
    }

    pub fn responder(&self) -> &ResponseGenerator {
        &self.responder
    }

    /// Classify a ticket, then answer it from documentation or route it
    pub async fn handle(&self, ticket: &Ticket) -> TriageOutcome {
        let classification = self
            .classifier
            .classify(&ticket.subject, &ticket.description)
            .await;

        let response = if should_use_rag(&classification.topic_tags) {
            let query = combine_text(&ticket.subject, &ticket.description);
            self.responder
                .generate_response(&query, &classification.topic_tags)
                .await
        } else {
            routing_response(&classification.topic_tags, classification.priority)
        };

        TriageOutcome {
            ticket: ticket.clone(),
            classification,
            response,
        }
    }

    /// Handle tickets sequentially, keeping input order
    pub async fn handle_many(&self, tickets: &[Ticket]) -> Vec<TriageOutcome> {
        let mut outcomes = Vec::with_capacity(tickets.len());
        for ticket in tickets {
            outcomes.push(self.handle(ticket).await);
        }
        outcomes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Priority, Topic};

    async fn offline_service() -> TriageService {
        TriageService::with_models(&Config::offline(), ModelContext::rule_based())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_connector_ticket_is_routed() {
        let service = offline_service().await;
        let outcome = service
            .handle(&Ticket::new(
                "Connecting Snowflake to Atlan",
                "I keep getting authentication errors.",
            ))
            .await;
        assert!(outcome.was_routed());
        assert!(outcome.classification.topic_tags.contains(&Topic::Connector));
        assert!(outcome.response.answer.contains("Data Integration team"));
    }

    #[tokio::test]
    async fn test_p0_routing_carries_escalation() {
        let service = offline_service().await;
        let outcome = service
            .handle(&Ticket::new("Lineage broken", "Upstream lineage is down for the demo tomorrow"))
            .await;
        assert_eq!(outcome.classification.priority, Priority::P0);
        assert!(outcome.response.answer.contains("escalated"));
    }

    #[tokio::test]
    async fn test_sso_question_is_answered() {
        let service = offline_service().await;
        let outcome = service
            .handle(&Ticket::new("SSO", "How do I set up SSO with Okta?"))
            .await;
        assert!(!outcome.was_routed());
        assert!(!outcome.response.sources.is_empty());
        assert!(outcome.response.confidence > 0.0);
    }

    #[tokio::test]
    async fn test_handle_many_keeps_order() {
        let service = offline_service().await;
        let tickets = vec![
            Ticket::new("Glossary", "Bulk import terms"),
            Ticket::new("Snowflake", "connection fails"),
        ];
        let outcomes = service.handle_many(&tickets).await;
        assert_eq!(outcomes[0].ticket.subject, "Glossary");
        assert_eq!(outcomes[1].ticket.subject, "Snowflake");
    }
}
