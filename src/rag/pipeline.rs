//! Response generation: answer from documentation, or route to a team

use tracing::{debug, warn};

use crate::models::generator::TemplateAnswerGenerator;
use crate::models::ModelContext;
use crate::rag::context::AssembledContext;
use crate::rag::retrieval::Retriever;
use crate::types::{Priority, RAGResponse, Topic};

/// Topics answered from documentation rather than routed
pub const RAG_TOPICS: [Topic; 6] = [
    Topic::HowTo,
    Topic::Product,
    Topic::BestPractices,
    Topic::ApiSdk,
    Topic::Sso,
    Topic::Glossary,
];

/// Source reported for routed tickets
pub const ROUTING_SOURCE: &str = "Internal Routing System";

pub const NO_RESULTS_ANSWER: &str = "I apologize, but I couldn't find relevant information to answer \
your question. Please check the Atlan documentation at https://docs.atlan.com/ or contact support.";

/// Confidence of a normally generated answer
pub const ANSWER_CONFIDENCE: f32 = 0.85;

/// Confidence of a template answer substituted after a quota refusal
pub const QUOTA_FALLBACK_CONFIDENCE: f32 = 0.75;

/// Confidence of a template answer substituted after any other failure
pub const FAILURE_FALLBACK_CONFIDENCE: f32 = 0.6;

/// Whether any tag is answered from documentation
pub fn should_use_rag(topic_tags: &[Topic]) -> bool {
    topic_tags.iter().any(|tag| RAG_TOPICS.contains(tag))
}

/// Routing notice keyed by the primary tag; never empty
pub fn generate_routing_message(topic_tags: &[Topic], priority: Priority) -> String {
    let mut message = match topic_tags.first() {
        Some(Topic::Connector) => "This ticket involves data connector issues and has been routed to our \
            Data Integration team. They specialize in troubleshooting connectivity problems and will \
            review your case promptly."
            .to_string(),
        Some(Topic::Lineage) => "This ticket relates to data lineage and has been routed to our \
            Data Lineage team. They will help you with lineage tracking and dependency mapping questions."
            .to_string(),
        Some(Topic::Glossary) => "This ticket concerns business glossary management and has been routed \
            to our Data Governance team. They will assist you with terminology and metadata management."
            .to_string(),
        Some(Topic::SensitiveData) => "This ticket involves sensitive data classification and has been \
            routed to our Data Security team. They specialize in compliance and data privacy matters."
            .to_string(),
        Some(other) => format!(
            "This ticket has been classified as '{}' and routed to the appropriate specialized team.",
            other
        ),
        None => "This ticket has been routed to the appropriate specialized team.".to_string(),
    };

    if priority.is_highest() {
        message.push_str(&format!(
            " Because it is marked {}, it has been escalated for immediate attention.",
            priority.label()
        ));
    }
    message
}

/// Routing notice wrapped as a response
pub fn routing_response(topic_tags: &[Topic], priority: Priority) -> RAGResponse {
    RAGResponse {
        answer: generate_routing_message(topic_tags, priority),
        sources: vec![ROUTING_SOURCE.to_string()],
        confidence: 1.0,
        reasoning: "Ticket routed to specialized team".to_string(),
    }
}

/// Decides between answering and routing, and composes the answer
#[derive(Debug, Clone)]
pub struct ResponseGenerator {
    retriever: Retriever,
    models: ModelContext,
}

impl ResponseGenerator {
    pub fn new(retriever: Retriever, models: ModelContext) -> Self {
        Self { retriever, models }
    }

    pub fn retriever(&self) -> &Retriever {
        &self.retriever
    }

    pub fn should_use_rag(&self, topic_tags: &[Topic]) -> bool {
        should_use_rag(topic_tags)
    }

    pub fn generate_routing_message(&self, topic_tags: &[Topic], priority: Priority) -> String {
        generate_routing_message(topic_tags, priority)
    }

    /// Answer `query` from documentation, or route it when its topics are not eligible
    ///
    /// Routing here carries no escalation clause; callers that know the ticket
    /// priority use [`routing_response`] directly.
    pub async fn generate_response(&self, query: &str, topic_tags: &[Topic]) -> RAGResponse {
        if !should_use_rag(topic_tags) {
            return routing_response(topic_tags, Priority::P2);
        }

        let results = self.retriever.retrieve(query, self.retriever.top_k());
        if results.is_empty() {
            return RAGResponse {
                answer: NO_RESULTS_ANSWER.to_string(),
                sources: Vec::new(),
                confidence: 0.0,
                reasoning: "No relevant content found".to_string(),
            };
        }

        let context = AssembledContext::from_results(&results);
        let generator = self.models.generator();
        debug!(chunks = context.chunk_count, generator = generator.name(), "composing answer");

        let (answer, confidence, reasoning) = match generator.generate(query, &context.text).await {
            Ok(answer) => (
                answer,
                ANSWER_CONFIDENCE,
                format!(
                    "Generated from {} relevant documentation chunks by {}",
                    context.chunk_count,
                    generator.name()
                ),
            ),
            Err(e) if e.is_quota() => {
                warn!("answer generator over quota, using template answer: {}", e);
                (
                    TemplateAnswerGenerator.compose(query, &context.text),
                    QUOTA_FALLBACK_CONFIDENCE,
                    format!(
                        "Answer generator quota exceeded ({}); composed from {} documentation chunks with templates",
                        e, context.chunk_count
                    ),
                )
            }
            Err(e) => {
                warn!("answer generator failed, using template answer: {}", e);
                (
                    TemplateAnswerGenerator.compose(query, &context.text),
                    FAILURE_FALLBACK_CONFIDENCE,
                    format!(
                        "Answer generator failed ({}); composed from {} documentation chunks with templates",
                        e, context.chunk_count
                    ),
                )
            }
        };

        RAGResponse {
            answer,
            sources: context.sources,
            confidence,
            reasoning,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;

    use crate::config::RetrievalConfig;
    use crate::errors::{ModelError, ModelResult};
    use crate::ingestion::{ChunkOrigin, DocCategory};
    use crate::knowledge::{Chunk, KnowledgeStore};
    use crate::models::AnswerGenerator;

    struct RefusingGenerator {
        error: ModelError,
    }

    #[async_trait]
    impl AnswerGenerator for RefusingGenerator {
        fn name(&self) -> &str {
            "refusing"
        }

        async fn generate(&self, _query: &str, _context: &str) -> ModelResult<String> {
            Err(self.error.clone())
        }
    }

    struct EchoGenerator;

    #[async_trait]
    impl AnswerGenerator for EchoGenerator {
        fn name(&self) -> &str {
            "echo"
        }

        async fn generate(&self, query: &str, _context: &str) -> ModelResult<String> {
            Ok(format!("answer to {}", query))
        }
    }

    fn responder(models: ModelContext) -> ResponseGenerator {
        let chunks = vec![
            Chunk {
                text: "Create a new SAML application in the OKTA admin console.".to_string(),
                source: "sso-doc".to_string(),
                category: DocCategory::Sso,
                origin: ChunkOrigin::Bundled,
            },
            Chunk {
                text: "Test the SSO integration with a user account.".to_string(),
                source: "sso-doc".to_string(),
                category: DocCategory::Sso,
                origin: ChunkOrigin::Bundled,
            },
        ];
        let store = Arc::new(KnowledgeStore::chunks_only(chunks));
        ResponseGenerator::new(Retriever::new(store, &RetrievalConfig::default()), models)
    }

    fn with_generator(generator: Arc<dyn AnswerGenerator>) -> ModelContext {
        ModelContext::builder().generator(Ok(generator)).build()
    }

    #[test]
    fn test_should_use_rag() {
        assert!(!should_use_rag(&[Topic::Connector]));
        assert!(should_use_rag(&[Topic::HowTo]));
        assert!(should_use_rag(&[Topic::Lineage, Topic::Glossary]));
        assert!(!should_use_rag(&[]));
    }

    #[test]
    fn test_routing_messages_name_teams() {
        assert!(generate_routing_message(&[Topic::Connector], Priority::P1).contains("Data Integration team"));
        assert!(generate_routing_message(&[Topic::Lineage], Priority::P1).contains("Data Lineage team"));
        assert!(generate_routing_message(&[Topic::Glossary], Priority::P1).contains("Data Governance team"));
        assert!(generate_routing_message(&[Topic::SensitiveData], Priority::P1).contains("Data Security team"));
        assert!(generate_routing_message(&[], Priority::P2).contains("appropriate specialized team"));
    }

    #[test]
    fn test_p0_routing_is_escalated() {
        let message = generate_routing_message(&[Topic::Connector], Priority::P0);
        assert!(message.contains("escalated"));
        assert!(!generate_routing_message(&[Topic::Connector], Priority::P1).contains("escalated"));
    }

    #[tokio::test]
    async fn test_ineligible_topics_are_routed() {
        let response = responder(ModelContext::rule_based())
            .generate_response("Snowflake fails", &[Topic::Connector])
            .await;
        assert_eq!(response.sources, vec![ROUTING_SOURCE.to_string()]);
        assert_eq!(response.confidence, 1.0);
        assert_eq!(response.reasoning, "Ticket routed to specialized team");
    }

    #[tokio::test]
    async fn test_no_results_answer() {
        let response = responder(ModelContext::rule_based())
            .generate_response("dark mode", &[Topic::Product])
            .await;
        assert_eq!(response.confidence, 0.0);
        assert!(response.sources.is_empty());
        assert_eq!(response.answer, NO_RESULTS_ANSWER);
    }

    #[tokio::test]
    async fn test_template_answer_from_context() {
        let response = responder(ModelContext::rule_based())
            .generate_response("How do I set up SSO with Okta?", &[Topic::Sso])
            .await;
        assert!(!response.answer.is_empty());
        assert_eq!(response.sources, vec!["sso-doc".to_string()]);
        assert_eq!(response.confidence, ANSWER_CONFIDENCE);
    }

    #[tokio::test]
    async fn test_llm_answer_used_when_available() {
        let response = responder(with_generator(Arc::new(EchoGenerator)))
            .generate_response("okta setup", &[Topic::Sso])
            .await;
        assert_eq!(response.answer, "answer to okta setup");
        assert_eq!(response.confidence, ANSWER_CONFIDENCE);
    }

    #[tokio::test]
    async fn test_quota_failure_degrades_to_template() {
        let generator = RefusingGenerator {
            error: ModelError::quota("openai:gpt", "HTTP 429"),
        };
        let response = responder(with_generator(Arc::new(generator)))
            .generate_response("How do I set up SSO with Okta?", &[Topic::Sso])
            .await;
        assert_eq!(response.confidence, QUOTA_FALLBACK_CONFIDENCE);
        assert!(response.reasoning.contains("quota"));
        assert!(response.answer.contains("OKTA"));
        assert!(!response.sources.is_empty());
    }

    #[tokio::test]
    async fn test_other_failure_degrades_to_template() {
        let generator = RefusingGenerator {
            error: ModelError::network("ollama:x", "connection refused"),
        };
        let response = responder(with_generator(Arc::new(generator)))
            .generate_response("okta setup", &[Topic::Sso])
            .await;
        assert_eq!(response.confidence, FAILURE_FALLBACK_CONFIDENCE);
        assert!(response.reasoning.contains("connection refused"));
    }
}
