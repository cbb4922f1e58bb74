//! Context assembly for answer composition

use serde::{Deserialize, Serialize};

use crate::types::{dedup_sources, RetrievalResult};

/// System prompt for the chat answer generator
pub const ANSWER_SYSTEM_PROMPT: &str = "You are a helpful customer support assistant for Atlan, \
a data catalog and governance platform.

Answer customer questions using the provided documentation context. Follow these guidelines:

1. Provide accurate, helpful answers based on the documentation
2. If the documentation does not contain enough information, say so clearly
3. Structure your response clearly with actionable steps when applicable
4. Be concise but comprehensive
5. Use a friendly, professional tone

Always base your answer on the provided context. Do not make up information not found in the documentation.";

/// Retrieved chunks ready for an answer generator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssembledContext {
    /// Chunk texts joined by blank lines
    pub text: String,
    /// Deduplicated sources, first-seen order
    pub sources: Vec<String>,
    pub chunk_count: usize,
}

impl AssembledContext {
    /// Assemble context from ranked retrieval results
    pub fn from_results(results: &[RetrievalResult]) -> Self {
        let text = results
            .iter()
            .map(|r| r.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");

        Self {
            text,
            sources: dedup_sources(results.iter().map(|r| r.source.as_str())),
            chunk_count: results.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.chunk_count == 0
    }
}

/// User prompt embedding the question and its documentation context
pub fn answer_user_prompt(query: &str, context: &str) -> String {
    format!(
        "Based on the following documentation context, please answer this customer question:\n\n\
         Question: {}\n\n\
         Documentation Context:\n{}\n\n\
         Please provide a comprehensive answer that helps the customer resolve their question.",
        query, context
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingestion::DocCategory;

    fn result(text: &str, source: &str, rank: usize) -> RetrievalResult {
        RetrievalResult {
            text: text.to_string(),
            source: source.to_string(),
            category: DocCategory::Sso,
            score: 1.0 / rank as f32,
            rank,
        }
    }

    #[test]
    fn test_context_joins_chunks_and_dedups_sources() {
        let results = vec![
            result("first chunk", "a", 1),
            result("second chunk", "b", 2),
            result("third chunk", "a", 3),
        ];
        let context = AssembledContext::from_results(&results);
        assert_eq!(context.text, "first chunk\n\nsecond chunk\n\nthird chunk");
        assert_eq!(context.sources, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(context.chunk_count, 3);
    }

    #[test]
    fn test_empty_context() {
        let context = AssembledContext::from_results(&[]);
        assert!(context.is_empty());
        assert!(context.sources.is_empty());
    }

    #[test]
    fn test_user_prompt_contains_query_and_context() {
        let prompt = answer_user_prompt("How do I log in?", "Use SSO.");
        assert!(prompt.contains("Question: How do I log in?"));
        assert!(prompt.contains("Use SSO."));
    }
}
