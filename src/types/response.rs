//! Retrieval and answer types

use serde::{Deserialize, Serialize};

use crate::ingestion::DocCategory;

/// One chunk returned by the retriever
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalResult {
    pub text: String,
    pub source: String,
    pub category: DocCategory,
    pub score: f32,
    /// 1-based position in the result list
    pub rank: usize,
}

/// Answer (or routing notice) returned to the UI layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RAGResponse {
    pub answer: String,
    /// Deduplicated, in first-seen order
    pub sources: Vec<String>,
    pub confidence: f32,
    pub reasoning: String,
}

/// Deduplicate sources while keeping the order they were first seen
pub fn dedup_sources<'a>(sources: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for source in sources {
        if !seen.iter().any(|s| s == source) {
            seen.push(source.to_string());
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_sources_keeps_first_seen_order() {
        let sources = dedup_sources(["b", "a", "b", "c", "a"]);
        assert_eq!(sources, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_rag_response_field_names() {
        let response = RAGResponse {
            answer: "x".to_string(),
            sources: vec![],
            confidence: 0.0,
            reasoning: "none".to_string(),
        };
        let value = serde_json::to_value(&response).unwrap();
        assert!(value.get("answer").is_some());
        assert!(value.get("sources").is_some());
    }
}
