//! Single-call chat classification
//!
//! The chat backend returns topic tags, sentiment and a confidence as JSON.
//! Priority from the model is ignored; the keyword tiers always decide it.

use serde::Deserialize;

use crate::errors::{ModelError, ModelResult};
use crate::models::chat::{ChatClient, ChatRequest};
use crate::types::{Sentiment, Topic};

const BACKEND: &str = "generative-classifier";

pub const CLASSIFY_SYSTEM_PROMPT: &str = "You are an assistant that classifies customer support \
tickets for Atlan, a data catalog and governance platform.

Classify each ticket by these criteria:

1. TOPIC TAGS (select multiple if applicable):
   - How-to: Basic usage questions and tutorials
   - Product: General product functionality and features
   - Connector: Issues with data source connectors (Snowflake, Databricks, Power BI, etc.)
   - Lineage: Data lineage and dependency tracking
   - API/SDK: API usage, SDK questions, developer tools
   - SSO: Single Sign-On and authentication issues
   - Glossary: Business glossary and term management
   - Best practices: Recommendations and best practices
   - Sensitive data: Data classification, PII detection, compliance

2. SENTIMENT (choose one): Frustrated, Curious, Angry, Neutral, Urgent

3. PRIORITY (choose one): P0 (High), P1 (Medium), P2 (Low)

Respond ONLY with valid JSON in this exact format:
{\"topic_tags\": [\"tag1\", \"tag2\"], \"sentiment\": \"value\", \"priority\": \"value\", \"confidence\": 0.85, \"reasoning\": \"Brief explanation\"}";

/// Sampling temperature for classification calls
pub const CLASSIFY_TEMPERATURE: f32 = 0.3;

/// Completion budget for classification calls
pub const CLASSIFY_MAX_TOKENS: u32 = 500;

/// Confidence assumed when the model omits one
const DEFAULT_MODEL_CONFIDENCE: f32 = 0.85;

/// Labels extracted from a chat classification
#[derive(Debug, Clone, PartialEq)]
pub struct GenerativeLabels {
    /// Known tags only, non-empty, capped
    pub topic_tags: Vec<Topic>,
    pub sentiment: Sentiment,
    pub confidence: f32,
    pub reasoning: String,
}

#[derive(Debug, Deserialize)]
struct RawLabels {
    #[serde(default)]
    topic_tags: Vec<String>,
    sentiment: String,
    #[serde(default)]
    confidence: Option<f32>,
    #[serde(default)]
    reasoning: Option<String>,
}

pub fn classify_user_prompt(subject: &str, description: &str) -> String {
    format!(
        "Please classify this support ticket:\n\nSubject: {}\nDescription: {}",
        subject, description
    )
}

/// Ask the chat backend to classify a ticket
pub async fn classify_with_chat(
    chat: &ChatClient,
    subject: &str,
    description: &str,
    max_topics: usize,
) -> ModelResult<GenerativeLabels> {
    let request = ChatRequest::new(CLASSIFY_SYSTEM_PROMPT, classify_user_prompt(subject, description))
        .with_temperature(CLASSIFY_TEMPERATURE)
        .with_max_tokens(CLASSIFY_MAX_TOKENS);

    let raw = chat.complete(&request).await?;
    parse_labels(&raw, max_topics)
}

/// Parse a JSON classification, tolerating a surrounding code fence
pub fn parse_labels(raw: &str, max_topics: usize) -> ModelResult<GenerativeLabels> {
    let body = strip_code_fence(raw);
    let labels: RawLabels =
        serde_json::from_str(body).map_err(|e| ModelError::parse(BACKEND, e))?;

    let sentiment: Sentiment = labels
        .sentiment
        .parse()
        .map_err(|e: String| ModelError::parse(BACKEND, e))?;

    let mut topic_tags: Vec<Topic> = Vec::new();
    for tag in labels.topic_tags.iter().filter_map(|t| t.parse::<Topic>().ok()) {
        if !topic_tags.contains(&tag) {
            topic_tags.push(tag);
        }
    }
    topic_tags.truncate(max_topics.max(1));
    if topic_tags.is_empty() {
        topic_tags.push(Topic::Product);
    }

    Ok(GenerativeLabels {
        topic_tags,
        sentiment,
        confidence: labels
            .confidence
            .filter(|c| c.is_finite())
            .unwrap_or(DEFAULT_MODEL_CONFIDENCE)
            .clamp(0.0, 1.0),
        reasoning: labels
            .reasoning
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| "No reasoning provided".to_string()),
    })
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    match trimmed.strip_prefix("```") {
        Some(rest) => {
            let rest = rest.strip_prefix("json").unwrap_or(rest);
            rest.strip_suffix("```").unwrap_or(rest).trim()
        }
        None => trimmed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ModelErrorKind;

    #[test]
    fn test_parse_valid_labels() {
        let raw = r#"{"topic_tags": ["Connector", "SSO", "Lineage"], "sentiment": "Frustrated",
                     "priority": "P0 (High)", "confidence": 0.92, "reasoning": "Auth failures"}"#;
        let labels = parse_labels(raw, 2).unwrap();
        assert_eq!(labels.topic_tags, vec![Topic::Connector, Topic::Sso]);
        assert_eq!(labels.sentiment, Sentiment::Frustrated);
        assert!((labels.confidence - 0.92).abs() < 1e-6);
        assert_eq!(labels.reasoning, "Auth failures");
    }

    #[test]
    fn test_unknown_tags_dropped_and_defaulted() {
        let raw = r#"{"topic_tags": ["Billing"], "sentiment": "neutral"}"#;
        let labels = parse_labels(raw, 2).unwrap();
        assert_eq!(labels.topic_tags, vec![Topic::Product]);
        assert_eq!(labels.sentiment, Sentiment::Neutral);
        assert_eq!(labels.confidence, DEFAULT_MODEL_CONFIDENCE);
    }

    #[test]
    fn test_code_fenced_json() {
        let raw = "```json\n{\"topic_tags\": [\"How-to\"], \"sentiment\": \"Curious\"}\n```";
        let labels = parse_labels(raw, 2).unwrap();
        assert_eq!(labels.topic_tags, vec![Topic::HowTo]);
    }

    #[test]
    fn test_malformed_json_is_parse_failure() {
        let err = parse_labels("Sure! The topic is Connector.", 2).unwrap_err();
        assert_eq!(err.kind(), ModelErrorKind::Parse);
    }

    #[test]
    fn test_unknown_sentiment_is_parse_failure() {
        let err = parse_labels(r#"{"topic_tags": [], "sentiment": "Ecstatic"}"#, 2).unwrap_err();
        assert_eq!(err.kind(), ModelErrorKind::Parse);
    }

    #[test]
    fn test_confidence_is_clamped() {
        let labels = parse_labels(r#"{"sentiment": "Urgent", "confidence": 7.0}"#, 2).unwrap();
        assert_eq!(labels.confidence, 1.0);
    }
}
