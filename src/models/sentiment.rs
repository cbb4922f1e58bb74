//! Sentiment classification backends

use async_trait::async_trait;

use crate::classifier::rules::{contains_any, rule_sentiment, ANGER_WORDS};
use crate::errors::{ModelError, ModelResult};
use crate::models::chat::{ChatClient, ChatRequest};
use crate::types::{Polarity, Sentiment};

const POLARITY_SYSTEM_PROMPT: &str = "You are a sentiment analysis model. \
Classify the sentiment of the customer message as exactly one word: \
negative, neutral, or positive. Reply with that single word only.";

/// Assigns a domain sentiment to ticket text
#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    fn name(&self) -> &str;

    /// True for the deterministic keyword backend
    fn is_rule_based(&self) -> bool {
        false
    }

    async fn classify(&self, text: &str) -> ModelResult<Sentiment>;
}

/// Map raw model polarity onto the domain sentiment set
///
/// Negative text is split into anger and frustration by keyword.
pub fn polarity_to_sentiment(polarity: Polarity, text: &str) -> Sentiment {
    match polarity {
        Polarity::Negative if contains_any(&text.to_lowercase(), ANGER_WORDS) => Sentiment::Angry,
        Polarity::Negative => Sentiment::Frustrated,
        Polarity::Positive => Sentiment::Curious,
        Polarity::Neutral => Sentiment::Neutral,
    }
}

/// First `max_chars` characters of `text`
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Polarity classification through the chat backend
pub struct LlmSentimentClassifier {
    chat: ChatClient,
    max_chars: usize,
    name: String,
}

impl LlmSentimentClassifier {
    pub fn new(chat: ChatClient, max_chars: usize) -> Self {
        let name = format!("polarity:{}", chat.backend_name());
        Self {
            chat,
            max_chars,
            name,
        }
    }
}

#[async_trait]
impl SentimentClassifier for LlmSentimentClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    async fn classify(&self, text: &str) -> ModelResult<Sentiment> {
        let snippet = truncate_chars(text, self.max_chars);
        let request = ChatRequest::new(POLARITY_SYSTEM_PROMPT, snippet)
            .with_temperature(0.0)
            .with_max_tokens(5);

        let raw = self.chat.complete(&request).await?;
        let first_word = raw.split_whitespace().next().unwrap_or_default();
        let polarity: Polarity = first_word
            .parse()
            .map_err(|e: String| ModelError::parse(&self.name, e))?;

        Ok(polarity_to_sentiment(polarity, text))
    }
}

/// Keyword rules
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordSentimentClassifier;

#[async_trait]
impl SentimentClassifier for KeywordSentimentClassifier {
    fn name(&self) -> &str {
        "keyword-sentiment"
    }

    fn is_rule_based(&self) -> bool {
        true
    }

    async fn classify(&self, text: &str) -> ModelResult<Sentiment> {
        Ok(rule_sentiment(text))
    }
}
