//! Keyword rules shared by every classification path
//!
//! Matching is case-insensitive substring search over the combined ticket
//! text. Rule order matters: the first matching rule wins.

use crate::types::{Priority, Sentiment, Topic};

/// Topic rules in evaluation order
pub const TOPIC_RULES: [(Topic, &[&str]); 8] = [
    (
        Topic::Connector,
        &["connect", "connection", "connector", "snowflake", "databricks", "power bi"],
    ),
    (Topic::ApiSdk, &["api", "sdk", "python", "java", "endpoint"]),
    (Topic::Sso, &["sso", "authentication", "login", "okta", "saml"]),
    (Topic::Lineage, &["lineage", "dependency", "upstream", "downstream"]),
    (Topic::Glossary, &["glossary", "term", "definition"]),
    (
        Topic::SensitiveData,
        &["sensitive", "pii", "gdpr", "privacy", "compliance"],
    ),
    (Topic::HowTo, &["how to", "how do", "tutorial", "guide", "steps"]),
    (
        Topic::BestPractices,
        &["best practice", "recommendation", "optimize"],
    ),
];

/// Words that turn a negative polarity into anger
pub const ANGER_WORDS: &[&str] = &["angry", "furious", "outraged", "ridiculous"];

pub const FRUSTRATION_WORDS: &[&str] = &["frustrated", "annoyed", "disappointed", "disappointing"];

pub const URGENCY_WORDS: &[&str] = &["urgent", "asap", "immediately", "critical"];

pub const CURIOSITY_WORDS: &[&str] = &["curious", "wondering", "interested", "question"];

/// P0 tier, checked first
pub const P0_KEYWORDS: &[&str] = &[
    "urgent",
    "asap",
    "immediately",
    "critical",
    "broken",
    "down",
    "emergency",
    "blocking",
    "can't work",
    "stopped working",
    "demo tomorrow",
    "executive team",
    "compliance",
];

/// P1 tier, checked when no P0 keyword matched
pub const P1_KEYWORDS: &[&str] = &[
    "issue",
    "problem",
    "error",
    "not working",
    "failed",
    "failing",
    "incorrect",
    "missing",
    "unable",
    "can't",
    "doesn't work",
];

/// Whether lowercase `text` contains any of `words`
pub fn contains_any(text: &str, words: &[&str]) -> bool {
    words.iter().any(|word| text.contains(word))
}

/// First matching topic rule, `Product` otherwise
pub fn rule_topic(text: &str) -> Topic {
    let lower = text.to_lowercase();
    TOPIC_RULES
        .iter()
        .find(|(_, words)| contains_any(&lower, words))
        .map(|(topic, _)| *topic)
        .unwrap_or(Topic::Product)
}

/// First matching sentiment rule, `Neutral` otherwise
pub fn rule_sentiment(text: &str) -> Sentiment {
    let lower = text.to_lowercase();
    if contains_any(&lower, ANGER_WORDS) {
        Sentiment::Angry
    } else if contains_any(&lower, FRUSTRATION_WORDS) {
        Sentiment::Frustrated
    } else if contains_any(&lower, URGENCY_WORDS) {
        Sentiment::Urgent
    } else if contains_any(&lower, CURIOSITY_WORDS) {
        Sentiment::Curious
    } else {
        Sentiment::Neutral
    }
}

/// Keyword-tier priority; independent of every model
pub fn rule_priority(text: &str) -> Priority {
    let lower = text.to_lowercase();
    if contains_any(&lower, P0_KEYWORDS) {
        Priority::P0
    } else if contains_any(&lower, P1_KEYWORDS) {
        Priority::P1
    } else {
        Priority::P2
    }
}
