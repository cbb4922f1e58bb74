//! Classification vocabulary and result types
//!
//! Topic, sentiment, and priority are closed vocabularies. Their serialized
//! labels are part of the contract consumed by the UI layer and must stay
//! stable.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Topic tag from the fixed support vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topic {
    #[serde(rename = "How-to")]
    HowTo,
    #[serde(rename = "Product")]
    Product,
    #[serde(rename = "Connector")]
    Connector,
    #[serde(rename = "Lineage")]
    Lineage,
    #[serde(rename = "API/SDK")]
    ApiSdk,
    #[serde(rename = "SSO")]
    Sso,
    #[serde(rename = "Glossary")]
    Glossary,
    #[serde(rename = "Best practices")]
    BestPractices,
    #[serde(rename = "Sensitive data")]
    SensitiveData,
}

impl Topic {
    /// Every topic, in vocabulary order
    pub const ALL: [Topic; 9] = [
        Topic::HowTo,
        Topic::Product,
        Topic::Connector,
        Topic::Lineage,
        Topic::ApiSdk,
        Topic::Sso,
        Topic::Glossary,
        Topic::BestPractices,
        Topic::SensitiveData,
    ];

    /// Stable display label
    pub fn label(&self) -> &'static str {
        match self {
            Topic::HowTo => "How-to",
            Topic::Product => "Product",
            Topic::Connector => "Connector",
            Topic::Lineage => "Lineage",
            Topic::ApiSdk => "API/SDK",
            Topic::Sso => "SSO",
            Topic::Glossary => "Glossary",
            Topic::BestPractices => "Best practices",
            Topic::SensitiveData => "Sensitive data",
        }
    }

    /// Natural-language hypothesis used by the zero-shot topic model
    pub fn hypothesis(&self) -> &'static str {
        match self {
            Topic::HowTo => "How-to questions and tutorials",
            Topic::Product => "Product functionality and features",
            Topic::Connector => "Data source connector issues",
            Topic::Lineage => "Data lineage and dependency tracking",
            Topic::ApiSdk => "API and SDK usage questions",
            Topic::Sso => "Single Sign-On authentication issues",
            Topic::Glossary => "Business glossary and term management",
            Topic::BestPractices => "Best practices and recommendations",
            Topic::SensitiveData => "Sensitive data classification and compliance",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Topic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Topic::ALL
            .iter()
            .copied()
            .find(|t| t.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("Unknown topic tag: {}", wanted))
    }
}

/// Customer sentiment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Angry,
    Frustrated,
    Urgent,
    Curious,
    Neutral,
}

impl Sentiment {
    pub const ALL: [Sentiment; 5] = [
        Sentiment::Angry,
        Sentiment::Frustrated,
        Sentiment::Urgent,
        Sentiment::Curious,
        Sentiment::Neutral,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Sentiment::Angry => "Angry",
            Sentiment::Frustrated => "Frustrated",
            Sentiment::Urgent => "Urgent",
            Sentiment::Curious => "Curious",
            Sentiment::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Sentiment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Sentiment::ALL
            .iter()
            .copied()
            .find(|v| v.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("Unknown sentiment: {}", wanted))
    }
}

/// Raw 3-way polarity produced by a sentiment model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Negative,
    Neutral,
    Positive,
}

impl FromStr for Polarity {
    type Err = String;

    /// Accepts plain labels as well as `LABEL_0..2` style model outputs
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s
            .trim()
            .trim_matches(|c: char| !c.is_ascii_alphanumeric() && c != '_')
            .to_lowercase();
        match normalized.as_str() {
            "negative" | "label_0" => Ok(Polarity::Negative),
            "neutral" | "label_1" => Ok(Polarity::Neutral),
            "positive" | "label_2" => Ok(Polarity::Positive),
            other => Err(format!("Unknown polarity: {}", other)),
        }
    }
}

/// Ticket priority tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
    P0,
    P1,
    P2,
}

impl Priority {
    /// Human-readable label, e.g. `P0 (High)`
    pub fn label(&self) -> &'static str {
        match self {
            Priority::P0 => "P0 (High)",
            Priority::P1 => "P1 (Medium)",
            Priority::P2 => "P2 (Low)",
        }
    }

    /// Highest tier, which triggers escalation when routing
    pub fn is_highest(&self) -> bool {
        *self == Priority::P0
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Priority {
    type Err = String;

    /// Accepts `P1` as well as `P1 (Medium)`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let head = s.trim().get(..2).unwrap_or_default().to_ascii_uppercase();
        match head.as_str() {
            "P0" => Ok(Priority::P0),
            "P1" => Ok(Priority::P1),
            "P2" => Ok(Priority::P2),
            _ => Err(format!("Unknown priority: {}", s.trim())),
        }
    }
}

/// Result of classifying one ticket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    /// Ordered, non-empty, duplicate-free topic tags
    pub topic_tags: Vec<Topic>,
    pub sentiment: Sentiment,
    pub priority: Priority,
    /// Confidence in [0, 1]
    pub confidence: f32,
    pub reasoning: String,
}

impl Classification {
    /// Primary (first) topic tag
    pub fn primary_topic(&self) -> Topic {
        self.topic_tags.first().copied().unwrap_or(Topic::Product)
    }
}
