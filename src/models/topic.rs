//! Topic classification backends

use std::sync::Arc;

use crate::classifier::rules::rule_topic;
use crate::errors::{ModelError, ModelResult};
use crate::models::embedding::{cosine_similarity, Embedder};
use crate::types::Topic;

/// Softmax temperature applied to cosine similarities
pub const ZERO_SHOT_TEMPERATURE: f32 = 0.05;

/// Assigns topic tags to ticket text
pub trait TopicClassifier: Send + Sync {
    fn name(&self) -> &str;

    /// True for the deterministic keyword backend
    fn is_rule_based(&self) -> bool {
        false
    }

    /// Non-empty, ordered topic tags for `text`
    fn classify(&self, text: &str) -> ModelResult<Vec<Topic>>;
}

/// Zero-shot classifier scoring each label hypothesis against the ticket
///
/// Label scores are a softmax over ticket/hypothesis cosine similarities.
pub struct ZeroShotTopicClassifier {
    embedder: Arc<dyn Embedder>,
    hypotheses: Vec<(Topic, Vec<f32>)>,
    threshold: f32,
    max_topics: usize,
    name: String,
}

impl ZeroShotTopicClassifier {
    /// Embed every label hypothesis up front
    pub fn new(embedder: Arc<dyn Embedder>, threshold: f32, max_topics: usize) -> ModelResult<Self> {
        let texts: Vec<&str> = Topic::ALL.iter().map(|t| t.hypothesis()).collect();
        let vectors = embedder
            .embed_batch(&texts)
            .map_err(|e| ModelError::unavailable("zero-shot-topic", e))?;
        if vectors.len() != Topic::ALL.len() {
            return Err(ModelError::unavailable(
                "zero-shot-topic",
                format!("expected {} hypothesis vectors, got {}", Topic::ALL.len(), vectors.len()),
            ));
        }

        let name = format!("zero-shot-topic:{}", embedder.name());
        Ok(Self {
            hypotheses: Topic::ALL.iter().copied().zip(vectors).collect(),
            embedder,
            threshold,
            max_topics: max_topics.max(1),
            name,
        })
    }

    /// Softmax score per label, in label order
    pub fn scores(&self, text: &str) -> ModelResult<Vec<(Topic, f32)>> {
        let query = self.embedder.embed(text)?;
        let logits: Vec<f32> = self
            .hypotheses
            .iter()
            .map(|(_, v)| cosine_similarity(&query, v) / ZERO_SHOT_TEMPERATURE)
            .collect();
        let probabilities = softmax(&logits);

        Ok(self
            .hypotheses
            .iter()
            .map(|(topic, _)| *topic)
            .zip(probabilities)
            .collect())
    }
}

impl TopicClassifier for ZeroShotTopicClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn classify(&self, text: &str) -> ModelResult<Vec<Topic>> {
        let scores = self.scores(text)?;
        Ok(select_topics(scores, self.threshold, self.max_topics))
    }
}

/// Labels above `threshold`, best first, at most `max_topics`; `Product` if none
pub fn select_topics(mut scores: Vec<(Topic, f32)>, threshold: f32, max_topics: usize) -> Vec<Topic> {
    scores.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    let selected: Vec<Topic> = scores
        .into_iter()
        .filter(|(_, score)| *score > threshold)
        .take(max_topics)
        .map(|(topic, _)| topic)
        .collect();

    if selected.is_empty() {
        vec![Topic::Product]
    } else {
        selected
    }
}

fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|l| (l - max).exp()).collect();
    let sum: f32 = exps.iter().sum();
    if sum == 0.0 || !sum.is_finite() {
        return vec![0.0; logits.len()];
    }
    exps.into_iter().map(|e| e / sum).collect()
}

/// Keyword rules; always a single tag
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordTopicClassifier;

impl TopicClassifier for KeywordTopicClassifier {
    fn name(&self) -> &str {
        "keyword-topic"
    }

    fn is_rule_based(&self) -> bool {
        true
    }

    fn classify(&self, text: &str) -> ModelResult<Vec<Topic>> {
        Ok(vec![rule_topic(text)])
    }
}
