//! Answer generation backends

use async_trait::async_trait;

use crate::errors::ModelResult;
use crate::models::chat::{ChatClient, ChatRequest};
use crate::rag::context::{answer_user_prompt, ANSWER_SYSTEM_PROMPT};
use crate::rag::templates::compose_answer;

/// Turns a question plus documentation context into an answer
#[async_trait]
pub trait AnswerGenerator: Send + Sync {
    fn name(&self) -> &str;

    /// True for the deterministic template backend
    fn is_rule_based(&self) -> bool {
        false
    }

    async fn generate(&self, query: &str, context: &str) -> ModelResult<String>;
}

/// Answers through the chat backend
pub struct LlmAnswerGenerator {
    chat: ChatClient,
    temperature: f32,
    max_tokens: u32,
    name: String,
}

impl LlmAnswerGenerator {
    pub fn new(chat: ChatClient, temperature: f32, max_tokens: u32) -> Self {
        let name = format!("answer:{}", chat.backend_name());
        Self {
            chat,
            temperature,
            max_tokens,
            name,
        }
    }
}

#[async_trait]
impl AnswerGenerator for LlmAnswerGenerator {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, query: &str, context: &str) -> ModelResult<String> {
        let request = ChatRequest::new(ANSWER_SYSTEM_PROMPT, answer_user_prompt(query, context))
            .with_temperature(self.temperature)
            .with_max_tokens(self.max_tokens);

        let answer = self.chat.complete(&request).await?;
        Ok(answer.trim().to_string())
    }
}

/// Intent templates filled with extracted context sentences
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateAnswerGenerator;

impl TemplateAnswerGenerator {
    /// Synchronous form; cannot fail
    pub fn compose(&self, query: &str, context: &str) -> String {
        compose_answer(query, context)
    }
}

#[async_trait]
impl AnswerGenerator for TemplateAnswerGenerator {
    fn name(&self) -> &str {
        "template-answer"
    }

    fn is_rule_based(&self) -> bool {
        true
    }

    async fn generate(&self, query: &str, context: &str) -> ModelResult<String> {
        Ok(self.compose(query, context))
    }
}
