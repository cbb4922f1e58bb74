//! Chat completion client for the generative backend
//!
//! Speaks either Ollama `/api/chat` or an OpenAI-compatible
//! `/v1/chat/completions`. Every failure is mapped to a [`ModelError`] so the
//! caller can choose a fallback.

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{ChatProvider, GeneratorConfig};
use crate::errors::{DeskError, ModelError, ModelResult, Result};

/// Body fragments that mark a capacity or billing refusal
const QUOTA_MARKERS: &[&str] = &[
    "quota",
    "billing",
    "rate limit",
    "rate_limit",
    "insufficient_quota",
];

/// One chat exchange
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl ChatRequest {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            temperature: 0.3,
            max_tokens: 1000,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// HTTP chat client
#[derive(Debug, Clone)]
pub struct ChatClient {
    client: Client,
    provider: ChatProvider,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl ChatClient {
    /// Build a client from generator settings
    pub fn from_config(config: &GeneratorConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(DeskError::HttpError)?;

        Ok(Self {
            client,
            provider: config.provider,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn provider(&self) -> ChatProvider {
        self.provider
    }

    /// Backend name used in errors and reasoning
    pub fn backend_name(&self) -> String {
        match self.provider {
            ChatProvider::Ollama => format!("ollama:{}", self.model),
            ChatProvider::Openai => format!("openai:{}", self.model),
        }
    }

    /// Check that the backend answers at all
    pub async fn health_check(&self) -> ModelResult<()> {
        let url = match self.provider {
            ChatProvider::Ollama => format!("{}/api/version", self.base_url),
            ChatProvider::Openai => format!("{}/v1/models", self.base_url),
        };

        let response = self
            .authorized(self.client.get(&url))
            .send()
            .await
            .map_err(|e| ModelError::unavailable(self.backend_name(), e))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(ModelError::unavailable(
            self.backend_name(),
            format!("HTTP {}: {}", status, body.trim()),
        ))
    }

    /// Send one chat exchange and return the assistant text
    pub async fn complete(&self, request: &ChatRequest) -> ModelResult<String> {
        let backend = self.backend_name();
        let (url, body) = match self.provider {
            ChatProvider::Ollama => (
                format!("{}/api/chat", self.base_url),
                serde_json::to_value(OllamaChatRequest {
                    model: &self.model,
                    messages: messages(request),
                    stream: false,
                    options: OllamaOptions {
                        temperature: request.temperature,
                        num_predict: request.max_tokens,
                    },
                }),
            ),
            ChatProvider::Openai => (
                format!("{}/v1/chat/completions", self.base_url),
                serde_json::to_value(OpenAiChatRequest {
                    model: &self.model,
                    messages: messages(request),
                    temperature: request.temperature,
                    max_tokens: request.max_tokens,
                }),
            ),
        };
        let body = body.map_err(|e| ModelError::inference(&backend, e))?;

        debug!("Sending chat request to {}", url);
        let response = self
            .authorized(self.client.post(&url))
            .json(&body)
            .send()
            .await
            .map_err(|e| ModelError::network(&backend, e))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| ModelError::network(&backend, e))?;

        if !status.is_success() {
            return Err(classify_failure(&backend, status, &text));
        }

        let content = match self.provider {
            ChatProvider::Ollama => serde_json::from_str::<OllamaChatResponse>(&text)
                .map(|r| r.message.content),
            ChatProvider::Openai => serde_json::from_str::<OpenAiChatResponse>(&text).map(|r| {
                r.choices
                    .into_iter()
                    .next()
                    .map(|c| c.message.content)
                    .unwrap_or_default()
            }),
        }
        .map_err(|e| ModelError::parse(&backend, e))?;

        if content.trim().is_empty() {
            return Err(ModelError::parse(&backend, "empty completion"));
        }
        Ok(content)
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }
}

/// Map a non-2xx answer onto a model error
pub fn classify_failure(backend: &str, status: StatusCode, body: &str) -> ModelError {
    let lower = body.to_lowercase();
    if status == StatusCode::TOO_MANY_REQUESTS || QUOTA_MARKERS.iter().any(|m| lower.contains(m)) {
        ModelError::quota(backend, format!("HTTP {}: {}", status, body.trim()))
    } else {
        ModelError::network(backend, format!("HTTP {}: {}", status, body.trim()))
    }
}

fn messages(request: &ChatRequest) -> Vec<ChatMessage<'_>> {
    vec![
        ChatMessage {
            role: "system",
            content: &request.system,
        },
        ChatMessage {
            role: "user",
            content: &request.user,
        },
    ]
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

#[derive(Debug, Serialize)]
struct OpenAiChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: String,
}

#[derive(Debug, Deserialize)]
struct OllamaChatResponse {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAiChatResponse {
    choices: Vec<OpenAiChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: ResponseMessage,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ModelErrorKind;

    fn unreachable_config() -> GeneratorConfig {
        GeneratorConfig {
            base_url: "http://127.0.0.1:9/".to_string(),
            timeout_secs: 2,
            ..GeneratorConfig::default()
        }
    }

    #[test]
    fn test_client_from_config() {
        let client = ChatClient::from_config(&unreachable_config()).unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:9");
        assert_eq!(client.model(), "qwen2.5:7b-instruct");
        assert_eq!(client.backend_name(), "ollama:qwen2.5:7b-instruct");
    }

    #[test]
    fn test_classify_failure_quota() {
        let err = classify_failure("openai:gpt", StatusCode::TOO_MANY_REQUESTS, "slow down");
        assert_eq!(err.kind(), ModelErrorKind::QuotaExceeded);

        let err = classify_failure(
            "openai:gpt",
            StatusCode::FORBIDDEN,
            r#"{"error":{"code":"insufficient_quota"}}"#,
        );
        assert!(err.is_quota());

        let err = classify_failure("openai:gpt", StatusCode::PAYMENT_REQUIRED, "Billing hard limit");
        assert!(err.is_quota());
    }

    #[test]
    fn test_classify_failure_network() {
        let err = classify_failure("ollama:x", StatusCode::INTERNAL_SERVER_ERROR, "boom");
        assert_eq!(err.kind(), ModelErrorKind::Network);
    }

    #[test]
    fn test_request_builder() {
        let request = ChatRequest::new("sys", "user")
            .with_temperature(0.1)
            .with_max_tokens(50);
        assert_eq!(request.temperature, 0.1);
        assert_eq!(request.max_tokens, 50);
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_network_failure() {
        let client = ChatClient::from_config(&unreachable_config()).unwrap();
        let err = client
            .complete(&ChatRequest::new("sys", "hello"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ModelErrorKind::Network);

        let err = client.health_check().await.unwrap_err();
        assert_eq!(err.kind(), ModelErrorKind::Unavailable);
    }

    #[test]
    fn test_parse_ollama_response() {
        let body = r#"{"model":"m","message":{"role":"assistant","content":"hi"},"done":true}"#;
        let parsed: OllamaChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.message.content, "hi");
    }

    #[test]
    fn test_parse_openai_response() {
        let body = r#"{"choices":[{"index":0,"message":{"role":"assistant","content":"hello"}}]}"#;
        let parsed: OpenAiChatResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.choices[0].message.content, "hello");
    }
}
