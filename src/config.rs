//! Configuration management for supportdesk
//!
//! Provides TOML-based configuration with defaults, environment overrides,
//! and validation.
//! Location: ~/.supportdesk/config.toml

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::{DeskError, Result};

/// Complete configuration for supportdesk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub generator: GeneratorConfig,
    pub embedding: EmbeddingConfig,
    pub retrieval: RetrievalConfig,
    pub classifier: ClassifierConfig,
    pub scrape: ScrapeConfig,
}

/// Chat API dialect spoken by the generative backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatProvider {
    /// Ollama `/api/chat`
    Ollama,
    /// OpenAI-compatible `/v1/chat/completions`
    Openai,
}

/// Generative (chat) backend configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub enabled: bool,
    pub provider: ChatProvider,
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

/// Sentence embedding backend configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub enabled: bool,
    /// HuggingFace repository holding config.json, tokenizer.json and model.safetensors
    pub model_id: String,
    pub batch_size: usize,
}

/// Chunking and retrieval configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub top_k: usize,
    /// Vector hits scoring below this are dropped
    pub similarity_threshold: f32,
}

/// How tickets are classified when models are available
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationStrategy {
    /// Separate topic and sentiment models, rule-based priority
    Pipeline,
    /// Single structured chat completion, rule-based priority
    Generative,
}

/// Ticket classifier configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    pub strategy: ClassificationStrategy,
    /// Minimum topic-model score for a tag to be kept
    pub confidence_threshold: f32,
    pub max_topics: usize,
    /// Text passed to the sentiment model is truncated to this many chars
    pub sentiment_max_chars: usize,
}

/// Documentation scraping configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    pub enabled: bool,
    pub timeout_secs: u64,
    /// Fixed pause between successive fetches
    pub delay_ms: u64,
    /// Extracted page text is truncated to this many chars
    pub max_chars: usize,
    pub user_agent: String,
    /// Category key (e.g. `api_sdk`) to page URLs
    pub urls: BTreeMap<String, Vec<String>>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            provider: ChatProvider::Ollama,
            base_url: "http://127.0.0.1:11434".to_string(),
            model: "qwen2.5:7b-instruct".to_string(),
            api_key: None,
            temperature: 0.3,
            max_tokens: 1000,
            timeout_secs: 30,
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model_id: "sentence-transformers/all-MiniLM-L6-v2".to_string(),
            batch_size: 32,
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            chunk_size: 500,
            chunk_overlap: 50,
            top_k: 3,
            similarity_threshold: 0.0,
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            strategy: ClassificationStrategy::Pipeline,
            confidence_threshold: 0.3,
            max_topics: 2,
            sentiment_max_chars: 512,
        }
    }
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        let docs = "https://docs.atlan.com/".to_string();
        let developer = "https://developer.atlan.com/".to_string();
        let mut urls = BTreeMap::new();
        urls.insert("product".to_string(), vec![docs.clone()]);
        urls.insert("api_sdk".to_string(), vec![developer.clone()]);
        urls.insert("how_to".to_string(), vec![docs.clone()]);
        urls.insert("sso".to_string(), vec![docs.clone()]);
        urls.insert("best_practices".to_string(), vec![docs.clone()]);
        urls.insert("glossary".to_string(), vec![docs, developer]);

        Self {
            enabled: true,
            timeout_secs: 10,
            delay_ms: 1000,
            max_chars: 8000,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36".to_string(),
            urls,
        }
    }
}

impl GeneratorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl ScrapeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Config {
    /// Config that never touches the network or downloads models
    pub fn offline() -> Self {
        let mut config = Config::default();
        config.generator.enabled = false;
        config.embedding.enabled = false;
        config.scrape.enabled = false;
        config
    }

    /// Load configuration from file or defaults, then apply process env overrides
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let mut config = if let Some(config_path) = path {
            Self::read_file(&config_path)?
        } else {
            Self::read_default()?
        };

        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let config = Self::read_file(path)?;
        config.validate()?;
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| DeskError::ConfigError(format!("Failed to read config: {}", e)))?;

        toml::from_str(&contents)
            .map_err(|e| DeskError::ConfigError(format!("Failed to parse config: {}", e)))
    }

    /// Standard location if present, built-in defaults otherwise
    fn read_default() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::read_file(&path),
            _ => Ok(Config::default()),
        }
    }

    /// `~/.supportdesk/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".supportdesk").join("config.toml"))
    }

    /// Overlay environment-style settings using `lookup` as the variable source
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(model) = lookup("SUPPORTDESK_MODEL") {
            self.generator.model = model;
        }
        if let Some(url) = lookup("SUPPORTDESK_GENERATOR_URL") {
            self.generator.base_url = url;
        }
        if let Some(provider) = lookup("SUPPORTDESK_PROVIDER") {
            self.generator.provider = match provider.trim().to_lowercase().as_str() {
                "ollama" => ChatProvider::Ollama,
                "openai" => ChatProvider::Openai,
                other => {
                    return Err(DeskError::ConfigError(format!(
                        "Invalid SUPPORTDESK_PROVIDER: {}",
                        other
                    )))
                }
            };
        }
        if let Some(key) = lookup("SUPPORTDESK_API_KEY").or_else(|| lookup("OPENAI_API_KEY")) {
            if !key.trim().is_empty() {
                self.generator.api_key = Some(key);
            }
        }
        if let Some(value) = lookup("SUPPORTDESK_CHUNK_SIZE") {
            self.retrieval.chunk_size = parse_env("SUPPORTDESK_CHUNK_SIZE", &value)?;
        }
        if let Some(value) = lookup("SUPPORTDESK_CHUNK_OVERLAP") {
            self.retrieval.chunk_overlap = parse_env("SUPPORTDESK_CHUNK_OVERLAP", &value)?;
        }
        if let Some(value) = lookup("SUPPORTDESK_TOP_K") {
            self.retrieval.top_k = parse_env("SUPPORTDESK_TOP_K", &value)?;
        }
        if let Some(value) = lookup("SUPPORTDESK_SIMILARITY_THRESHOLD") {
            self.retrieval.similarity_threshold =
                parse_env("SUPPORTDESK_SIMILARITY_THRESHOLD", &value)?;
        }
        if let Some(value) = lookup("SUPPORTDESK_CONFIDENCE_THRESHOLD") {
            self.classifier.confidence_threshold =
                parse_env("SUPPORTDESK_CONFIDENCE_THRESHOLD", &value)?;
        }
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.retrieval.chunk_size == 0 {
            return Err(DeskError::ConfigError(
                "chunk_size must be greater than 0".to_string(),
            ));
        }

        if self.retrieval.chunk_overlap >= self.retrieval.chunk_size {
            return Err(DeskError::ConfigError(
                "chunk_overlap must be less than chunk_size".to_string(),
            ));
        }

        if self.retrieval.top_k == 0 {
            return Err(DeskError::ConfigError(
                "top_k must be greater than 0".to_string(),
            ));
        }

        if !(-1.0..=1.0).contains(&self.retrieval.similarity_threshold) {
            return Err(DeskError::ConfigError(
                "similarity_threshold must be between -1.0 and 1.0".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.classifier.confidence_threshold) {
            return Err(DeskError::ConfigError(
                "confidence_threshold must be between 0.0 and 1.0".to_string(),
            ));
        }

        if self.classifier.max_topics == 0 {
            return Err(DeskError::ConfigError(
                "max_topics must be at least 1".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&self.generator.temperature) {
            return Err(DeskError::ConfigError(
                "temperature must be between 0.0 and 2.0".to_string(),
            ));
        }

        if self.embedding.batch_size == 0 {
            return Err(DeskError::ConfigError(
                "embedding batch_size must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| DeskError::ConfigError(format!("Failed to serialize config: {}", e)))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DeskError::ConfigError(format!("Failed to create config dir: {}", e))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| DeskError::ConfigError(format!("Failed to write config: {}", e)))?;

        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| DeskError::ConfigError(format!("Invalid value for {}: {}", key, value)))
}
