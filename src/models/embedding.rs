//! Sentence embeddings via a BERT model running on Candle

use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config};
use hf_hub::{api::sync::Api, Repo, RepoType};
use tokenizers::{Tokenizer, TruncationParams};

use crate::errors::{ModelError, ModelResult};

/// Default sentence embedding model
pub const DEFAULT_MODEL_ID: &str = "sentence-transformers/all-MiniLM-L6-v2";

/// Longest token sequence fed to the model
const MAX_TOKENS: usize = 256;

/// Encodes text into fixed-dimension vectors
///
/// Vectors are L2-normalised, so inner product equals cosine similarity.
/// The same instance must be used at build time and query time.
pub trait Embedder: Send + Sync {
    /// Backend name used in logs and reasoning traces
    fn name(&self) -> &str;

    fn dimension(&self) -> usize;

    fn embed_batch(&self, texts: &[&str]) -> ModelResult<Vec<Vec<f32>>>;

    fn embed(&self, text: &str) -> ModelResult<Vec<f32>> {
        self.embed_batch(&[text])?
            .pop()
            .ok_or_else(|| ModelError::inference(self.name(), "empty embedding batch"))
    }
}

/// BERT sentence embedder loaded from the HuggingFace Hub
pub struct CandleEmbedder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    dimension: usize,
    model_id: String,
}

impl CandleEmbedder {
    /// Download (or reuse cached) weights and build the model
    ///
    /// Blocking; call from a blocking context.
    pub fn load(model_id: &str) -> ModelResult<Self> {
        let unavailable = |stage: &str, e: &dyn std::fmt::Display| {
            ModelError::unavailable(model_id, format!("{}: {}", stage, e))
        };

        let device = Device::Cpu;

        let api = Api::new().map_err(|e| unavailable("hub client", &e))?;
        let repo = api.repo(Repo::new(model_id.to_string(), RepoType::Model));

        let config_path = repo
            .get("config.json")
            .map_err(|e| unavailable("config download", &e))?;
        let tokenizer_path = repo
            .get("tokenizer.json")
            .map_err(|e| unavailable("tokenizer download", &e))?;
        let weights_path = repo
            .get("model.safetensors")
            .map_err(|e| unavailable("weights download", &e))?;

        let config_contents =
            std::fs::read_to_string(config_path).map_err(|e| unavailable("config read", &e))?;
        let config: Config =
            serde_json::from_str(&config_contents).map_err(|e| unavailable("config parse", &e))?;

        let mut tokenizer =
            Tokenizer::from_file(tokenizer_path).map_err(|e| unavailable("tokenizer load", &e))?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: MAX_TOKENS,
                ..Default::default()
            }))
            .map_err(|e| unavailable("tokenizer truncation", &e))?;

        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, &device)
                .map_err(|e| unavailable("weights load", &e))?
        };
        let model = BertModel::load(vb, &config).map_err(|e| unavailable("model build", &e))?;

        Ok(Self {
            model,
            tokenizer,
            device,
            dimension: config.hidden_size,
            model_id: model_id.to_string(),
        })
    }

    fn encode(&self, texts: &[&str]) -> candle_core::Result<Vec<Vec<f32>>> {
        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| candle_core::Error::Msg(format!("tokenization failed: {}", e)))?;

        let max_len = encodings.iter().map(|e| e.get_ids().len()).max().unwrap_or(0);
        let batch_size = texts.len();

        // Pad to the longest sequence in the batch
        let mut flat_ids = vec![0u32; batch_size * max_len];
        let mut flat_mask = vec![0u32; batch_size * max_len];
        for (i, encoding) in encodings.iter().enumerate() {
            let ids = encoding.get_ids();
            let mask = encoding.get_attention_mask();
            flat_ids[i * max_len..i * max_len + ids.len()].copy_from_slice(ids);
            flat_mask[i * max_len..i * max_len + mask.len()].copy_from_slice(mask);
        }

        let token_ids = Tensor::from_vec(flat_ids, (batch_size, max_len), &self.device)?;
        let attention_mask = Tensor::from_vec(flat_mask, (batch_size, max_len), &self.device)?;
        let token_type_ids = token_ids.zeros_like()?;

        let hidden = self
            .model
            .forward(&token_ids, &token_type_ids, Some(&attention_mask))?;
        let pooled = Self::mean_pool(&hidden, &attention_mask)?;
        let normalized = Self::l2_normalize(&pooled)?;

        normalized.to_vec2::<f32>()
    }

    /// Mean pooling with attention mask
    fn mean_pool(hidden: &Tensor, attention_mask: &Tensor) -> candle_core::Result<Tensor> {
        let mask = attention_mask
            .unsqueeze(2)?
            .expand(hidden.shape())?
            .to_dtype(hidden.dtype())?;

        let summed = (hidden * &mask)?.sum(1)?;
        let counts = mask.sum(1)?.clamp(1e-9, f64::MAX)?;
        summed.broadcast_div(&counts)
    }

    fn l2_normalize(vectors: &Tensor) -> candle_core::Result<Tensor> {
        let norms = vectors.sqr()?.sum_keepdim(1)?.sqrt()?.clamp(1e-12, f64::MAX)?;
        vectors.broadcast_div(&norms)
    }
}

impl Embedder for CandleEmbedder {
    fn name(&self) -> &str {
        &self.model_id
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn embed_batch(&self, texts: &[&str]) -> ModelResult<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.encode(texts)
            .map_err(|e| ModelError::inference(&self.model_id, e))
    }
}

/// Cosine similarity; zero when either vector has no magnitude
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}
