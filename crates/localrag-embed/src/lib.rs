//! Sentence embeddings for the local retrieval store.
//!
//! `BertEmbedder` runs a BERT-family encoder (snowflake-arctic-embed by
//! default) through candle. `HashEmbedder` is a deterministic stand-in used by
//! tests and by `embed.fake = true`.
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use candle_core::{DType, Device};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use tokenizers::Tokenizer;

use localrag_core::config::{EmbedSettings, Pooling};
use localrag_core::traits::Embedder;
use localrag_core::Error;

pub mod device;
pub mod pool;
pub mod tokenize;

pub use device::select_device;
pub use pool::{cls_l2, masked_mean_l2};
use tokenize::tokenize_on_device;

pub struct BertEmbedder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    id: String,
    dim: usize,
    max_len: usize,
    pooling: Pooling,
    query_prefix: String,
}

impl BertEmbedder {
    /// Load tokenizer, config and weights from `settings.model_dir` onto the configured device.
    pub fn load(settings: &EmbedSettings) -> localrag_core::Result<Self> {
        let device = select_device(settings.device)?;
        let model_dir = settings.resolved_model_dir();
        if !model_dir.is_dir() {
            return Err(Error::EmbeddingUnavailable(format!("model directory {} not found", model_dir.display())));
        }
        tracing::info!(model_dir = %model_dir.display(), "loading embedding model");

        let tokenizer_path = model_dir.join("tokenizer.json");
        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| Error::EmbeddingUnavailable(format!("Failed to load tokenizer from {}: {}", tokenizer_path.display(), e)))?;

        let config_path = model_dir.join("config.json");
        let raw_config = std::fs::read_to_string(&config_path)
            .map_err(|e| Error::EmbeddingUnavailable(format!("Failed to read {}: {}", config_path.display(), e)))?;
        let config: BertConfig = serde_json::from_str(&raw_config).map_err(Error::embedding)?;
        let shape: serde_json::Value = serde_json::from_str(&raw_config).map_err(Error::embedding)?;
        let dim = shape.get("hidden_size").and_then(|v| v.as_u64()).ok_or_else(|| Error::EmbeddingUnavailable("config.json has no hidden_size".into()))? as usize;
        let max_positions = shape.get("max_position_embeddings").and_then(|v| v.as_u64()).map(|v| v as usize).unwrap_or(settings.max_len);

        let vb = load_weights(&model_dir, &device).map_err(Error::embedding)?;
        let model = BertModel::load(vb, &config).map_err(Error::embedding)?;

        let name = model_dir.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_else(|| "bert".into());
        let id = format!("bert:{}:d{}", name, dim);
        tracing::info!(%id, device = device::describe(&device), "embedding model loaded");
        Ok(Self { model, tokenizer, device, id, dim, max_len: settings.max_len.min(max_positions), pooling: settings.pooling, query_prefix: settings.query_prefix.clone() })
    }

    fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        let start = Instant::now();
        let (input_ids, attention_mask) = tokenize_on_device(&self.tokenizer, text, self.max_len, &self.device)?;
        let token_type_ids = input_ids.zeros_like()?;
        let hidden = self.model.forward(&input_ids, &token_type_ids, Some(&attention_mask))?;
        let pooled = match self.pooling {
            Pooling::Cls => cls_l2(&hidden)?,
            Pooling::Mean => masked_mean_l2(&hidden, &attention_mask)?,
        };
        let v: Vec<f32> = pooled.to_device(&Device::Cpu)?.to_dtype(DType::F32)?.squeeze(0)?.to_vec1()?;
        if v.len() != self.dim { return Err(anyhow!("model produced {} dims, expected {}", v.len(), self.dim)); }
        tracing::trace!(elapsed_ms = start.elapsed().as_millis() as u64, "embedded text");
        Ok(v)
    }
}

impl Embedder for BertEmbedder {
    fn id(&self) -> &str { &self.id }
    fn dim(&self) -> usize { self.dim }
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> { texts.iter().map(|t| self.embed_one(t)).collect() }
    fn embed_query(&self, text: &str) -> Result<Vec<f32>> { self.embed_one(&format!("{}{}", self.query_prefix, text)) }
}

fn load_weights(model_dir: &Path, device: &Device) -> Result<VarBuilder<'static>> {
    let safetensors = model_dir.join("model.safetensors");
    if safetensors.exists() {
        // SAFETY: the weights file is treated as read-only for the lifetime of the process.
        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[safetensors], DType::F32, device)? };
        return Ok(vb);
    }
    let weights_path = model_dir.join("pytorch_model.bin");
    if !weights_path.exists() { return Err(anyhow!("no model.safetensors or pytorch_model.bin in {}", model_dir.display())); }
    let weights = candle_core::pickle::read_all(&weights_path)?;
    let weights_map: HashMap<String, candle_core::Tensor> = weights.into_iter().collect();
    Ok(VarBuilder::from_tensors(weights_map, DType::F32, device))
}

/// Bag-of-words hashing embedder: lowercased alphanumeric tokens hashed into
/// `dim` buckets, L2 normalized. Deterministic across runs and platforms.
pub struct HashEmbedder { dim: usize, id: String }

impl HashEmbedder {
    pub fn new(dim: usize) -> Self { Self { dim, id: format!("hash:d{}", dim) } }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        use std::hash::Hasher;
        use twox_hash::XxHash64;
        let mut v = vec![0f32; self.dim];
        for token in text.split(|c: char| !c.is_alphanumeric()).filter(|t| !t.is_empty()) {
            let mut hasher = XxHash64::with_seed(0);
            hasher.write(token.to_lowercase().as_bytes());
            let idx = (hasher.finish() % self.dim as u64) as usize;
            v[idx] += 1.0;
        }
        let norm = (v.iter().map(|x| x * x).sum::<f32>()).sqrt().max(1e-6);
        for x in &mut v { *x /= norm; }
        v
    }
}

impl Embedder for HashEmbedder {
    fn id(&self) -> &str { &self.id }
    fn dim(&self) -> usize { self.dim }
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> { Ok(texts.iter().map(|t| self.embed_text(t)).collect()) }
}

/// Build the embedder described by `settings`.
pub fn load_embedder(settings: &EmbedSettings) -> localrag_core::Result<Arc<dyn Embedder>> {
    if settings.fake {
        tracing::info!(dim = settings.fake_dim, "using hash embedder");
        return Ok(Arc::new(HashEmbedder::new(settings.fake_dim)));
    }
    Ok(Arc::new(BertEmbedder::load(settings)?))
}
