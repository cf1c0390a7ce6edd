use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use candle_core::{DType, Device};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config as BertConfig, DTYPE};
use catalog_core::Embedder;
use tokenizers::Tokenizer;

use crate::{device::select_device, pool::masked_mean_l2, tokenize::tokenize_batch};

const BATCH_SIZE: usize = 32;

/// Sentence-transformer (all-MiniLM-L6-v2 by default) loaded from a local directory holding
/// `config.json`, `tokenizer.json` and `model.safetensors` or `pytorch_model.bin`.
pub struct MiniLmEmbedder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
    dim: usize,
    max_len: usize,
}

impl MiniLmEmbedder {
    pub fn load(model_dir: &Path, max_len: usize) -> Result<Self> {
        let started = Instant::now();
        let device = select_device();

        let tokenizer_path = model_dir.join("tokenizer.json");
        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow!("Failed to load tokenizer from {}: {}", tokenizer_path.display(), e))?;

        let config_path = model_dir.join("config.json");
        let raw = std::fs::read_to_string(&config_path)
            .with_context(|| format!("reading {}", config_path.display()))?;
        let config: BertConfig = serde_json::from_str(&raw)?;
        let dim = serde_json::from_str::<serde_json::Value>(&raw)?
            .get("hidden_size")
            .and_then(serde_json::Value::as_u64)
            .ok_or_else(|| anyhow!("{} has no hidden_size", config_path.display()))? as usize;

        let safetensors = model_dir.join("model.safetensors");
        let vb = if safetensors.exists() {
            // SAFETY: the weights file is not modified while mapped.
            unsafe { VarBuilder::from_mmaped_safetensors(&[safetensors], DTYPE, &device)? }
        } else {
            let weights = candle_core::pickle::read_all(model_dir.join("pytorch_model.bin"))?;
            VarBuilder::from_tensors(weights.into_iter().collect(), DTYPE, &device)
        };
        let model = BertModel::load(vb, &config)?;

        tracing::info!(
            dir = %model_dir.display(),
            dim,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "embedding model loaded"
        );
        Ok(Self { model, tokenizer, device, dim, max_len })
    }

    fn embed_chunk(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let (input_ids, attention_mask) =
            tokenize_batch(&self.tokenizer, texts, self.max_len, &self.device)?;
        let token_type_ids = input_ids.zeros_like()?;
        let hidden = self.model.forward(&input_ids, &token_type_ids, Some(&attention_mask))?;
        let pooled = masked_mean_l2(&hidden, &attention_mask.to_dtype(DType::F32)?)?;
        Ok(pooled.to_device(&Device::Cpu)?.to_dtype(DType::F32)?.to_vec2::<f32>()?)
    }
}

impl Embedder for MiniLmEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    fn max_len(&self) -> usize {
        self.max_len
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let started = Instant::now();
        let mut out = Vec::with_capacity(texts.len());
        for chunk in texts.chunks(BATCH_SIZE) {
            out.extend(self.embed_chunk(chunk)?);
        }
        let elapsed = started.elapsed().as_millis() as u64;
        if texts.len() == 1 && elapsed > 100 {
            tracing::warn!(elapsed_ms = elapsed, "slow query embedding");
        } else {
            tracing::debug!(texts = texts.len(), elapsed_ms = elapsed, "embedded batch");
        }
        Ok(out)
    }

    fn name(&self) -> &str {
        "minilm"
    }
}

/// First existing directory among: the configured one, `APP_MODEL_DIR`, `MODEL_DIR`,
/// `models/all-MiniLM-L6-v2`, `../models/all-MiniLM-L6-v2`.
pub fn resolve_model_dir(configured: Option<&str>) -> Result<PathBuf> {
    let candidates = configured
        .map(catalog_core::config::expand_path)
        .into_iter()
        .chain(std::env::var("APP_MODEL_DIR").ok().map(PathBuf::from))
        .chain(std::env::var("MODEL_DIR").ok().map(PathBuf::from))
        .chain([
            PathBuf::from("models/all-MiniLM-L6-v2"),
            PathBuf::from("../models/all-MiniLM-L6-v2"),
        ]);
    for dir in candidates {
        if dir.exists() {
            tracing::info!(dir = %dir.display(), "using model dir");
            return Ok(dir);
        }
    }
    Err(anyhow!("Could not locate the MiniLM model directory"))
}

