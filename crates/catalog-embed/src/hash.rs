use std::hash::{Hash, Hasher};

use anyhow::Result;
use catalog_core::Embedder;
use twox_hash::XxHash64;

/// Deterministic bag-of-words embedder. Each lowercased alphanumeric token lands in one
/// bucket, so texts sharing words get positive similarity. Text without any token (`"!!!"`)
/// is hashed whole, so every vector is unit length. No model files needed.
#[derive(Debug, Clone)]
pub struct HashEmbedder {
    dim: usize,
}

impl HashEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim: dim.max(1) }
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0f32; self.dim];
        let lowered = text.to_lowercase();
        let mut tokens: Vec<&str> =
            lowered.split(|c: char| !c.is_alphanumeric()).filter(|t| !t.is_empty()).collect();
        if tokens.is_empty() {
            tokens.push(lowered.trim());
        }
        for (i, token) in tokens.into_iter().enumerate() {
            let mut hasher = XxHash64::with_seed(0);
            token.hash(&mut hasher);
            let h = hasher.finish();
            let idx = (h as usize) % self.dim;
            let val = ((h >> 32) as u32) as f32 / u32::MAX as f32;
            v[idx] += 0.5 + val + (i % 3) as f32 * 0.01;
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            v.iter_mut().for_each(|x| *x /= norm);
        }
        v
    }
}

impl Embedder for HashEmbedder {
    fn dim(&self) -> usize {
        self.dim
    }

    fn max_len(&self) -> usize {
        usize::MAX
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }

    fn name(&self) -> &str {
        "hash"
    }
}
