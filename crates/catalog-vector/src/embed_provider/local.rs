//! Provider over an in-process `Embedder` (the candle model or the hash embedder).
//!
//! Checks what the embedder hands back: one vector per text, each of the advertised
//! dimension, all finite, none zero. Vectors are re-normalised before they leave.
use catalog_core::config::EmbeddingSettings;
use catalog_core::{Embedder, Error, Result};
use catalog_embed::embedder_from_settings;

use super::EmbedProvider;
use crate::matrix::l2_normalize;

pub struct LocalProvider {
    inner: Box<dyn Embedder>,
    id: String,
}

impl LocalProvider {
    pub fn new(inner: Box<dyn Embedder>) -> Self {
        let id = format!("local:{}:d{}", inner.name(), inner.dim());
        Self { inner, id }
    }

    /// Loads the embedder the settings ask for (honours `APP_USE_FAKE_EMBEDDINGS`).
    pub fn from_settings(settings: &EmbeddingSettings) -> Result<Self> {
        let inner = embedder_from_settings(settings).map_err(|e| Error::EmbeddingProvider(format!("{e:#}")))?;
        Ok(Self::new(inner))
    }
}

impl EmbedProvider for LocalProvider {
    fn embedder_id(&self) -> &str {
        &self.id
    }

    fn dim(&self) -> usize {
        self.inner.dim()
    }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut vectors = self
            .inner
            .embed_batch(texts)
            .map_err(|e| Error::EmbeddingProvider(format!("{e:#}")))?;
        if vectors.len() != texts.len() {
            return Err(Error::EmbeddingProvider(format!(
                "{} returned {} vectors for {} texts",
                self.id,
                vectors.len(),
                texts.len()
            )));
        }
        let dim = self.dim();
        for v in &mut vectors {
            if v.len() != dim {
                return Err(Error::EmbeddingProvider(format!(
                    "{} returned a {}-dim vector, expected {dim}",
                    self.id,
                    v.len()
                )));
            }
            if v.iter().any(|x| !x.is_finite()) {
                return Err(Error::EmbeddingProvider(format!("{} returned a non-finite value", self.id)));
            }
            if !l2_normalize(v).is_normal() {
                return Err(Error::EmbeddingProvider(format!("{} returned a zero vector", self.id)));
            }
        }
        Ok(vectors)
    }
}
