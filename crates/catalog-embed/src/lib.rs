//! Embedding backends for the catalog search.
//!
//! `MiniLmEmbedder` runs a local sentence-transformer through candle; `HashEmbedder` is the
//! deterministic stand-in used by tests and by `APP_USE_FAKE_EMBEDDINGS=1`.
use anyhow::{bail, Result};
use catalog_core::config::{EmbeddingBackend, EmbeddingSettings};
use catalog_core::Embedder;

pub mod device;
pub mod hash;
pub mod model;
pub mod pool;
pub mod tokenize;

pub use hash::HashEmbedder;
pub use model::{resolve_model_dir, MiniLmEmbedder};
pub use pool::masked_mean_l2;

pub const DEFAULT_DIM: usize = 384;

fn fake_requested() -> bool {
    std::env::var("APP_USE_FAKE_EMBEDDINGS")
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

pub fn embedder_from_settings(settings: &EmbeddingSettings) -> Result<Box<dyn Embedder>> {
    if fake_requested() || settings.backend == EmbeddingBackend::Hash {
        tracing::info!(dim = settings.dim, "using hash embedder");
        return Ok(Box::new(HashEmbedder::new(settings.dim)));
    }
    let dir = resolve_model_dir(settings.model_dir.as_deref())?;
    let model = MiniLmEmbedder::load(&dir, settings.max_len)?;
    if model.dim() != settings.dim {
        bail!(
            "model at {} produces {} dims but embedding.dim is {}",
            dir.display(),
            model.dim(),
            settings.dim
        );
    }
    Ok(Box::new(model))
}
