//! Embedding provider abstraction used by the search engine.
//!
//! Providers return one L2-normalised vector of `dim()` values per input, in input order,
//! and report failures as `Error::EmbeddingProvider`.
use catalog_core::Result;

pub trait EmbedProvider: Send + Sync {
    /// Stable identifier for the provider/model (e.g., `local:minilm:d384`).
    fn embedder_id(&self) -> &str;
    fn dim(&self) -> usize;
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_batch(&[text.to_string()])?
            .pop()
            .ok_or_else(|| catalog_core::Error::EmbeddingProvider("provider returned no vector".into()))
    }
}

pub mod local;
