/// A text embedding backend.
///
/// Implementations must return one L2-normalised vector of length `dim()` per input text, in
/// input order. Failures are reported as `anyhow` errors; callers translate them into
/// `Error::EmbeddingProvider`.
pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    fn max_len(&self) -> usize;
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;

    /// Short label for logs and stats, e.g. `minilm` or `hash`.
    fn name(&self) -> &str {
        "embedder"
    }

    fn embed_one(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        self.embed_batch(&[text.to_string()])?
            .pop()
            .ok_or_else(|| anyhow::anyhow!("embedder returned no vector"))
    }
}
