//! catalog-vector
//!
//! Dense side of the catalog search: the in-memory embedding matrix, the provider wrapper
//! that checks embedder output, a query-embedding cache and similarity ranking.
pub mod cache;
pub mod embed_provider;
pub mod matrix;
pub mod search;

pub use cache::QueryCache;
pub use embed_provider::{local::LocalProvider, EmbedProvider};
pub use matrix::EmbeddingMatrix;
pub use search::{rank_rows, top_k_rows, ScoredRow};
