use catalog_core::config::{EmbeddingBackend, EmbeddingSettings};
use catalog_core::{Embedder, Error};
use catalog_embed::HashEmbedder;
use catalog_vector::{rank_rows, top_k_rows, EmbedProvider, EmbeddingMatrix, LocalProvider};
use proptest::prelude::*;

struct Broken {
    dim: usize,
    vectors: Vec<Vec<f32>>,
}

impl Embedder for Broken {
    fn dim(&self) -> usize {
        self.dim
    }
    fn max_len(&self) -> usize {
        16
    }
    fn embed_batch(&self, _texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        Ok(self.vectors.clone())
    }
}

struct Offline;

impl Embedder for Offline {
    fn dim(&self) -> usize {
        4
    }
    fn max_len(&self) -> usize {
        16
    }
    fn embed_batch(&self, _texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        anyhow::bail!("model offline")
    }
}

fn texts(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("listing {i}")).collect()
}

#[test]
fn provider_id_names_backend_and_dim() {
    let provider = LocalProvider::new(Box::new(HashEmbedder::new(32)));
    assert_eq!(provider.embedder_id(), "local:hash:d32");
    assert_eq!(provider.dim(), 32);
}

#[test]
fn provider_from_hash_settings() {
    let settings = EmbeddingSettings { backend: EmbeddingBackend::Hash, dim: 16, ..Default::default() };
    let provider = LocalProvider::from_settings(&settings).expect("provider");
    let vs = provider.embed_batch(&texts(3)).expect("embed");
    assert_eq!(vs.len(), 3);
    assert!(vs.iter().all(|v| v.len() == 16));
}

#[test]
fn count_mismatch_is_rejected() {
    let provider = LocalProvider::new(Box::new(Broken { dim: 2, vectors: vec![vec![1.0, 0.0]] }));
    let err = provider.embed_batch(&texts(2)).unwrap_err();
    assert!(matches!(err, Error::EmbeddingProvider(_)));
}

#[test]
fn dimension_mismatch_is_rejected() {
    let provider = LocalProvider::new(Box::new(Broken { dim: 3, vectors: vec![vec![1.0, 0.0]] }));
    assert!(matches!(provider.embed_batch(&texts(1)), Err(Error::EmbeddingProvider(_))));
}

#[test]
fn non_finite_values_are_rejected() {
    let provider = LocalProvider::new(Box::new(Broken { dim: 2, vectors: vec![vec![f32::NAN, 1.0]] }));
    assert!(matches!(provider.embed_one("x"), Err(Error::EmbeddingProvider(_))));
}

#[test]
fn zero_vectors_are_rejected() {
    let provider = LocalProvider::new(Box::new(Broken { dim: 2, vectors: vec![vec![0.0, 0.0]] }));
    assert!(matches!(provider.embed_one("!!!"), Err(Error::EmbeddingProvider(_))));
}

#[test]
fn backend_failures_keep_their_message() {
    let provider = LocalProvider::new(Box::new(Offline));
    let err = provider.embed_one("pizza").unwrap_err();
    assert_eq!(err.to_string(), "Embedding provider error: model offline");
    assert!(!err.is_client_error());
}

#[test]
fn outputs_are_renormalised() {
    let provider = LocalProvider::new(Box::new(Broken { dim: 2, vectors: vec![vec![3.0, 4.0]] }));
    assert_eq!(provider.embed_one("x").unwrap(), vec![0.6, 0.8]);
}

proptest! {
    #[test]
    fn top_k_is_sorted_and_bounded(
        rows in prop::collection::vec(prop::collection::vec(-1.0f32..1.0, 4), 1..40),
        query in prop::collection::vec(-1.0f32..1.0, 4),
        k in 1usize..20,
    ) {
        prop_assume!(rows.iter().all(|r| r.iter().any(|x| x.abs() > 1e-3)));
        let n = rows.len();
        let m = EmbeddingMatrix::from_rows(4, rows).unwrap();
        let top = top_k_rows(&m, &query, k, |_| true);
        prop_assert_eq!(top.len(), k.min(n));
        for pair in top.windows(2) {
            prop_assert!(pair[0].similarity >= pair[1].similarity);
        }
        let all: Vec<usize> = (0..n).collect();
        prop_assert_eq!(rank_rows(&m, &query, &all).len(), n);
    }
}
