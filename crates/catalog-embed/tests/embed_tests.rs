use catalog_core::config::{EmbeddingBackend, EmbeddingSettings};
use catalog_core::Embedder;
use catalog_embed::{embedder_from_settings, HashEmbedder, DEFAULT_DIM};

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[test]
fn hash_embedder_shapes_and_determinism() {
    let embedder = HashEmbedder::new(DEFAULT_DIM);
    let texts = vec!["hello world".to_string(), "hello world".to_string()];
    let embs = embedder.embed_batch(&texts).expect("embed_batch");
    let (v1, v2) = (&embs[0], &embs[1]);

    assert_eq!(v1.len(), 384);
    let norm: f32 = v1.iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() <= 1e-3, "vector is L2-normalized (norm={norm})");
    for (a, b) in v1.iter().zip(v2.iter()) {
        assert!((a - b).abs() <= 1e-6);
    }
}

#[test]
fn hash_embedder_is_case_insensitive_and_rewards_shared_words() {
    let embedder = HashEmbedder::new(DEFAULT_DIM);
    let q = embedder.embed_one("gaming laptop").unwrap();
    let same = embedder.embed_one("Gaming Laptop").unwrap();
    let near = embedder.embed_one("Gaming Laptop High performance laptop for gaming").unwrap();
    let far = embedder.embed_one("Office Desktop computer for office work").unwrap();

    assert!((dot(&q, &same) - 1.0).abs() < 1e-5);
    assert!(dot(&q, &near) > dot(&q, &far));
}

#[test]
fn text_without_words_still_gets_a_unit_vector() {
    let embedder = HashEmbedder::new(8);
    for text in ["   ", "!!!", "₹ - ₹"] {
        let v = embedder.embed_one(text).unwrap();
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() <= 1e-5, "{text:?} has norm {norm}");
    }
    let a = embedder.embed_one("!!!").unwrap();
    assert_eq!(a, embedder.embed_one("!!!").unwrap());
}

#[test]
fn hash_backend_from_settings() {
    let settings = EmbeddingSettings { backend: EmbeddingBackend::Hash, dim: 64, ..Default::default() };
    let embedder = embedder_from_settings(&settings).expect("embedder");
    assert_eq!(embedder.dim(), 64);
    assert_eq!(embedder.name(), "hash");
}

#[test]
fn model_backend_without_model_files_fails() {
    let env_overrides = ["APP_USE_FAKE_EMBEDDINGS", "APP_MODEL_DIR", "MODEL_DIR"];
    if env_overrides.iter().any(|k| std::env::var(k).is_ok())
        || std::path::Path::new("models/all-MiniLM-L6-v2").exists()
        || std::path::Path::new("../models/all-MiniLM-L6-v2").exists()
    {
        return;
    }
    let settings = EmbeddingSettings {
        backend: EmbeddingBackend::Model,
        model_dir: Some("/nonexistent/minilm".into()),
        ..Default::default()
    };
    assert!(embedder_from_settings(&settings).is_err());
}
