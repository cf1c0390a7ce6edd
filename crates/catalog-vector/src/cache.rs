//! In-memory LRU of query embeddings keyed by `(embedder_id, blake3(text))`.
//!
//! Consulted before calling a provider for a query vector and written through on misses.
//! Catalog texts are never cached; they are embedded once per index.
use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;

type Key = (String, blake3::Hash);

pub struct QueryCache {
    inner: Option<Mutex<LruCache<Key, Vec<f32>>>>,
}

impl QueryCache {
    /// A capacity of 0 disables caching.
    pub fn new(capacity: usize) -> Self {
        Self { inner: NonZeroUsize::new(capacity).map(|c| Mutex::new(LruCache::new(c))) }
    }

    fn key(embedder_id: &str, text: &str) -> Key {
        (embedder_id.to_string(), blake3::hash(text.as_bytes()))
    }

    pub fn get(&self, embedder_id: &str, text: &str) -> Option<Vec<f32>> {
        let inner = self.inner.as_ref()?;
        inner.lock().get(&Self::key(embedder_id, text)).cloned()
    }

    pub fn put(&self, embedder_id: &str, text: &str, vector: Vec<f32>) {
        if let Some(inner) = &self.inner {
            inner.lock().put(Self::key(embedder_id, text), vector);
        }
    }

    /// Cached vector, or the result of `compute` (stored on success). The lock is not held
    /// while `compute` runs.
    pub fn get_or_try_insert_with<E, F>(&self, embedder_id: &str, text: &str, compute: F) -> Result<Vec<f32>, E>
    where
        F: FnOnce() -> Result<Vec<f32>, E>,
    {
        if let Some(hit) = self.get(embedder_id, text) {
            tracing::trace!("query embedding cache hit");
            return Ok(hit);
        }
        let vector = compute()?;
        self.put(embedder_id, text, vector.clone());
        Ok(vector)
    }

    pub fn len(&self) -> usize {
        self.inner.as_ref().map_or(0, |m| m.lock().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hits_skip_compute() {
        let cache = QueryCache::new(2);
        let first: Result<_, ()> = cache.get_or_try_insert_with("hash:d2", "pizza", || Ok(vec![1.0, 0.0]));
        assert_eq!(first, Ok(vec![1.0, 0.0]));
        let second: Result<_, ()> =
            cache.get_or_try_insert_with("hash:d2", "pizza", || panic!("should be cached"));
        assert_eq!(second, Ok(vec![1.0, 0.0]));
    }

    #[test]
    fn keys_include_the_embedder() {
        let cache = QueryCache::new(4);
        cache.put("a", "gym", vec![1.0]);
        assert!(cache.get("b", "gym").is_none());
    }

    #[test]
    fn evicts_least_recently_used() {
        let cache = QueryCache::new(2);
        cache.put("e", "one", vec![1.0]);
        cache.put("e", "two", vec![2.0]);
        let _ = cache.get("e", "one");
        cache.put("e", "three", vec![3.0]);
        assert!(cache.get("e", "two").is_none());
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn zero_capacity_disables() {
        let cache = QueryCache::new(0);
        cache.put("e", "x", vec![1.0]);
        assert!(cache.is_empty());
        let err: Result<Vec<f32>, &str> = cache.get_or_try_insert_with("e", "x", || Err("down"));
        assert_eq!(err, Err("down"));
    }
}
