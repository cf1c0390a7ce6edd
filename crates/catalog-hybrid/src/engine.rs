//! The hybrid search engine.
//!
//! Holds the catalog, its per-item keyword terms and the embedding matrix as one immutable
//! snapshot behind `RwLock<Option<Arc<_>>>`. Readers clone the `Arc` and work without the
//! lock; `index` embeds first and swaps the snapshot in, `add` embeds first and appends
//! copy-on-write. Row `i` of the matrix always belongs to item `i`.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use catalog_core::catalog::{load_items, validate_items};
use catalog_core::config::{RerankPolicy, SearchSettings, Settings, MIN_TOP_K};
use catalog_core::slug::generate_slug;
use catalog_core::{EngineStats, Error, Facets, Item, MatchType, Result, SearchResult};
use catalog_text::{normalize_query, DocTerms, KeywordFilter, KeywordMatch};
use catalog_vector::{rank_rows, top_k_rows, EmbedProvider, EmbeddingMatrix, LocalProvider, QueryCache};

use crate::fusion::{fuse, rank, Weights};

pub const MAX_RECOMMENDATIONS: usize = 20;

#[derive(Clone)]
struct Snapshot {
    items: Vec<Item>,
    docs: Vec<DocTerms>,
    matrix: EmbeddingMatrix,
}

impl Snapshot {
    fn empty(dim: usize) -> Self {
        Self { items: Vec::new(), docs: Vec::new(), matrix: EmbeddingMatrix::new(dim) }
    }

    fn build(items: Vec<Item>, vectors: Vec<Vec<f32>>, dim: usize) -> Result<Self> {
        if vectors.len() != items.len() {
            return Err(Error::EmbeddingProvider(format!(
                "got {} vectors for {} items",
                vectors.len(),
                items.len()
            )));
        }
        let matrix = EmbeddingMatrix::from_rows(dim, vectors)?;
        let docs = items.iter().map(DocTerms::from_item).collect();
        Ok(Self { items, docs, matrix })
    }

    /// Appends one item; the matrix goes first since it is the only step that can fail.
    fn push(&mut self, item: Item, vector: Vec<f32>) -> Result<()> {
        self.matrix.push(vector)?;
        self.docs.push(DocTerms::from_item(&item));
        self.items.push(item);
        Ok(())
    }

    fn position(&self, id_or_slug: &str) -> Option<usize> {
        self.items
            .iter()
            .position(|it| it.id.as_key() == id_or_slug || it.slug.as_deref() == Some(id_or_slug))
    }

    fn semantic_result(&self, index: usize, similarity: f32) -> SearchResult {
        SearchResult {
            item: self.items[index].clone(),
            keyword_score: 0.0,
            semantic_score: similarity,
            score: similarity,
            match_type: MatchType::Semantic,
        }
    }
}

/// Per-call overrides; `None` falls back to the engine's configured defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SearchOptions {
    pub top_k: Option<usize>,
    pub keyword_weight: Option<f32>,
    pub semantic_weight: Option<f32>,
}

impl SearchOptions {
    pub fn top_k(top_k: usize) -> Self {
        Self { top_k: Some(top_k), ..Self::default() }
    }

    pub fn with_weights(mut self, keyword: f32, semantic: f32) -> Self {
        self.keyword_weight = Some(keyword);
        self.semantic_weight = Some(semantic);
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendations {
    pub source_id: String,
    pub source_title: String,
    pub results: Vec<SearchResult>,
}

pub struct HybridSearchEngine {
    provider: Box<dyn EmbedProvider>,
    settings: SearchSettings,
    keyword: KeywordFilter,
    query_cache: QueryCache,
    state: RwLock<Option<Arc<Snapshot>>>,
    total_searches: AtomicU64,
}

impl HybridSearchEngine {
    pub fn new(provider: Box<dyn EmbedProvider>, settings: SearchSettings) -> Self {
        let keyword = KeywordFilter::new(settings.title_boost, settings.keyword_score_ceiling);
        Self {
            provider,
            settings,
            keyword,
            query_cache: QueryCache::new(0),
            state: RwLock::new(None),
            total_searches: AtomicU64::new(0),
        }
    }

    pub fn with_query_cache(mut self, capacity: usize) -> Self {
        self.query_cache = QueryCache::new(capacity);
        self
    }

    /// Engine over the embedder named in `settings.embedding`.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        settings.validate()?;
        let provider = LocalProvider::from_settings(&settings.embedding)?;
        Ok(Self::new(Box::new(provider), settings.search.clone())
            .with_query_cache(settings.embedding.query_cache_size))
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    pub fn embedder_id(&self) -> &str {
        self.provider.embedder_id()
    }

    fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.state.read().clone()
    }

    fn ready_snapshot(&self) -> Result<Arc<Snapshot>> {
        self.snapshot()
            .ok_or_else(|| Error::NotReady("index a catalog before searching".into()))
    }

    pub fn is_ready(&self) -> bool {
        self.state.read().is_some()
    }

    pub fn len(&self) -> usize {
        self.snapshot().map_or(0, |s| s.items.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Replaces the whole catalog. On any failure the previous catalog stays in place.
    pub fn index(&self, items: Vec<Item>) -> Result<usize> {
        if items.is_empty() {
            return Err(Error::Validation("cannot index an empty catalog".into()));
        }
        validate_items(&items)?;

        let started = Instant::now();
        let texts: Vec<String> = items.iter().map(Item::searchable_text).collect();
        let vectors = self.provider.embed_batch(&texts)?;
        let count = items.len();
        let snapshot = Snapshot::build(items, vectors, self.provider.dim())?;
        *self.state.write() = Some(Arc::new(snapshot));

        tracing::info!(
            items = count,
            dim = self.provider.dim(),
            embedder = self.provider.embedder_id(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "catalog indexed"
        );
        Ok(count)
    }

    /// Appends one item, starting a catalog if there is none. Items without a slug get one
    /// derived from the title.
    pub fn add(&self, mut item: Item) -> Result<()> {
        item.validate(None)?;
        if item.slug.as_deref().map_or(true, |s| s.trim().is_empty()) {
            let slug = generate_slug(&item.title);
            item.slug = (!slug.is_empty()).then_some(slug);
        }
        let vector = self.provider.embed_one(&item.searchable_text())?;

        let id = item.id.to_string();
        let mut state = self.state.write();
        match state.as_mut() {
            Some(snapshot) => Arc::make_mut(snapshot).push(item, vector)?,
            None => {
                let mut fresh = Snapshot::empty(self.provider.dim());
                fresh.push(item, vector)?;
                *state = Some(Arc::new(fresh));
            }
        }
        let total = state.as_ref().map_or(0, |s| s.items.len());
        tracing::info!(id = %id, total, "item added");
        Ok(())
    }

    /// Loads a JSON catalog file and re-indexes. An empty file leaves the catalog alone.
    pub fn reload_from_file(&self, path: &Path) -> Result<usize> {
        let items = load_items(path)?;
        if items.is_empty() {
            tracing::warn!(path = %path.display(), "catalog file has no items, keeping current catalog");
            return Ok(0);
        }
        self.index(items)
    }

    fn validate_request(&self, query: &str, options: &SearchOptions) -> Result<usize> {
        if query.trim().is_empty() {
            return Err(Error::Validation("query must not be empty".into()));
        }
        let max_chars = self.settings.max_query_chars;
        if query.chars().count() > max_chars {
            return Err(Error::Validation(format!("query too long (max {max_chars} characters)")));
        }
        let top_k = options.top_k.unwrap_or(self.settings.default_top_k);
        if !(MIN_TOP_K..=self.settings.max_top_k).contains(&top_k) {
            return Err(Error::Validation(format!(
                "top_k must be between {MIN_TOP_K} and {}",
                self.settings.max_top_k
            )));
        }
        let weights = [options.keyword_weight, options.semantic_weight];
        if weights.iter().flatten().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(Error::Validation("weights must be finite and non-negative".into()));
        }
        Ok(top_k)
    }

    fn embed_query(&self, normalized: &str) -> Result<Vec<f32>> {
        self.query_cache.get_or_try_insert_with(self.provider.embedder_id(), normalized, || {
            self.provider.embed_one(normalized)
        })
    }

    pub fn search(&self, query: &str, options: &SearchOptions) -> Result<Vec<SearchResult>> {
        let top_k = self.validate_request(query, options)?;
        let weights = Weights {
            keyword: options.keyword_weight.unwrap_or(self.settings.keyword_weight),
            semantic: options.semantic_weight.unwrap_or(self.settings.semantic_weight),
        };
        let snapshot = self.ready_snapshot()?;

        let normalized = normalize_query(query);
        let candidates = self.keyword.filter(&normalized, &snapshot.docs);

        let results = match self.settings.rerank_policy {
            RerankPolicy::EarlyReturn if candidates.len() <= top_k => {
                keyword_only(&snapshot, &candidates, weights, top_k)
            }
            _ if candidates.is_empty() => self.semantic_fallback(&snapshot, &normalized, top_k)?,
            _ => self.rerank(&snapshot, &normalized, &candidates, weights, top_k)?,
        };

        self.total_searches.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(
            query = %normalized,
            candidates = candidates.len(),
            results = results.len(),
            "search"
        );
        Ok(results)
    }

    fn rerank(
        &self,
        snapshot: &Snapshot,
        normalized: &str,
        candidates: &[KeywordMatch],
        weights: Weights,
        top_k: usize,
    ) -> Result<Vec<SearchResult>> {
        let query_vec = self.embed_query(normalized)?;
        let indices: Vec<usize> = candidates.iter().map(|m| m.index).collect();
        let similarities = rank_rows(&snapshot.matrix, &query_vec, &indices);
        let mut results: Vec<SearchResult> = candidates
            .iter()
            .zip(similarities)
            .map(|(m, row)| fuse(&snapshot.items[m.index], m.score, row.similarity, weights))
            .collect();
        rank(&mut results, top_k);
        Ok(results)
    }

    fn semantic_fallback(&self, snapshot: &Snapshot, normalized: &str, top_k: usize) -> Result<Vec<SearchResult>> {
        tracing::debug!(query = %normalized, "no keyword candidates, ranking whole catalog");
        let query_vec = self.embed_query(normalized)?;
        Ok(top_k_rows(&snapshot.matrix, &query_vec, top_k, |_| true)
            .into_iter()
            .map(|row| snapshot.semantic_result(row.index, row.similarity))
            .collect())
    }

    pub fn stats(&self) -> EngineStats {
        EngineStats {
            catalog_size: self.len(),
            embedding_dim: self.provider.dim(),
            embedder_id: self.provider.embedder_id().to_string(),
            total_searches: self.total_searches.load(Ordering::Relaxed),
        }
    }

    pub fn facets(&self) -> Facets {
        let Some(snapshot) = self.snapshot() else {
            return Facets::default();
        };
        let distinct = |field: fn(&Item) -> &str| -> Vec<String> {
            snapshot
                .items
                .iter()
                .map(|it| field(it).trim())
                .filter(|v| !v.is_empty())
                .map(str::to_string)
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect()
        };
        Facets {
            sectors: distinct(Item::sector),
            locations: distinct(Item::location),
            investment_ranges: distinct(Item::investment_range),
        }
    }

    /// Items most similar to the one with this id or slug, best first.
    pub fn recommend(&self, id_or_slug: &str, limit: usize, same_sector: bool) -> Result<Recommendations> {
        if !(1..=MAX_RECOMMENDATIONS).contains(&limit) {
            return Err(Error::Validation(format!(
                "limit must be between 1 and {MAX_RECOMMENDATIONS}"
            )));
        }
        let snapshot = self.ready_snapshot()?;
        let source_idx = snapshot
            .position(id_or_slug)
            .ok_or_else(|| Error::NotFound(format!("item {id_or_slug}")))?;
        let source = &snapshot.items[source_idx];
        let source_vec = snapshot
            .matrix
            .row(source_idx)
            .ok_or_else(|| Error::NotFound(format!("embedding for item {id_or_slug}")))?;

        let keep = |i: usize| i != source_idx && (!same_sector || snapshot.items[i].sector() == source.sector());
        let results = top_k_rows(&snapshot.matrix, source_vec, limit, keep)
            .into_iter()
            .map(|row| snapshot.semantic_result(row.index, row.similarity))
            .collect();

        Ok(Recommendations {
            source_id: source.id.to_string(),
            source_title: source.title.clone(),
            results,
        })
    }

    /// The item with this id or slug, if indexed.
    pub fn find(&self, id_or_slug: &str) -> Option<Item> {
        let snapshot = self.snapshot()?;
        snapshot.position(id_or_slug).map(|i| snapshot.items[i].clone())
    }

    /// A copy of the current catalog, in index order.
    pub fn items(&self) -> Vec<Item> {
        self.snapshot().map(|s| s.items.clone()).unwrap_or_default()
    }
}

fn keyword_only(snapshot: &Snapshot, candidates: &[KeywordMatch], weights: Weights, top_k: usize) -> Vec<SearchResult> {
    let mut ordered = candidates.to_vec();
    ordered.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    ordered.truncate(top_k);
    ordered
        .into_iter()
        .map(|m| SearchResult {
            item: snapshot.items[m.index].clone(),
            keyword_score: m.score,
            semantic_score: 0.0,
            score: weights.keyword * m.score,
            match_type: MatchType::Keyword,
        })
        .collect()
}
