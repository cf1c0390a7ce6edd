//! Service object tying the search engine, autocomplete and per-user history together.
//!
//! One `CatalogService` is built at startup and shared by reference or `Arc`; it enforces
//! the request-level limits (page size, filters, suggestion count) on top of the engine.
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};

use catalog_core::catalog::load_items;
use catalog_core::config::{expand_path, Settings};
use catalog_core::{EngineStats, Error, Item, Result, SearchResult};
use catalog_hybrid::{HybridSearchEngine, SearchFilters, SearchOptions};
use catalog_suggest::Autocomplete;

pub mod recent;

pub use recent::RecentSearches;

/// Extra results fetched past the requested page, so filtering still leaves a full page.
const FILTER_HEADROOM: usize = 100;

const POPULAR_TERMS: usize = 10;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchRequest {
    pub query: String,
    pub limit: usize,
    pub offset: usize,
    #[serde(flatten)]
    pub filters: SearchFilters,
}

impl Default for SearchRequest {
    fn default() -> Self {
        Self { query: String::new(), limit: 10, offset: 0, filters: SearchFilters::default() }
    }
}

impl SearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self { query: query.into(), ..Self::default() }
    }

    pub fn page(mut self, offset: usize, limit: usize) -> Self {
        self.offset = offset;
        self.limit = limit;
        self
    }

    pub fn filters(mut self, filters: SearchFilters) -> Self {
        self.filters = filters;
        self
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchPage {
    pub query: String,
    /// Matches after filtering, before pagination.
    pub total_results: usize,
    pub results: Vec<SearchResult>,
    pub processing_time_ms: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub uptime_seconds: f64,
    pub stats: EngineStats,
    pub autocomplete_terms: usize,
    pub popular_terms: Vec<(String, u64)>,
}

pub struct CatalogService {
    engine: Arc<HybridSearchEngine>,
    autocomplete: Autocomplete,
    recent: RecentSearches,
    settings: Settings,
    started: Instant,
}

impl CatalogService {
    pub fn new(engine: HybridSearchEngine, settings: Settings) -> Self {
        Self {
            engine: Arc::new(engine),
            autocomplete: Autocomplete::new(&settings.suggest),
            recent: RecentSearches::new(settings.recent.per_user),
            settings,
            started: Instant::now(),
        }
    }

    pub fn from_settings(settings: Settings) -> Result<Self> {
        let engine = HybridSearchEngine::from_settings(&settings)?;
        Ok(Self::new(engine, settings))
    }

    pub fn engine(&self) -> &Arc<HybridSearchEngine> {
        &self.engine
    }

    pub fn suggester(&self) -> &Autocomplete {
        &self.autocomplete
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Indexes `items` and rebuilds autocomplete from them. The trie is only rebuilt once
    /// the engine accepted the catalog.
    pub fn load(&self, items: Vec<Item>) -> Result<usize> {
        let count = self.engine.index(items)?;
        self.autocomplete.build_from(&self.engine.items());
        Ok(count)
    }

    /// Reloads the configured catalog file.
    pub fn retrain(&self) -> Result<usize> {
        let path = expand_path(&self.settings.data.catalog_path);
        self.retrain_from(&path)
    }

    pub fn retrain_from(&self, path: &Path) -> Result<usize> {
        tracing::info!(path = %path.display(), "retraining");
        let items = load_items(path)?;
        if items.is_empty() {
            tracing::warn!(path = %path.display(), "catalog file has no items, keeping current catalog");
            return Ok(0);
        }
        let count = self.load(items)?;
        tracing::info!(items = count, "retrain complete");
        Ok(count)
    }

    pub fn search(&self, request: &SearchRequest) -> Result<SearchPage> {
        let started = Instant::now();
        let max_limit = self.settings.search.max_limit;
        if !(1..=max_limit).contains(&request.limit) {
            return Err(Error::Validation(format!("limit must be between 1 and {max_limit}")));
        }

        let top_k = request
            .offset
            .saturating_add(request.limit)
            .saturating_add(FILTER_HEADROOM)
            .min(self.settings.search.max_top_k);
        let results = self.engine.search(&request.query, &SearchOptions::top_k(top_k))?;
        let filtered = request.filters.apply(results);
        let total_results = filtered.len();
        let results: Vec<SearchResult> =
            filtered.into_iter().skip(request.offset).take(request.limit).collect();

        let processing_time_ms = started.elapsed().as_secs_f64() * 1000.0;
        tracing::info!(
            query = %request.query,
            filters = ?request.filters,
            results = results.len(),
            total_results,
            elapsed_ms = processing_time_ms,
            "search"
        );
        Ok(SearchPage { query: request.query.clone(), total_results, results, processing_time_ms })
    }

    /// Trie completions; when there are none, titles of the best search hits instead.
    pub fn autocomplete(&self, prefix: &str, limit: Option<usize>) -> Result<Vec<String>> {
        let max = self.autocomplete.max_suggestions();
        let limit = limit.unwrap_or(max);
        if !(1..=max).contains(&limit) {
            return Err(Error::Validation(format!("limit must be between 1 and {max}")));
        }
        if prefix.trim().is_empty() {
            return Ok(Vec::new());
        }

        let suggestions = self.autocomplete.suggest(prefix, Some(limit));
        if !suggestions.is_empty() || !self.engine.is_ready() {
            return Ok(suggestions);
        }

        tracing::debug!(prefix, "no completions, falling back to search titles");
        let mut seen = HashSet::new();
        Ok(self
            .engine
            .search(prefix, &SearchOptions::top_k(limit))?
            .into_iter()
            .map(|r| r.item.title)
            .filter(|title| !title.is_empty() && seen.insert(title.clone()))
            .take(limit)
            .collect())
    }

    /// Adds to the user's history and counts the query for autocomplete ranking.
    pub fn record_recent(&self, user_id: &str, query: &str) -> Result<()> {
        self.recent.record(user_id, query)?;
        self.autocomplete.record_search(query);
        Ok(())
    }

    pub fn recent(&self, user_id: &str) -> Vec<String> {
        self.recent.get(user_id)
    }

    pub fn clear_recent(&self, user_id: &str) {
        self.recent.clear(user_id);
    }

    pub fn health(&self) -> HealthReport {
        let status = if self.engine.is_ready() { "healthy" } else { "not_ready" };
        HealthReport {
            status: status.to_string(),
            uptime_seconds: self.started.elapsed().as_secs_f64(),
            stats: self.engine.stats(),
            autocomplete_terms: self.autocomplete.len(),
            popular_terms: self.autocomplete.popular_terms(POPULAR_TERMS),
        }
    }
}
