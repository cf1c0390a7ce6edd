//! Autocomplete over catalog terms and recorded searches.
//!
//! `AutocompleteTrie` is the plain data structure; `Autocomplete` wraps it for shared use,
//! rebuilding off to the side and swapping the new trie in under a short write lock.
use parking_lot::RwLock;

use catalog_core::config::{SuggestSettings, TermExtraction};
use catalog_core::Item;

pub mod extract;
pub mod trie;

pub use trie::AutocompleteTrie;

pub struct Autocomplete {
    trie: RwLock<AutocompleteTrie>,
    max_suggestions: usize,
    extraction: TermExtraction,
}

impl Default for Autocomplete {
    fn default() -> Self {
        Self::new(&SuggestSettings::default())
    }
}

impl Autocomplete {
    pub fn new(settings: &SuggestSettings) -> Self {
        Self {
            trie: RwLock::new(AutocompleteTrie::new()),
            max_suggestions: settings.max_suggestions,
            extraction: settings.extraction,
        }
    }

    pub fn max_suggestions(&self) -> usize {
        self.max_suggestions
    }

    /// Replaces every term, including recorded searches, with terms from `items`.
    pub fn build_from(&self, items: &[Item]) -> usize {
        let fresh = AutocompleteTrie::build_from(items, self.extraction);
        let terms = fresh.len();
        *self.trie.write() = fresh;
        tracing::info!(items = items.len(), terms, extraction = ?self.extraction, "autocomplete index built");
        terms
    }

    pub fn insert(&self, term: &str, frequency: u64) {
        self.trie.write().insert(term, frequency);
    }

    /// `limit` defaults to the configured `max_suggestions`.
    pub fn suggest(&self, prefix: &str, limit: Option<usize>) -> Vec<String> {
        self.trie.read().suggest(prefix, limit.unwrap_or(self.max_suggestions))
    }

    pub fn record_search(&self, query: &str) {
        self.trie.write().record_search(query);
    }

    pub fn popular_terms(&self, limit: usize) -> Vec<(String, u64)> {
        self.trie.read().popular_terms(limit)
    }

    pub fn frequency(&self, term: &str) -> Option<u64> {
        self.trie.read().frequency(term)
    }

    pub fn len(&self) -> usize {
        self.trie.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
