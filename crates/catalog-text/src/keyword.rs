//! Keyword pre-filter.
//!
//! Scores each catalog item by the share of query terms it contains, boosts items whose
//! title contains a query term, and drops items with no overlap at all.

use std::collections::HashSet;

use catalog_core::Item;

use crate::tokenize::word_terms;

/// Per-item lexical data, computed once at index time.
#[derive(Debug, Clone, Default)]
pub struct DocTerms {
    title: String,
    terms: HashSet<String>,
}

impl DocTerms {
    pub fn from_item(item: &Item) -> Self {
        let text = item.searchable_text().to_lowercase();
        Self { title: item.title.to_lowercase(), terms: word_terms(&text) }
    }
}

/// A surviving candidate: its catalog position and clamped keyword score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeywordMatch {
    pub index: usize,
    pub score: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct KeywordFilter {
    title_boost: f32,
    ceiling: f32,
}

impl KeywordFilter {
    pub fn new(title_boost: f32, ceiling: f32) -> Self {
        Self { title_boost, ceiling }
    }

    /// `|Q ∩ T| / |Q|`, boosted when any query term occurs in the title, then clamped.
    pub fn score(&self, query_terms: &HashSet<String>, doc: &DocTerms) -> f32 {
        if query_terms.is_empty() {
            return 0.0;
        }
        let overlap = query_terms.iter().filter(|t| doc.terms.contains(*t)).count();
        if overlap == 0 {
            return 0.0;
        }
        let mut score = overlap as f32 / query_terms.len() as f32;
        if query_terms.iter().any(|t| doc.title.contains(t.as_str())) {
            score *= self.title_boost;
        }
        score.min(self.ceiling)
    }

    /// Candidates in catalog order. `normalized_query` must already be trimmed and lowercased.
    pub fn filter(&self, normalized_query: &str, docs: &[DocTerms]) -> Vec<KeywordMatch> {
        let query_terms = word_terms(normalized_query);
        let matches: Vec<KeywordMatch> = docs
            .iter()
            .enumerate()
            .filter_map(|(index, doc)| {
                let score = self.score(&query_terms, doc);
                (score > 0.0).then_some(KeywordMatch { index, score })
            })
            .collect();
        tracing::debug!(terms = query_terms.len(), candidates = matches.len(), "keyword filter");
        matches
    }
}
