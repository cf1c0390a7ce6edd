//! Post-search result filters.
//!
//! `post_type` and `sector` compare case-insensitively, `location` is a case-insensitive
//! substring match, and the investment window is in lakhs, read from the item's
//! `investment_range` text (e.g. `₹10L-₹20L`).

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use catalog_core::{Item, SearchResult};

static LAKHS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)L").expect("valid regex"));

/// `(min, max)` in lakhs: the first and last `<n>L` numbers in the text.
pub fn parse_investment_lakhs(range: &str) -> Option<(u64, u64)> {
    let numbers: Vec<u64> = LAKHS
        .captures_iter(range)
        .filter_map(|c| c.get(1)?.as_str().parse().ok())
        .collect();
    Some((*numbers.first()?, *numbers.last()?))
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    pub post_type: Option<String>,
    pub sector: Option<String>,
    pub location: Option<String>,
    pub min_investment: Option<u64>,
    pub max_investment: Option<u64>,
}

impl SearchFilters {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn investment_window_set(&self) -> bool {
        self.min_investment.is_some() || self.max_investment.is_some()
    }

    pub fn matches(&self, item: &Item) -> bool {
        if let Some(want) = &self.post_type {
            if !item.post_type().eq_ignore_ascii_case(want) {
                return false;
            }
        }
        if let Some(want) = &self.sector {
            if item.sector().to_lowercase() != want.to_lowercase() {
                return false;
            }
        }
        if let Some(want) = &self.location {
            if !item.location().to_lowercase().contains(&want.to_lowercase()) {
                return false;
            }
        }
        if self.investment_window_set() {
            let Some((min_val, max_val)) = parse_investment_lakhs(item.investment_range()) else {
                return false;
            };
            if self.min_investment.is_some_and(|min| max_val < min) {
                return false;
            }
            if self.max_investment.is_some_and(|max| min_val > max) {
                return false;
            }
        }
        true
    }

    pub fn apply(&self, results: Vec<SearchResult>) -> Vec<SearchResult> {
        if self.is_empty() {
            return results;
        }
        results.into_iter().filter(|r| self.matches(&r.item)).collect()
    }
}
