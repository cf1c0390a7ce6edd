use std::cmp::Ordering;

use catalog_core::{Item, MatchType, SearchResult};

/// Above this, a component counts as a strong signal for `hybrid` classification.
const STRONG_SIGNAL: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub keyword: f32,
    pub semantic: f32,
}

impl Weights {
    pub fn combine(&self, keyword_score: f32, semantic_score: f32) -> f32 {
        self.keyword * keyword_score + self.semantic * semantic_score
    }
}

pub fn classify(keyword_score: f32, semantic_score: f32) -> MatchType {
    if keyword_score > STRONG_SIGNAL && semantic_score > STRONG_SIGNAL {
        MatchType::Hybrid
    } else if keyword_score > semantic_score {
        MatchType::Keyword
    } else {
        MatchType::Semantic
    }
}

pub fn fuse(item: &Item, keyword_score: f32, semantic_score: f32, weights: Weights) -> SearchResult {
    SearchResult {
        item: item.clone(),
        keyword_score,
        semantic_score,
        score: weights.combine(keyword_score, semantic_score),
        match_type: classify(keyword_score, semantic_score),
    }
}

/// Stable sort by score, best first, then cut to `top_k`.
pub fn rank(results: &mut Vec<SearchResult>, top_k: usize) {
    results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    results.truncate(top_k);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_thresholds() {
        assert_eq!(classify(1.0, 0.8), MatchType::Hybrid);
        assert_eq!(classify(0.5, 0.9), MatchType::Semantic);
        assert_eq!(classify(3.0, 0.2), MatchType::Keyword);
        assert_eq!(classify(0.3, 0.3), MatchType::Semantic);
    }

    #[test]
    fn fused_score_is_weighted_sum() {
        let w = Weights { keyword: 0.7, semantic: 0.3 };
        let r = fuse(&Item::new(1, "x"), 1.0, 0.5, w);
        assert!((r.score - 0.85).abs() < 1e-6);
        assert_eq!(r.match_type, MatchType::Keyword);
    }

    #[test]
    fn rank_is_stable_for_ties() {
        let w = Weights { keyword: 1.0, semantic: 0.0 };
        let mut results = vec![
            fuse(&Item::new("a", "a"), 0.5, 0.0, w),
            fuse(&Item::new("b", "b"), 1.0, 0.0, w),
            fuse(&Item::new("c", "c"), 0.5, 0.0, w),
        ];
        rank(&mut results, 2);
        let ids: Vec<String> = results.iter().map(|r| r.item.id.to_string()).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }
}
