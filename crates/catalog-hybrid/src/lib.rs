//! Two-stage catalog search: keyword pre-filter, embedding rerank, weighted score fusion.
pub mod engine;
pub mod filters;
pub mod fusion;

pub use engine::{HybridSearchEngine, Recommendations, SearchOptions, MAX_RECOMMENDATIONS};
pub use filters::{parse_investment_lakhs, SearchFilters};
pub use fusion::{classify, Weights};
