//! catalog-text
//!
//! Lexical side of the catalog search: query normalisation, term extraction and the keyword
//! pre-filter that picks candidates for the embedding rerank.
pub mod keyword;
pub mod tokenize;

pub use keyword::{DocTerms, KeywordFilter, KeywordMatch};
pub use tokenize::{normalize_query, word_terms};
