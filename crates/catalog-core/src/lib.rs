#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod catalog;
pub mod config;
pub mod error;
pub mod slug;
pub mod traits;
pub mod types;

pub use config::{Config, RerankPolicy, Settings, TermExtraction};
pub use error::{Error, Result};
pub use traits::Embedder;
pub use types::{EngineStats, Facets, Item, ItemId, MatchType, SearchResult};
