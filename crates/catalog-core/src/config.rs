//! Configuration loader, typed settings and path helpers.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars (nested keys
//! use `__`, e.g. `APP_SEARCH__TITLE_BOOST=1.2`). Every setting has a default, so a missing
//! file is not an error. `expand_path` handles `~` and `${VAR}` in configured paths.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Smallest `top_k` any search accepts.
pub const MIN_TOP_K: usize = 1;

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            other => tracing::warn!(env = other, "unknown RUST_ENV, using base config only"),
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment };
        config.settings()?;
        Ok(config)
    }

    /// Defaults, then the given file, then `APP_*` env vars. The file must exist.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(Error::NotFound(format!("config file {}", path.display())));
        }
        let figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("APP_").split("__"));
        let config = Self { figment };
        config.settings()?;
        Ok(config)
    }

    /// Defaults overlaid with an inline TOML document. Handy for tests and one-off tools.
    pub fn from_toml_str(toml: &str) -> Self {
        let figment = Figment::from(Serialized::defaults(Settings::default())).merge(Toml::string(toml));
        Self { figment }
    }

    pub fn defaults() -> Self {
        Self { figment: Figment::from(Serialized::defaults(Settings::default())) }
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// Typed view over the merged configuration, validated.
    pub fn settings(&self) -> Result<Settings> {
        let settings: Settings = self
            .figment
            .extract()
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub search: SearchSettings,
    pub suggest: SuggestSettings,
    pub embedding: EmbeddingSettings,
    pub data: DataSettings,
    pub recent: RecentSettings,
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        self.search.validate()?;
        if self.suggest.max_suggestions == 0 {
            return Err(Error::InvalidConfig("suggest.max_suggestions must be at least 1".into()));
        }
        if self.embedding.dim == 0 {
            return Err(Error::InvalidConfig("embedding.dim must be greater than 0".into()));
        }
        Ok(())
    }
}

/// What `search` does with keyword-filter survivors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RerankPolicy {
    /// Skip the similarity pass when the filter kept no more than `top_k` items.
    EarlyReturn,
    /// Always rerank; zero keyword candidates fall back to ranking the whole catalog.
    AlwaysRerank,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub max_query_chars: usize,
    pub default_top_k: usize,
    /// Upper bound the engine itself accepts for `top_k`.
    pub max_top_k: usize,
    /// Upper bound on caller-supplied page sizes at the request layer.
    pub max_limit: usize,
    pub keyword_weight: f32,
    pub semantic_weight: f32,
    /// Multiplier applied when a query term occurs inside the item title.
    pub title_boost: f32,
    /// Keyword scores are clamped to this value after boosting.
    pub keyword_score_ceiling: f32,
    pub rerank_policy: RerankPolicy,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            max_query_chars: 200,
            default_top_k: 10,
            max_top_k: 500,
            max_limit: 100,
            keyword_weight: 0.7,
            semantic_weight: 0.3,
            title_boost: 3.0,
            keyword_score_ceiling: 3.0,
            rerank_policy: RerankPolicy::AlwaysRerank,
        }
    }
}

impl SearchSettings {
    pub fn validate(&self) -> Result<()> {
        if self.max_query_chars == 0 {
            return Err(Error::InvalidConfig("search.max_query_chars must be at least 1".into()));
        }
        if self.max_top_k < MIN_TOP_K || self.max_limit < MIN_TOP_K {
            return Err(Error::InvalidConfig(
                "search.max_top_k and search.max_limit must be at least 1".into(),
            ));
        }
        if !(MIN_TOP_K..=self.max_top_k).contains(&self.default_top_k) {
            return Err(Error::InvalidConfig(format!(
                "search.default_top_k must be between {MIN_TOP_K} and {}",
                self.max_top_k
            )));
        }
        if self.keyword_weight < 0.0 || self.semantic_weight < 0.0 {
            return Err(Error::InvalidConfig("search weights must not be negative".into()));
        }
        if self.title_boost <= 0.0 || self.keyword_score_ceiling <= 0.0 {
            return Err(Error::InvalidConfig(
                "search.title_boost and search.keyword_score_ceiling must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// How autocomplete terms are pulled out of catalog items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermExtraction {
    /// Titles, title words, sectors and tags with fixed weights.
    Weighted,
    /// Words plus 2- and 3-word phrases from the full text, kept when seen twice.
    Ngram,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestSettings {
    pub max_suggestions: usize,
    pub extraction: TermExtraction,
}

impl Default for SuggestSettings {
    fn default() -> Self {
        Self { max_suggestions: 10, extraction: TermExtraction::Weighted }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingBackend {
    /// Sentence-transformer model loaded from `model_dir`.
    Model,
    /// Deterministic token-hash vectors, no model files needed.
    Hash,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    pub backend: EmbeddingBackend,
    pub model_dir: Option<String>,
    pub dim: usize,
    pub max_len: usize,
    /// Query embeddings kept in the LRU cache; 0 disables caching.
    pub query_cache_size: usize,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            backend: EmbeddingBackend::Model,
            model_dir: None,
            dim: 384,
            max_len: 256,
            query_cache_size: 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub catalog_path: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self { catalog_path: "data/listings.json".to_string() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecentSettings {
    pub per_user: usize,
}

impl Default for RecentSettings {
    fn default() -> Self {
        Self { per_user: 10 }
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}
