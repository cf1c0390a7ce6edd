//! Domain types shared by the keyword, vector and hybrid engines.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// Unrecognised item keys, kept verbatim so records round-trip through the engine.
pub type Extra = serde_json::Map<String, serde_json::Value>;

/// Item identity. Catalog files carry either strings or integers; both compare by their
/// string form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Int(i64),
    Str(String),
}

impl ItemId {
    pub fn as_key(&self) -> String {
        self.to_string()
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, ItemId::Str(s) if s.trim().is_empty())
    }
}

impl Default for ItemId {
    fn default() -> Self {
        ItemId::Str(String::new())
    }
}

impl PartialEq for ItemId {
    fn eq(&self, other: &Self) -> bool {
        self.as_key() == other.as_key()
    }
}

impl Eq for ItemId {}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Int(n) => write!(f, "{n}"),
            ItemId::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        ItemId::Str(s.to_string())
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        ItemId::Str(s)
    }
}

impl From<i64> for ItemId {
    fn from(n: i64) -> Self {
        ItemId::Int(n)
    }
}

/// A searchable catalog record: a franchise listing, a blog post or a page.
///
/// - `id` / `title`: required; `title` must be non-blank
/// - `sector`: older catalog files call it `category`, which stays in `extra` and is only
///   read when `sector` is absent
/// - `post_type`: content kind (`listing`, `blog`, `page`)
/// - `extra`: any other keys, preserved but not interpreted
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(default)]
    pub id: ItemId,
    #[serde(default, deserialize_with = "nullable")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sector: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub investment_range: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Item {
    pub fn new(id: impl Into<ItemId>, title: impl Into<String>) -> Self {
        Self { id: id.into(), title: title.into(), ..Self::default() }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_sector(mut self, sector: impl Into<String>) -> Self {
        self.sector = Some(sector.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_investment_range(mut self, range: impl Into<String>) -> Self {
        self.investment_range = Some(range.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_post_type(mut self, post_type: impl Into<String>) -> Self {
        self.post_type = Some(post_type.into());
        self
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }

    pub fn sector(&self) -> &str {
        match &self.sector {
            Some(sector) => sector,
            None => self.extra.get("category").and_then(|v| v.as_str()).unwrap_or_default(),
        }
    }

    pub fn location(&self) -> &str {
        self.location.as_deref().unwrap_or_default()
    }

    pub fn investment_range(&self) -> &str {
        self.investment_range.as_deref().unwrap_or_default()
    }

    pub fn post_type(&self) -> &str {
        self.post_type.as_deref().unwrap_or_default()
    }

    pub fn slug(&self) -> &str {
        self.slug.as_deref().unwrap_or_default()
    }

    /// Text used for both keyword matching and embedding: title, description, sector,
    /// location, investment range and tags, in that order.
    pub fn searchable_text(&self) -> String {
        [
            self.title.as_str(),
            self.description(),
            self.sector(),
            self.location(),
            self.investment_range(),
            &self.tags.join(" "),
        ]
        .join(" ")
        .trim()
        .to_string()
    }

    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.id.is_blank() {
            missing.push("id");
        }
        if self.title.trim().is_empty() {
            missing.push("title");
        }
        missing
    }

    /// Checks the required fields. `position` is the record's index within a batch, when
    /// there is one, and is echoed back in the error.
    pub fn validate(&self, position: Option<usize>) -> Result<()> {
        let missing = self.missing_fields();
        if missing.is_empty() {
            return Ok(());
        }
        let subject = match position {
            Some(i) => format!("item {i}"),
            None => "item".to_string(),
        };
        Err(Error::validation(format!(
            "{subject} missing required fields: {}",
            missing.join(", ")
        )))
    }
}

/// How a result earned its place in the ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Keyword,
    Semantic,
    Hybrid,
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MatchType::Keyword => "keyword",
            MatchType::Semantic => "semantic",
            MatchType::Hybrid => "hybrid",
        })
    }
}

/// An item augmented with per-query scores. Never persisted.
///
/// Serialises flat. Extension keys named like a score field are dropped from the output so
/// the computed value is the only one.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResult {
    #[serde(flatten)]
    pub item: Item,
    pub keyword_score: f32,
    pub semantic_score: f32,
    pub score: f32,
    pub match_type: MatchType,
}

const RESULT_FIELDS: [&str; 4] = ["keyword_score", "semantic_score", "score", "match_type"];

#[derive(Serialize)]
struct FlatResult<'a> {
    #[serde(flatten)]
    item: Cow<'a, Item>,
    keyword_score: f32,
    semantic_score: f32,
    score: f32,
    match_type: MatchType,
}

impl Serialize for SearchResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let collides = RESULT_FIELDS.iter().any(|k| self.item.extra.contains_key(*k));
        let item = if collides {
            let mut item = self.item.clone();
            item.extra.retain(|k, _| !RESULT_FIELDS.contains(&k.as_str()));
            Cow::Owned(item)
        } else {
            Cow::Borrowed(&self.item)
        };
        FlatResult {
            item,
            keyword_score: self.keyword_score,
            semantic_score: self.semantic_score,
            score: self.score,
            match_type: self.match_type,
        }
        .serialize(serializer)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineStats {
    pub catalog_size: usize,
    pub embedding_dim: usize,
    pub embedder_id: String,
    pub total_searches: u64,
}

/// Distinct filter values present in the current catalog, sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facets {
    pub sectors: Vec<String>,
    pub locations: Vec<String>,
    pub investment_ranges: Vec<String>,
}
