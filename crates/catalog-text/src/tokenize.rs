use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").expect("valid regex"));
static TITLE_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b[a-z]{3,}\b").expect("valid regex"));
static NGRAM_WORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b[a-z0-9]{2,}\b").expect("valid regex"));

/// Words too common in catalog titles to be useful completions.
pub const STOP_WORDS: &[&str] = &[
    "what", "are", "the", "you", "how", "they", "this", "that", "with", "from", "business",
    "franchise", "opportunity", "available", "good", "your", "about",
];

pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Distinct `\w+` runs of already-lowercased text.
pub fn word_terms(text: &str) -> HashSet<String> {
    WORD.find_iter(text).map(|m| m.as_str().to_string()).collect()
}

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}

/// Title words worth suggesting on their own: three or more ASCII letters, not a stop word.
pub fn title_words(lowered_title: &str) -> impl Iterator<Item = &str> {
    TITLE_WORD
        .find_iter(lowered_title)
        .map(|m| m.as_str())
        .filter(|w| !is_stop_word(w))
}

/// Alphanumeric words of two or more characters, in order of appearance.
pub fn ngram_words(lowered: &str) -> Vec<&str> {
    NGRAM_WORD.find_iter(lowered).map(|m| m.as_str()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_and_outer_space() {
        assert_eq!(normalize_query("  Gaming LAPTOP "), "gaming laptop");
    }

    #[test]
    fn word_terms_split_on_non_word_chars() {
        let terms = word_terms("pizza-hut, pizza & co_op");
        let mut v: Vec<_> = terms.into_iter().collect();
        v.sort();
        assert_eq!(v, vec!["co_op", "hut", "pizza"]);
    }

    #[test]
    fn title_words_skip_short_and_stop_words() {
        let words: Vec<_> = title_words("the best pizza franchise in goa").collect();
        assert_eq!(words, vec!["best", "pizza", "goa"]);
    }

    #[test]
    fn ngram_words_keep_digits() {
        assert_eq!(ngram_words("top 10 gyms a b"), vec!["top", "10", "gyms"]);
    }
}
