use std::collections::HashMap;

use catalog_core::config::TermExtraction;
use catalog_core::Item;
use catalog_text::tokenize::{ngram_words, title_words};

const TITLE_WEIGHT: u64 = 10;
const TITLE_WORD_WEIGHT: u64 = 5;
const SECTOR_WEIGHT: u64 = 8;
const TAG_WEIGHT: u64 = 5;
const MIN_TERM_CHARS: usize = 3;

const BIGRAM_MAX_CHARS: usize = 30;
const TRIGRAM_MAX_CHARS: usize = 40;
const MIN_NGRAM_COUNT: u64 = 2;

/// `(term, frequency)` pairs to seed the trie with.
pub fn extract_terms(items: &[Item], extraction: TermExtraction) -> Vec<(String, u64)> {
    match extraction {
        TermExtraction::Weighted => weighted_terms(items),
        TermExtraction::Ngram => ngram_terms(items),
    }
}

fn weighted_terms(items: &[Item]) -> Vec<(String, u64)> {
    let mut weights: HashMap<String, u64> = HashMap::new();
    for item in items {
        let title = item.title.to_lowercase();
        if !title.is_empty() {
            *weights.entry(title.clone()).or_default() += TITLE_WEIGHT;
            for word in title_words(&title) {
                *weights.entry(word.to_string()).or_default() += TITLE_WORD_WEIGHT;
            }
        }
        let sector = item.sector().to_lowercase();
        if !sector.is_empty() {
            *weights.entry(sector).or_default() += SECTOR_WEIGHT;
        }
        for tag in &item.tags {
            let tag = tag.to_lowercase();
            if !tag.is_empty() {
                *weights.entry(tag).or_default() += TAG_WEIGHT;
            }
        }
    }
    weights
        .into_iter()
        .filter(|(term, _)| term.chars().count() >= MIN_TERM_CHARS)
        .collect()
}

fn ngram_terms(items: &[Item]) -> Vec<(String, u64)> {
    let mut counts: HashMap<String, u64> = HashMap::new();
    for item in items {
        let text = [item.title.as_str(), item.description(), item.sector(), &item.tags.join(" ")]
            .join(" ")
            .to_lowercase();

        let words: Vec<&str> = text.split_whitespace().collect();
        for (i, pair) in words.windows(2).enumerate() {
            let bigram = pair.join(" ");
            if bigram.chars().count() <= BIGRAM_MAX_CHARS {
                *counts.entry(bigram).or_default() += 1;
            }
            if let Some(third) = words.get(i + 2) {
                let trigram = format!("{} {} {}", pair[0], pair[1], third);
                if trigram.chars().count() <= TRIGRAM_MAX_CHARS {
                    *counts.entry(trigram).or_default() += 1;
                }
            }
        }
        for word in ngram_words(&text) {
            *counts.entry(word.to_string()).or_default() += 1;
        }
    }
    counts.into_iter().filter(|(_, n)| *n >= MIN_NGRAM_COUNT).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(terms: &[(String, u64)], term: &str) -> Option<u64> {
        terms.iter().find(|(t, _)| t == term).map(|(_, f)| *f)
    }

    #[test]
    fn weighted_accumulates_across_items() {
        let items = vec![
            Item::new(1, "Pizza Hut").with_sector("Food").with_tags(["pizza"]),
            Item::new(2, "The Pizza Franchise").with_sector("Food"),
        ];
        let terms = extract_terms(&items, TermExtraction::Weighted);
        assert_eq!(lookup(&terms, "pizza hut"), Some(10));
        // title word twice plus one tag
        assert_eq!(lookup(&terms, "pizza"), Some(15));
        assert_eq!(lookup(&terms, "food"), Some(16));
        assert_eq!(lookup(&terms, "hut"), Some(5));
        assert_eq!(lookup(&terms, "the"), None);
        assert_eq!(lookup(&terms, "franchise"), None);
    }

    #[test]
    fn weighted_drops_short_terms() {
        let items = vec![Item::new(1, "Go").with_sector("IT").with_tags(["ai", "edtech"])];
        let terms = extract_terms(&items, TermExtraction::Weighted);
        assert_eq!(terms, vec![("edtech".to_string(), 5)]);
    }

    #[test]
    fn ngram_keeps_repeated_words_and_phrases() {
        let items = vec![
            Item::new(1, "Pizza Hut").with_description("pizza hut delivery"),
            Item::new(2, "Burger King"),
        ];
        let terms = extract_terms(&items, TermExtraction::Ngram);
        assert_eq!(lookup(&terms, "pizza"), Some(2));
        assert_eq!(lookup(&terms, "pizza hut"), Some(2));
        assert_eq!(lookup(&terms, "burger"), None);
        assert_eq!(lookup(&terms, "delivery"), None);
    }
}
