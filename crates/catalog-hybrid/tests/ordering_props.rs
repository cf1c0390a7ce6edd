use catalog_core::config::SearchSettings;
use catalog_core::Item;
use catalog_embed::HashEmbedder;
use catalog_hybrid::{HybridSearchEngine, SearchOptions};
use catalog_vector::LocalProvider;
use proptest::prelude::*;

const WORDS: &[&str] = &["pizza", "gym", "coffee", "school", "salon", "burger", "yoga", "tea"];

fn catalog() -> Vec<Item> {
    WORDS
        .iter()
        .enumerate()
        .map(|(i, w)| {
            Item::new(i as i64, format!("{w} house"))
                .with_description(format!("{} and {}", w, WORDS[(i + 3) % WORDS.len()]))
        })
        .collect()
}

proptest! {
    #[test]
    fn scores_never_increase_and_top_k_bounds(
        picks in prop::collection::vec(0usize..WORDS.len(), 1..4),
        top_k in 1usize..10,
    ) {
        let engine = HybridSearchEngine::new(
            Box::new(LocalProvider::new(Box::new(HashEmbedder::new(32)))),
            SearchSettings::default(),
        );
        engine.index(catalog()).unwrap();
        let query: Vec<&str> = picks.iter().map(|&i| WORDS[i]).collect();
        let results = engine.search(&query.join(" "), &SearchOptions::top_k(top_k)).unwrap();

        prop_assert!(results.len() <= top_k);
        for pair in results.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
        let titles: Vec<String> = catalog().into_iter().map(|i| i.title).collect();
        for r in &results {
            prop_assert!(titles.contains(&r.item.title));
        }
    }
}
