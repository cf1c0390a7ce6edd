use catalog_core::Item;
use catalog_text::{normalize_query, DocTerms, KeywordFilter};
use proptest::prelude::*;

fn catalog() -> Vec<Item> {
    vec![
        Item::new("1", "Pizza Hut")
            .with_description("Quick service pizza restaurant")
            .with_sector("Food & Beverage")
            .with_tags(["pizza", "qsr"]),
        Item::new("2", "Gold's Gym")
            .with_description("Fitness centre chain")
            .with_sector("Fitness")
            .with_location("Mumbai"),
        Item::new("3", "Pizza Academy")
            .with_description("Cooking classes")
            .with_sector("Education"),
    ]
}

#[test]
fn pizza_query_prefers_title_hits() {
    let docs: Vec<DocTerms> = catalog().iter().map(DocTerms::from_item).collect();
    let filter = KeywordFilter::new(3.0, 3.0);
    let matches = filter.filter(&normalize_query("  PIZZA restaurant "), &docs);

    let indices: Vec<usize> = matches.iter().map(|m| m.index).collect();
    assert_eq!(indices, vec![0, 2]);
    // both terms present, title hit: 1.0 * 3.0
    assert_eq!(matches[0].score, 3.0);
    // one of two terms, title hit: 0.5 * 3.0
    assert_eq!(matches[1].score, 1.5);
}

#[test]
fn sector_and_location_are_searchable() {
    let docs: Vec<DocTerms> = catalog().iter().map(DocTerms::from_item).collect();
    let filter = KeywordFilter::new(3.0, 3.0);
    let matches = filter.filter("mumbai", &docs);
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].index, 1);
}

proptest! {
    #[test]
    fn scores_stay_within_ceiling(query in "[a-z ]{1,30}", boost in 1.0f32..5.0, ceiling in 0.5f32..3.0) {
        let docs: Vec<DocTerms> = catalog().iter().map(DocTerms::from_item).collect();
        let filter = KeywordFilter::new(boost, ceiling);
        let matches = filter.filter(&query, &docs);
        let mut last = None;
        for m in matches {
            prop_assert!(m.score > 0.0 && m.score <= ceiling);
            prop_assert!(last.map_or(true, |prev| m.index > prev));
            last = Some(m.index);
        }
    }
}
