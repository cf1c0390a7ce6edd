use std::fs;

use tempfile::TempDir;

use catalog_core::catalog::{load_items, parse_items};
use catalog_core::slug::generate_slug;
use catalog_core::{Error, Item};

#[test]
fn load_items_reads_a_catalog_file() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("listings.json");
    fs::write(
        &path,
        r#"[
            {"id": "1", "title": "Pizza Hut", "sector": "Food", "tags": ["pizza"]},
            {"id": 2, "title": "Gold's Gym", "category": "Fitness", "price": 10}
        ]"#,
    )
    .unwrap();

    let items = load_items(&path).expect("load");
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].sector(), "Food");
    assert_eq!(items[1].sector(), "Fitness");
    assert!(items[1].extra.contains_key("price"));
}

#[test]
fn sector_wins_over_legacy_category() {
    let items = parse_items(
        r#"[
            {"id": 1, "title": "Pizza Hut", "sector": "Food", "category": "Restaurants"},
            {"id": 2, "title": "Kidzee", "category": "Education"}
        ]"#,
    )
    .expect("parse");
    assert_eq!(items[0].sector(), "Food");
    assert_eq!(items[0].extra.get("category").and_then(|v| v.as_str()), Some("Restaurants"));
    assert_eq!(items[1].sector(), "Education");
    assert!(items[1].sector.is_none());
}

#[test]
fn load_items_missing_file_is_not_found() {
    let tmp = TempDir::new().unwrap();
    let err = load_items(&tmp.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    assert!(err.is_client_error());
}

#[test]
fn load_items_empty_array_is_fine() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("empty.json");
    fs::write(&path, "[]").unwrap();
    assert!(load_items(&path).expect("load").is_empty());
}

#[test]
fn load_items_rejects_records_without_title() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("bad.json");
    fs::write(&path, r#"[{"id": "1", "title": ""}]"#).unwrap();
    let err = load_items(&path).unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[test]
fn slugs_from_item_titles() {
    let item = Item::new("1", "Domino's Pizza — Express");
    assert_eq!(generate_slug(&item.title), "dominos-pizza-express");
}
