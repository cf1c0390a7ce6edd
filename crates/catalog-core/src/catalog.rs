//! Catalog file loading.
//!
//! A catalog file is a JSON array of item objects. Every record is checked for its required
//! fields before anything is returned, so a bad record rejects the whole file.

use std::fs;
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::Item;

pub fn load_items(path: &Path) -> Result<Vec<Item>> {
    if !path.exists() {
        return Err(Error::NotFound(format!("catalog file {}", path.display())));
    }
    let raw = fs::read_to_string(path)?;
    let items = parse_items(&raw)?;
    tracing::info!(path = %path.display(), items = items.len(), "loaded catalog");
    Ok(items)
}

pub fn parse_items(raw: &str) -> Result<Vec<Item>> {
    let items: Vec<Item> = serde_json::from_str(raw)?;
    validate_items(&items)?;
    Ok(items)
}

/// Checks every record; the first failure names its position in the batch.
pub fn validate_items(items: &[Item]) -> Result<()> {
    items
        .iter()
        .enumerate()
        .try_for_each(|(i, item)| item.validate(Some(i)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mixed_id_kinds() {
        let items = parse_items(r#"[{"id": 1, "title": "A"}, {"id": "b", "title": "B"}]"#)
            .expect("parse");
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].id.to_string(), "b");
    }

    #[test]
    fn second_bad_record_is_reported_by_position() {
        let err = parse_items(r#"[{"id": 1, "title": "A"}, {"id": 2}]"#).unwrap_err();
        assert!(err.to_string().contains("item 1 missing required fields: title"));
    }

    #[test]
    fn non_array_is_a_json_error() {
        assert!(matches!(parse_items(r#"{"id": 1}"#), Err(Error::Json(_))));
    }
}
