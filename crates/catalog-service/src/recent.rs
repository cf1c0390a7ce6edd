use std::collections::{HashMap, VecDeque};

use parking_lot::Mutex;

use catalog_core::{Error, Result};

/// Per-user most-recent-first search history, without duplicates.
pub struct RecentSearches {
    per_user: usize,
    by_user: Mutex<HashMap<String, VecDeque<String>>>,
}

impl RecentSearches {
    pub fn new(per_user: usize) -> Self {
        Self { per_user, by_user: Mutex::new(HashMap::new()) }
    }

    pub fn record(&self, user_id: &str, query: &str) -> Result<()> {
        let (user_id, query) = (user_id.trim(), query.trim());
        if user_id.is_empty() || query.is_empty() {
            return Err(Error::Validation("user_id and query must not be empty".into()));
        }
        let mut by_user = self.by_user.lock();
        let searches = by_user.entry(user_id.to_string()).or_default();
        searches.retain(|q| q != query);
        searches.push_front(query.to_string());
        searches.truncate(self.per_user);
        Ok(())
    }

    pub fn get(&self, user_id: &str) -> Vec<String> {
        self.by_user
            .lock()
            .get(user_id.trim())
            .map(|q| q.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn clear(&self, user_id: &str) {
        self.by_user.lock().remove(user_id.trim());
    }
}
