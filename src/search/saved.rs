//! Persisted saved searches with synchronous change notification.
//!
//! The store is a small CRUD list held behind an interior mutex so one shared
//! instance can serve every view. Each mutation persists the whole list and
//! notifies subscribers before returning, so a write is visible to every
//! reader by the time the call completes.

use std::path::PathBuf;
use std::sync::Mutex;

use chrono::Utc;
use tracing::{debug, warn};

use crate::models::{SavedSearch, SearchFilters};
use crate::storage;

/// Store file name inside the data directory
const STORE_FILE: &str = "saved_searches.json";

pub type SubscriberId = u64;

type Subscriber = Box<dyn Fn(&[SavedSearch]) + Send + Sync>;

#[derive(Default)]
struct Subscribers {
    entries: Vec<(SubscriberId, Subscriber)>,
    next_id: SubscriberId,
}

pub struct SavedSearchStore {
    path: PathBuf,
    searches: Mutex<Vec<SavedSearch>>,
    // Separate lock so a subscriber callback may call back into the store
    // without deadlocking on the data lock.
    subscribers: Mutex<Subscribers>,
}

impl SavedSearchStore {
    pub fn new(data_dir: PathBuf) -> Self {
        let path = data_dir.join(STORE_FILE);
        let searches: Vec<SavedSearch> = storage::load_json(&path);
        debug!(count = searches.len(), path = %path.display(), "Opened saved-search store");
        SavedSearchStore {
            path,
            searches: Mutex::new(searches),
            subscribers: Mutex::new(Subscribers::default()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<SavedSearch>> {
        self.searches.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Save a search. The name defaults to the query text; filters are
    /// stripped of empty and "all" values. Notifies subscribers before
    /// returning the new entry.
    pub fn add(
        &self,
        query: &str,
        name: Option<&str>,
        filters: Option<SearchFilters>,
    ) -> SavedSearch {
        let entry = {
            let mut searches = self.lock();
            let entry = SavedSearch {
                id: Self::next_id(&searches),
                query: query.to_string(),
                name: name.unwrap_or(query).to_string(),
                created_at: Utc::now(),
                filters: filters.and_then(SearchFilters::normalized),
            };
            searches.push(entry.clone());
            self.persist(&searches);
            entry
        };
        self.notify();
        entry
    }

    pub fn remove(&self, id: &str) {
        {
            let mut searches = self.lock();
            searches.retain(|s| s.id != id);
            self.persist(&searches);
        }
        self.notify();
    }

    pub fn rename(&self, id: &str, new_name: &str) {
        {
            let mut searches = self.lock();
            if let Some(entry) = searches.iter_mut().find(|s| s.id == id) {
                entry.name = new_name.to_string();
            }
            self.persist(&searches);
        }
        self.notify();
    }

    pub fn clear(&self) {
        {
            let mut searches = self.lock();
            searches.clear();
            if let Err(e) = storage::remove(&self.path) {
                warn!(path = %self.path.display(), error = %e, "Failed to remove saved-search file");
            }
        }
        self.notify();
    }

    pub fn list(&self) -> Vec<SavedSearch> {
        self.lock().clone()
    }

    /// Register a callback invoked synchronously after every mutation.
    pub fn subscribe(&self, callback: Subscriber) -> SubscriberId {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        let id = subscribers.next_id;
        subscribers.next_id += 1;
        subscribers.entries.push((id, callback));
        id
    }

    pub fn unsubscribe(&self, id: SubscriberId) {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        subscribers.entries.retain(|(sub_id, _)| *sub_id != id);
    }

    fn notify(&self) {
        let snapshot = self.list();
        let subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(|e| e.into_inner());
        for (_, callback) in &subscribers.entries {
            callback(&snapshot);
        }
    }

    /// Millisecond-timestamp ids, suffixed on the rare same-millisecond add.
    fn next_id(existing: &[SavedSearch]) -> String {
        let base = Utc::now().timestamp_millis().to_string();
        if !existing.iter().any(|s| s.id == base) {
            return base;
        }
        let mut n = 1;
        loop {
            let candidate = format!("{}-{}", base, n);
            if !existing.iter().any(|s| s.id == candidate) {
                return candidate;
            }
            n += 1;
        }
    }

    fn persist(&self, searches: &[SavedSearch]) {
        if let Err(e) = storage::save_json(&self.path, &searches) {
            warn!(path = %self.path.display(), error = %e, "Failed to persist saved searches");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn temp_store(name: &str) -> SavedSearchStore {
        let dir = std::env::temp_dir().join(format!(
            "hamlet-saved-{}-{}",
            std::process::id(),
            name
        ));
        let _ = std::fs::remove_dir_all(&dir);
        SavedSearchStore::new(dir)
    }

    #[test]
    fn test_add_strips_empty_and_all_filters() {
        let store = temp_store("filters");
        store.add(
            "zoning board",
            None,
            Some(SearchFilters {
                kind: Some("project".to_string()),
                location: None,
            }),
        );

        let searches = store.list();
        assert_eq!(searches.len(), 1);
        assert_eq!(searches[0].name, "zoning board");
        let filters = searches[0].filters.as_ref().unwrap();
        assert_eq!(filters.kind.as_deref(), Some("project"));
        assert!(filters.location.is_none());
    }

    #[test]
    fn test_all_only_filters_become_none() {
        let store = temp_store("all-filters");
        store.add(
            "council",
            Some("My council search"),
            Some(SearchFilters {
                kind: Some("all".to_string()),
                location: Some(String::new()),
            }),
        );
        let searches = store.list();
        assert!(searches[0].filters.is_none());
        assert_eq!(searches[0].name, "My council search");
    }

    #[test]
    fn test_remove_and_rename() {
        let store = temp_store("crud");
        let first = store.add("zoning", None, None);
        let second = store.add("budget", None, None);
        assert_ne!(first.id, second.id);

        store.rename(&first.id, "Zoning watch");
        assert_eq!(store.list()[0].name, "Zoning watch");

        store.remove(&first.id);
        let remaining = store.list();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, second.id);
    }

    #[test]
    fn test_notify_is_synchronous() {
        let store = temp_store("notify");
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_clone = Arc::clone(&seen);
        let id = store.subscribe(Box::new(move |searches| {
            seen_clone.store(searches.len(), Ordering::SeqCst);
        }));

        store.add("council", None, None);
        assert_eq!(seen.load(Ordering::SeqCst), 1);
        store.add("budget", None, None);
        assert_eq!(seen.load(Ordering::SeqCst), 2);

        store.unsubscribe(id);
        store.clear();
        // Unsubscribed, last observed value unchanged
        assert_eq!(seen.load(Ordering::SeqCst), 2);
        assert!(store.list().is_empty());
    }

    #[test]
    fn test_persists_across_instances() {
        let dir = std::env::temp_dir().join(format!("hamlet-saved-{}-reload", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);

        let store = SavedSearchStore::new(dir.clone());
        store.add("zoning", None, None);
        drop(store);

        let reloaded = SavedSearchStore::new(dir);
        assert_eq!(reloaded.list().len(), 1);
        assert_eq!(reloaded.list()[0].query, "zoning");
    }
}
