use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::generator::{
    DataGenerator, DEFAULT_AGENDA_COUNT, DEFAULT_MEETING_COUNT, DEFAULT_PROJECT_COUNT,
};
use crate::models::{Agenda, Location, Meeting, Project};
use crate::storage;

/// Maximum number of location bundles retained. Insertion beyond this evicts
/// the oldest-generated entries first.
pub const MAX_CACHED_LOCATIONS: usize = 100;

/// Store file name inside the cache directory
const STORE_FILE: &str = "location_data.json";

/// Everything generated for one location, stamped once at synthesis.
/// `generatedAt` never changes on a cache hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationBundle {
    pub meetings: Vec<Meeting>,
    pub projects: Vec<Project>,
    pub agendas: Vec<Agenda>,
    #[serde(rename = "generatedAt")]
    pub generated_at: DateTime<Utc>,
}

impl LocationBundle {
    pub fn empty() -> Self {
        LocationBundle {
            meetings: Vec::new(),
            projects: Vec::new(),
            agendas: Vec::new(),
            generated_at: Utc::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.meetings.is_empty() && self.projects.is_empty() && self.agendas.is_empty()
    }
}

/// Observability counters for the store. Reported best-effort; any failure
/// shows up as zeros rather than an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub location_count: usize,
    pub approximate_size_kb: u64,
}

/// Generate-on-miss store of location bundles, persisted as a single JSON
/// blob. Interior mutex so a shared instance keeps last-write-wins ordering.
pub struct LocationCache {
    path: PathBuf,
    generator: Box<dyn DataGenerator + Send + Sync>,
    entries: Mutex<HashMap<String, LocationBundle>>,
}

impl LocationCache {
    /// Open (or start) the store backed by `cache_dir`. Whatever is on disk
    /// is loaded tolerantly; a corrupt blob just means starting empty.
    pub fn new(cache_dir: PathBuf, generator: Box<dyn DataGenerator + Send + Sync>) -> Self {
        let path = cache_dir.join(STORE_FILE);
        let entries: HashMap<String, LocationBundle> = storage::load_json(&path);
        debug!(locations = entries.len(), path = %path.display(), "Opened location cache");
        LocationCache {
            path,
            generator,
            entries: Mutex::new(entries),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, LocationBundle>> {
        // A poisoned lock means a panic mid-write; the map itself is still
        // structurally sound, so keep serving it.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Fetch the bundle for a location, synthesizing and storing it on miss.
    /// Cached bundles are returned unchanged; there is no expiry.
    ///
    /// Storage failures are swallowed: the freshly generated bundle is still
    /// returned, it just will not survive a restart.
    pub fn get(&self, location_id: &str, display_name: &str, region: &str) -> LocationBundle {
        if location_id.is_empty() || display_name.is_empty() {
            return LocationBundle::empty();
        }

        let mut entries = self.lock();
        if let Some(bundle) = entries.get(location_id) {
            return bundle.clone();
        }

        debug!(location = location_id, "Cache miss, generating bundle");
        let bundle = LocationBundle {
            meetings: self
                .generator
                .meetings(location_id, display_name, region, DEFAULT_MEETING_COUNT),
            projects: self
                .generator
                .projects(location_id, display_name, region, DEFAULT_PROJECT_COUNT),
            agendas: self
                .generator
                .agendas(location_id, display_name, region, DEFAULT_AGENDA_COUNT),
            generated_at: Utc::now(),
        };

        entries.insert(location_id.to_string(), bundle.clone());
        Self::evict_overflow(&mut entries);
        self.persist(&entries);
        bundle
    }

    /// Drop entries beyond the bound, oldest `generatedAt` first.
    ///
    /// Note this evicts by creation time, not last access, so an old entry
    /// that is read constantly still goes before a rarely-read new one.
    fn evict_overflow(entries: &mut HashMap<String, LocationBundle>) {
        if entries.len() <= MAX_CACHED_LOCATIONS {
            return;
        }

        let mut by_age: Vec<(String, DateTime<Utc>)> = entries
            .iter()
            .map(|(key, bundle)| (key.clone(), bundle.generated_at))
            .collect();
        by_age.sort_by(|a, b| b.1.cmp(&a.1));

        for (key, _) in by_age.into_iter().skip(MAX_CACHED_LOCATIONS) {
            debug!(location = %key, "Evicting oldest cached location");
            entries.remove(&key);
        }
    }

    /// Remove a single location, or wipe the store entirely.
    pub fn clear(&self, location_id: Option<&str>) {
        let mut entries = self.lock();
        match location_id {
            Some(key) => {
                entries.remove(key);
            }
            None => entries.clear(),
        }
        self.persist(&entries);
    }

    /// Pre-generate bundles for a set of locations if the store is empty.
    pub fn warm<'a>(&self, locations: impl IntoIterator<Item = &'a Location>) -> usize {
        if !self.lock().is_empty() {
            return 0;
        }

        let mut warmed = 0;
        for location in locations {
            self.get(&location.id, &location.name, &location.state);
            warmed += 1;
        }
        debug!(locations = warmed, "Warmed location cache");
        warmed
    }

    /// Current entry count and serialized size. Never fails.
    pub fn stats(&self) -> CacheStats {
        let entries = self.lock();
        let approximate_size_kb = match serde_json::to_string(&*entries) {
            Ok(json) => (json.len() / 1024) as u64,
            Err(_) => 0,
        };
        CacheStats {
            location_count: entries.len(),
            approximate_size_kb,
        }
    }

    /// Snapshot of every cached bundle, for the search aggregator.
    pub fn all_bundles(&self) -> Vec<(String, LocationBundle)> {
        self.lock()
            .iter()
            .map(|(key, bundle)| (key.clone(), bundle.clone()))
            .collect()
    }

    fn persist(&self, entries: &HashMap<String, LocationBundle>) {
        if let Err(e) = storage::save_json(&self.path, entries) {
            warn!(path = %self.path.display(), error = %e, "Failed to persist location cache");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MeetingKind;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Deterministic generator that counts invocations through a shared counter.
    #[derive(Default)]
    struct CountingGenerator {
        calls: Arc<AtomicUsize>,
    }

    impl DataGenerator for CountingGenerator {
        fn meetings(&self, location_id: &str, name: &str, region: &str, _count: usize) -> Vec<Meeting> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            vec![Meeting {
                id: format!("{}-m1", location_id),
                date: "Mon 2/3".to_string(),
                time: "6:00PM".to_string(),
                title: format!("{} City Council", name),
                location: format!("{}, {}", name, region),
                location_id: location_id.to_string(),
                kind: MeetingKind::Upcoming,
                has_matches: false,
            }]
        }

        fn projects(&self, _location_id: &str, _name: &str, _region: &str, _count: usize) -> Vec<Project> {
            Vec::new()
        }

        fn agendas(&self, _location_id: &str, _name: &str, _region: &str, _count: usize) -> Vec<Agenda> {
            Vec::new()
        }
    }

    fn temp_cache(name: &str) -> LocationCache {
        let dir = std::env::temp_dir().join(format!(
            "hamlet-cache-{}-{}",
            std::process::id(),
            name
        ));
        let _ = std::fs::remove_dir_all(&dir);
        LocationCache::new(dir, Box::<CountingGenerator>::default())
    }

    #[test]
    fn test_get_is_idempotent_on_hit() {
        let cache = temp_cache("idempotent");
        let first = cache.get("mesa", "Mesa", "AZ");
        let second = cache.get("mesa", "Mesa", "AZ");

        assert_eq!(first.generated_at, second.generated_at);
        assert_eq!(first.meetings[0].id, second.meetings[0].id);
        let stats = cache.stats();
        assert_eq!(stats.location_count, 1);
    }

    #[test]
    fn test_generator_invoked_once_per_key() {
        let dir = std::env::temp_dir().join(format!("hamlet-cache-{}-once", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        let calls = Arc::new(AtomicUsize::new(0));
        let generator = CountingGenerator {
            calls: Arc::clone(&calls),
        };
        let cache = LocationCache::new(dir, Box::new(generator));

        cache.get("mesa", "Mesa", "AZ");
        cache.get("mesa", "Mesa", "AZ");
        cache.get("tempe", "Tempe", "AZ");

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_empty_key_returns_empty_bundle() {
        let cache = temp_cache("empty-key");
        assert!(cache.get("", "Mesa", "AZ").is_empty());
        assert!(cache.get("mesa", "", "AZ").is_empty());
        assert_eq!(cache.stats().location_count, 0);
    }

    #[test]
    fn test_eviction_drops_oldest_generated() {
        let cache = temp_cache("eviction");
        for i in 0..=MAX_CACHED_LOCATIONS {
            // Distinct generatedAt ordering via direct insertion
            let mut entries = cache.lock();
            entries.insert(
                format!("city-{}", i),
                LocationBundle {
                    meetings: Vec::new(),
                    projects: Vec::new(),
                    agendas: Vec::new(),
                    generated_at: Utc::now() + chrono::Duration::seconds(i as i64),
                },
            );
            LocationCache::evict_overflow(&mut entries);
        }

        let entries = cache.lock();
        assert_eq!(entries.len(), MAX_CACHED_LOCATIONS);
        assert!(!entries.contains_key("city-0"));
        assert!(entries.contains_key("city-1"));
        assert!(entries.contains_key(&format!("city-{}", MAX_CACHED_LOCATIONS)));
    }

    #[test]
    fn test_clear_single_and_full() {
        let cache = temp_cache("clear");
        cache.get("mesa", "Mesa", "AZ");
        cache.get("tempe", "Tempe", "AZ");

        cache.clear(Some("mesa"));
        assert_eq!(cache.stats().location_count, 1);

        cache.clear(None);
        let stats = cache.stats();
        assert_eq!(stats.location_count, 0);
    }

    #[test]
    fn test_persists_across_instances() {
        let dir = std::env::temp_dir().join(format!("hamlet-cache-{}-reload", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);

        let first = LocationCache::new(dir.clone(), Box::<CountingGenerator>::default());
        let bundle = first.get("mesa", "Mesa", "AZ");
        drop(first);

        let second = LocationCache::new(dir, Box::<CountingGenerator>::default());
        let reloaded = second.get("mesa", "Mesa", "AZ");
        assert_eq!(bundle.generated_at, reloaded.generated_at);
        assert_eq!(bundle.meetings[0].id, reloaded.meetings[0].id);
    }

    #[test]
    fn test_warm_skips_populated_store() {
        let cache = temp_cache("warm");
        let locations: Vec<Location> = crate::models::location::cities().cloned().collect();
        let warmed = cache.warm(&locations);
        assert_eq!(warmed, locations.len());
        assert_eq!(cache.stats().location_count, locations.len());

        // Already populated, second warm is a no-op
        assert_eq!(cache.warm(&locations), 0);
    }
}
