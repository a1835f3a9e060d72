//! The state/city catalog used to index cached data and build record ids.
//!
//! A built-in dataset covers the pilot states; deployments can override it by
//! dropping a `locations.json` file under `data/`. The catalog is loaded once
//! at startup and shared for the life of the process.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Global location catalog, loaded once at startup
static CATALOG: OnceLock<Vec<Location>> = OnceLock::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationKind {
    State,
    City,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Location {
    pub id: String,
    pub name: String,
    pub state: String,
    #[serde(rename = "type")]
    pub kind: LocationKind,
    #[serde(rename = "isLocked", default, skip_serializing_if = "std::ops::Not::not")]
    pub is_locked: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Location>>,
}

impl Location {
    fn city(id: &str, name: &str, state: &str) -> Location {
        Location {
            id: id.to_string(),
            name: name.to_string(),
            state: state.to_string(),
            kind: LocationKind::City,
            is_locked: false,
            children: None,
        }
    }

    fn state(id: &str, name: &str, abbrev: &str, cities: Vec<Location>) -> Location {
        Location {
            id: id.to_string(),
            name: name.to_string(),
            state: abbrev.to_string(),
            kind: LocationKind::State,
            is_locked: false,
            children: Some(cities),
        }
    }

    /// Display label, e.g. "Mesa, AZ"
    pub fn full_name(&self) -> String {
        format!("{}, {}", self.name, self.state)
    }
}

/// Resolved display info for a location id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationInfo {
    pub name: String,
    pub state: String,
    pub full_name: String,
}

/// Initialize the catalog, preferring an on-disk override when present.
/// Call this once at app startup; later calls are no-ops.
pub fn init() {
    let _ = CATALOG.get_or_init(|| load_catalog().unwrap_or_else(default_catalog));
}

pub fn catalog() -> &'static [Location] {
    CATALOG.get_or_init(|| load_catalog().unwrap_or_else(default_catalog))
}

/// Every city in the catalog, flattened out of the state tree.
pub fn cities() -> impl Iterator<Item = &'static Location> {
    catalog()
        .iter()
        .filter_map(|state| state.children.as_deref())
        .flatten()
}

fn load_catalog() -> Option<Vec<Location>> {
    let paths = ["data/locations.json", "./data/locations.json"];

    for path in paths {
        if let Ok(data) = std::fs::read_to_string(path) {
            if let Ok(locations) = serde_json::from_str::<Vec<Location>>(&data) {
                debug!(path = %path, states = locations.len(), "Loaded location catalog from disk");
                return Some(locations);
            }
        }
    }

    debug!("No locations file found, using built-in catalog");
    None
}

fn default_catalog() -> Vec<Location> {
    vec![
        Location::state(
            "az",
            "Arizona",
            "AZ",
            vec![
                Location::city("phoenix", "Phoenix", "AZ"),
                Location::city("tucson", "Tucson", "AZ"),
                Location::city("mesa", "Mesa", "AZ"),
                Location::city("chandler", "Chandler", "AZ"),
                Location::city("scottsdale", "Scottsdale", "AZ"),
                Location::city("glendale-az", "Glendale", "AZ"),
                Location::city("gilbert", "Gilbert", "AZ"),
                Location::city("tempe", "Tempe", "AZ"),
                Location::city("peoria-az", "Peoria", "AZ"),
                Location::city("surprise", "Surprise", "AZ"),
                Location::city("yuma", "Yuma", "AZ"),
                Location::city("flagstaff", "Flagstaff", "AZ"),
                Location::city("casa-grande", "Casa Grande", "AZ"),
                Location::city("maricopa", "Maricopa", "AZ"),
                Location::city("oro-valley", "Oro Valley", "AZ"),
            ],
        ),
        Location::state(
            "ca",
            "California",
            "CA",
            vec![
                Location::city("los-angeles", "Los Angeles", "CA"),
                Location::city("san-diego", "San Diego", "CA"),
                Location::city("san-jose", "San Jose", "CA"),
                Location::city("sacramento", "Sacramento", "CA"),
                Location::city("fresno", "Fresno", "CA"),
                Location::city("oakland", "Oakland", "CA"),
            ],
        ),
        Location::state(
            "tx",
            "Texas",
            "TX",
            vec![
                Location::city("houston", "Houston", "TX"),
                Location::city("san-antonio", "San Antonio", "TX"),
                Location::city("dallas", "Dallas", "TX"),
                Location::city("austin", "Austin", "TX"),
                Location::city("el-paso", "El Paso", "TX"),
                Location::city("new-braunfels", "New Braunfels", "TX"),
            ],
        ),
    ]
}

/// Find a state or city by its id.
pub fn find_location(location_id: &str) -> Option<&'static Location> {
    for state in catalog() {
        if state.id == location_id {
            return Some(state);
        }
        if let Some(cities) = &state.children {
            if let Some(city) = cities.iter().find(|c| c.id == location_id) {
                return Some(city);
            }
        }
    }
    None
}

/// Resolve a location id to its "Name, ST" display label.
/// Unknown ids fall back to the provided label, then to the raw id.
pub fn resolve_location_name(location_id: &str, fallback: Option<&str>) -> String {
    if let Some(location) = find_location(location_id) {
        return location.full_name();
    }
    fallback
        .map(str::to_string)
        .unwrap_or_else(|| location_id.to_string())
}

/// Display info for a location id, deriving a best-effort name from the id
/// itself when the catalog has no entry.
pub fn location_info(location_id: &str) -> LocationInfo {
    if let Some(location) = find_location(location_id) {
        return LocationInfo {
            name: location.name.clone(),
            state: location.state.clone(),
            full_name: location.full_name(),
        };
    }

    let raw = location_id.split('-').next().unwrap_or(location_id);
    let mut name = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    if let Some(first) = chars.next() {
        name.extend(first.to_uppercase());
        name.extend(chars);
    }
    LocationInfo {
        full_name: name.clone(),
        name,
        state: String::new(),
    }
}

/// Extract the location id from a record id like "mesa-m1" or "los-angeles-p3".
/// Two-word city prefixes ("los", "new", "san") keep both words.
pub fn extract_location_id(record_id: &str) -> String {
    let parts: Vec<&str> = record_id.split('-').collect();

    if parts.len() >= 3 && matches!(parts[0], "los" | "new" | "san") {
        return format!("{}-{}", parts[0], parts[1]);
    }

    parts.first().unwrap_or(&record_id).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_location_city_and_state() {
        assert_eq!(find_location("mesa").unwrap().name, "Mesa");
        assert_eq!(find_location("az").unwrap().kind, LocationKind::State);
        assert!(find_location("gotham").is_none());
    }

    #[test]
    fn test_resolve_location_name() {
        assert_eq!(resolve_location_name("mesa", None), "Mesa, AZ");
        assert_eq!(
            resolve_location_name("gotham", Some("Gotham, NJ")),
            "Gotham, NJ"
        );
        assert_eq!(resolve_location_name("gotham", None), "gotham");
    }

    #[test]
    fn test_location_info_fallback_capitalizes() {
        let info = location_info("springfield-il");
        assert_eq!(info.name, "Springfield");
        assert_eq!(info.state, "");
        assert_eq!(info.full_name, "Springfield");
    }

    #[test]
    fn test_extract_location_id() {
        assert_eq!(extract_location_id("mesa-m1"), "mesa");
        assert_eq!(extract_location_id("los-angeles-p3"), "los-angeles");
        assert_eq!(extract_location_id("san-diego-a2"), "san-diego");
        assert_eq!(extract_location_id("tucson"), "tucson");
    }

    #[test]
    fn test_cities_flattens_states() {
        let ids: Vec<&str> = cities().map(|c| c.id.as_str()).collect();
        assert!(ids.contains(&"mesa"));
        assert!(ids.contains(&"los-angeles"));
        assert!(!ids.contains(&"az"));
    }
}
