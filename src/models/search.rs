use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which record family a search result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    Meeting,
    Project,
    Agenda,
}

impl ResultKind {
    /// Parse a filter value from the query surface. "all" and empty mean no
    /// filter; anything unrecognized is None so callers can treat it as a
    /// filter that matches nothing.
    pub fn parse(value: &str) -> Option<ResultKind> {
        match value {
            "meeting" => Some(ResultKind::Meeting),
            "project" => Some(ResultKind::Project),
            "agenda" => Some(ResultKind::Agenda),
            _ => None,
        }
    }
}

impl std::fmt::Display for ResultKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResultKind::Meeting => write!(f, "meeting"),
            ResultKind::Project => write!(f, "project"),
            ResultKind::Agenda => write!(f, "agenda"),
        }
    }
}

/// One row in the cross-location search view. Meetings, projects and agendas
/// are all projected into this shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ResultKind,
    /// Display label, e.g. "Mesa, AZ"
    pub location: String,
    #[serde(rename = "locationId")]
    pub location_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    pub excerpt: String,
    /// Integer used only for descending sort; no cross-type normalization.
    pub relevance: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Optional filters attached to a saved search. Empty and "all" values are
/// stripped before saving.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl SearchFilters {
    /// Drop empty and "all" values; returns None when nothing remains.
    pub fn normalized(self) -> Option<SearchFilters> {
        let keep = |v: Option<String>| v.filter(|s| !s.is_empty() && s != "all");
        let filters = SearchFilters {
            kind: keep(self.kind),
            location: keep(self.location),
        };
        if filters.kind.is_none() && filters.location.is_none() {
            None
        } else {
            Some(filters)
        }
    }
}

/// A search the user chose to keep around. Persisted as a flat list,
/// independent of the location cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedSearch {
    pub id: String,
    pub query: String,
    pub name: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<SearchFilters>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_kind_parse() {
        assert_eq!(ResultKind::parse("meeting"), Some(ResultKind::Meeting));
        assert_eq!(ResultKind::parse("agenda"), Some(ResultKind::Agenda));
        assert_eq!(ResultKind::parse("all"), None);
        assert_eq!(ResultKind::parse("podcast"), None);
    }

    #[test]
    fn test_filters_normalized_strips_all_and_empty() {
        let filters = SearchFilters {
            kind: Some("project".to_string()),
            location: Some("all".to_string()),
        };
        let normalized = filters.normalized().unwrap();
        assert_eq!(normalized.kind.as_deref(), Some("project"));
        assert!(normalized.location.is_none());

        let empty = SearchFilters {
            kind: Some(String::new()),
            location: Some("all".to_string()),
        };
        assert!(empty.normalized().is_none());
    }

    #[test]
    fn test_search_result_serializes_type_field() {
        let result = SearchResult {
            id: "mesa-m1".to_string(),
            title: "Mesa City Council".to_string(),
            kind: ResultKind::Meeting,
            location: "Mesa, AZ".to_string(),
            location_id: "mesa".to_string(),
            date: None,
            time: None,
            excerpt: String::new(),
            relevance: 95,
            status: None,
            address: None,
            category: None,
        };
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"type\":\"meeting\""));
        assert!(!json.contains("\"address\""));
    }
}
