//! Cross-location search over cached civic data.
//!
//! `all_results` flattens every cached bundle into a uniform result list with
//! templated excerpts and fixed relevance scores; `search` applies the query
//! and filter predicates and sorts by relevance. Search is query-gated: an
//! empty query returns nothing rather than browsing everything.

pub mod saved;

pub use saved::SavedSearchStore;

use tracing::debug;

use crate::cache::LocationCache;
use crate::models::{resolve_location_name, ResultKind, SearchResult};
use crate::utils::contains_ignore_case;

/// Hard cap on returned results
pub const MAX_SEARCH_RESULTS: usize = 100;

// Relevance by record type. These exist purely to order results; meetings
// outrank projects outrank agendas by construction, not by computed score.
const RELEVANCE_UPCOMING_MEETING: i32 = 95;
const RELEVANCE_PAST_MEETING: i32 = 70;
const RELEVANCE_APPROVED_PROJECT: i32 = 92;
const RELEVANCE_PROJECT: i32 = 85;
const RELEVANCE_AGENDA: i32 = 80;

/// Parsed query surface: the `q`, `type` and `location` URL parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchParams {
    pub query: String,
    pub kind: String,
    pub location: String,
}

impl SearchParams {
    /// Parse a query string like `q=council&type=meeting&location=mesa`.
    /// Missing parameters default to empty / "all"; unknown keys are ignored.
    pub fn from_query(query_string: &str) -> SearchParams {
        let mut params = SearchParams {
            kind: "all".to_string(),
            location: "all".to_string(),
            ..SearchParams::default()
        };

        for pair in query_string.trim_start_matches('?').split('&') {
            let (key, value) = match pair.split_once('=') {
                Some(split) => split,
                None => continue,
            };
            let value = percent_decode(value);
            match key {
                "q" => params.query = value,
                "type" => params.kind = value,
                "location" => params.location = value,
                _ => {}
            }
        }
        params
    }
}

/// Decode %XX escapes and '+' spaces; malformed escapes pass through as-is.
fn percent_decode(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b'%' if i + 2 < bytes.len() => {
                let hi = (bytes[i + 1] as char).to_digit(16);
                let lo = (bytes[i + 2] as char).to_digit(16);
                match (hi, lo) {
                    (Some(hi), Some(lo)) => {
                        out.push((hi * 16 + lo) as u8);
                        i += 3;
                    }
                    _ => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            other => {
                out.push(other);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Flatten every cached bundle into search results. Falls back to the seeded
/// dataset when the cache is empty. Output order is unspecified; callers sort.
pub fn all_results(cache: &LocationCache) -> Vec<SearchResult> {
    let bundles = cache.all_bundles();
    if bundles.is_empty() {
        debug!("Location cache empty, using seeded search dataset");
        return seed_results();
    }

    let mut results = Vec::new();
    for (location_id, bundle) in &bundles {
        for meeting in &bundle.meetings {
            let location = resolve_location_name(location_id, Some(&meeting.location));
            results.push(SearchResult {
                id: meeting.id.clone(),
                title: meeting.title.clone(),
                kind: ResultKind::Meeting,
                location,
                location_id: location_id.clone(),
                date: Some(meeting.date.clone()),
                time: Some(meeting.time.clone()),
                excerpt: format!(
                    "{} meeting scheduled for {} at {}. Click to view full meeting details, agenda, participants, and related documents.",
                    if meeting.is_upcoming() { "Upcoming" } else { "Past" },
                    meeting.date,
                    meeting.time
                ),
                relevance: if meeting.is_upcoming() {
                    RELEVANCE_UPCOMING_MEETING
                } else {
                    RELEVANCE_PAST_MEETING
                },
                status: Some(meeting.kind.to_string()),
                address: None,
                category: Some(meeting.category_label().to_string()),
            });
        }

        for project in &bundle.projects {
            let location = resolve_location_name(location_id, Some(&project.location_name));
            let mut excerpt = format!("{} project", project.category);
            if let Some(status) = project.status {
                excerpt.push_str(&format!(" ({})", status));
            }
            excerpt.push('.');
            if let Some(address) = &project.address {
                excerpt.push_str(&format!(" Located at {}.", address));
            }
            excerpt.push_str(" Review project details, timeline, stakeholders, and documents.");

            results.push(SearchResult {
                id: project.id.clone(),
                title: project.title.clone(),
                kind: ResultKind::Project,
                location,
                location_id: location_id.clone(),
                date: Some(project.date.clone()),
                time: None,
                excerpt,
                relevance: if project.is_approved() {
                    RELEVANCE_APPROVED_PROJECT
                } else {
                    RELEVANCE_PROJECT
                },
                status: project.status.map(|s| s.to_string()),
                address: project.address.clone(),
                category: Some(project.category.clone()),
            });
        }

        for agenda in &bundle.agendas {
            let location = resolve_location_name(location_id, Some(&agenda.location_name));
            let labels = agenda.match_labels();
            let excerpt = format!(
                "Meeting agenda for {}. {}",
                agenda.date.as_deref().unwrap_or("upcoming meeting"),
                if labels.is_empty() {
                    "Review agenda items and prepare for the meeting.".to_string()
                } else {
                    format!("Matches found for: {}.", labels.join(", "))
                }
            );

            results.push(SearchResult {
                id: agenda.id.clone(),
                title: agenda.display_title(&location),
                kind: ResultKind::Agenda,
                location,
                location_id: location_id.clone(),
                date: agenda.date.clone(),
                time: agenda.time.clone(),
                excerpt,
                relevance: RELEVANCE_AGENDA,
                status: None,
                address: None,
                category: Some("Agenda".to_string()),
            });
        }
    }
    results
}

/// Filter and rank results. Query is a case-insensitive substring match
/// against title, excerpt or location label; kind and location are equality
/// filters where "all" (or empty) means no filter. An unknown kind or
/// location value simply matches nothing.
pub fn search(
    results: &[SearchResult],
    query: &str,
    kind_filter: &str,
    location_filter: &str,
) -> Vec<SearchResult> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }

    let no_kind_filter = kind_filter.is_empty() || kind_filter == "all";
    let no_location_filter = location_filter.is_empty() || location_filter == "all";
    // An unrecognized kind parses to None and so matches nothing
    let wanted_kind = ResultKind::parse(kind_filter);

    let mut matched: Vec<SearchResult> = results
        .iter()
        .filter(|result| {
            let matches_query = contains_ignore_case(&result.title, query)
                || contains_ignore_case(&result.excerpt, query)
                || contains_ignore_case(&result.location, query);

            let matches_kind = no_kind_filter || wanted_kind == Some(result.kind);
            let matches_location = no_location_filter || result.location_id == location_filter;

            matches_query && matches_kind && matches_location
        })
        .cloned()
        .collect();

    matched.sort_by(|a, b| b.relevance.cmp(&a.relevance));
    matched.truncate(MAX_SEARCH_RESULTS);
    matched
}

/// Static fallback dataset for a cold store, so the search view is never
/// blank on first load.
fn seed_results() -> Vec<SearchResult> {
    let seed = |id: &str, title: &str, kind: ResultKind, location: &str, location_id: &str, date: &str, excerpt: &str, relevance: i32| SearchResult {
        id: id.to_string(),
        title: title.to_string(),
        kind,
        location: location.to_string(),
        location_id: location_id.to_string(),
        date: Some(date.to_string()),
        time: None,
        excerpt: excerpt.to_string(),
        relevance,
        status: None,
        address: None,
        category: None,
    };

    vec![
        seed(
            "seed-1",
            "Q4 Budget Review Meeting",
            ResultKind::Meeting,
            "Los Angeles, CA",
            "los-angeles",
            "December 15, 2025",
            "Discussion of budget allocations for Q4 including infrastructure improvements and community programs.",
            95,
        ),
        seed(
            "seed-2",
            "Infrastructure Development Project",
            ResultKind::Project,
            "San Jose, CA",
            "san-jose",
            "January 2026",
            "Major infrastructure development initiative focused on improving transportation systems and public facilities.",
            88,
        ),
        seed(
            "seed-3",
            "City Council Meeting Agenda",
            ResultKind::Agenda,
            "San Diego, CA",
            "san-diego",
            "December 20, 2025",
            "Agenda items include zoning changes, budget approvals, and community development initiatives.",
            82,
        ),
        seed(
            "seed-4",
            "Community Engagement Meeting",
            ResultKind::Meeting,
            "Fresno, CA",
            "fresno",
            "December 18, 2025",
            "Public forum for community members to discuss local issues and provide feedback on city initiatives.",
            70,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(id: &str, title: &str, kind: ResultKind, location: &str, location_id: &str, relevance: i32) -> SearchResult {
        SearchResult {
            id: id.to_string(),
            title: title.to_string(),
            kind,
            location: location.to_string(),
            location_id: location_id.to_string(),
            date: None,
            time: None,
            excerpt: String::new(),
            relevance,
            status: None,
            address: None,
            category: None,
        }
    }

    fn fixture() -> Vec<SearchResult> {
        vec![
            result("mesa-m1", "Mesa City Council - Regular Meeting", ResultKind::Meeting, "Mesa, AZ", "mesa", 70),
            result("mesa-m2", "Mesa City Council - Public Hearing", ResultKind::Meeting, "Mesa, AZ", "mesa", 95),
            result("mesa-p1", "Council Chambers Renovation", ResultKind::Project, "Mesa, AZ", "mesa", 85),
            result("tempe-m1", "Tempe Parks Board", ResultKind::Meeting, "Tempe, AZ", "tempe", 95),
        ]
    }

    #[test]
    fn test_empty_query_is_gated() {
        assert!(search(&fixture(), "", "all", "all").is_empty());
        assert!(search(&fixture(), "   ", "all", "all").is_empty());
    }

    #[test]
    fn test_query_matches_title_case_insensitive() {
        let hits = search(&fixture(), "COUNCIL", "all", "all");
        assert_eq!(hits.len(), 3);
        // Sorted by relevance descending
        assert_eq!(hits[0].id, "mesa-m2");
        assert_eq!(hits[1].id, "mesa-p1");
        assert_eq!(hits[2].id, "mesa-m1");
    }

    #[test]
    fn test_kind_filter_restricts_to_meetings() {
        let hits = search(&fixture(), "council", "meeting", "all");
        assert_eq!(hits.len(), 2);
        assert!(hits.iter().all(|r| r.kind == ResultKind::Meeting));
    }

    #[test]
    fn test_unknown_filter_values_match_nothing() {
        assert!(search(&fixture(), "council", "podcast", "all").is_empty());
        assert!(search(&fixture(), "council", "all", "gotham").is_empty());
    }

    #[test]
    fn test_location_filter_uses_location_id() {
        let hits = search(&fixture(), "mesa", "all", "mesa");
        assert_eq!(hits.len(), 3);
        assert!(hits.iter().all(|r| r.location_id == "mesa"));
    }

    #[test]
    fn test_query_matches_location_label() {
        let hits = search(&fixture(), "tempe, az", "all", "all");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "tempe-m1");
    }

    #[test]
    fn test_result_cap() {
        let mut many = Vec::new();
        for i in 0..150 {
            many.push(result(
                &format!("m{}", i),
                "Council",
                ResultKind::Meeting,
                "Mesa, AZ",
                "mesa",
                i,
            ));
        }
        let hits = search(&many, "council", "all", "all");
        assert_eq!(hits.len(), MAX_SEARCH_RESULTS);
        assert_eq!(hits[0].relevance, 149);
    }

    #[test]
    fn test_search_params_from_query() {
        let params = SearchParams::from_query("?q=zoning+board&type=project&location=mesa");
        assert_eq!(params.query, "zoning board");
        assert_eq!(params.kind, "project");
        assert_eq!(params.location, "mesa");

        let defaults = SearchParams::from_query("q=council");
        assert_eq!(defaults.query, "council");
        assert_eq!(defaults.kind, "all");
        assert_eq!(defaults.location, "all");
    }

    #[test]
    fn test_seed_results_cover_all_kinds() {
        let seeds = seed_results();
        assert!(seeds.iter().any(|r| r.kind == ResultKind::Meeting));
        assert!(seeds.iter().any(|r| r.kind == ResultKind::Project));
        assert!(seeds.iter().any(|r| r.kind == ResultKind::Agenda));
    }
}
