//! Mock civic data generation.
//!
//! The cache synthesizes a location's records on first access through the
//! `DataGenerator` trait. The default `MockGenerator` builds plausible
//! meetings, projects and agendas from title/address templates, matching the
//! shape real ingestion would produce. Tests substitute their own impls.

use chrono::{Duration, NaiveDate, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::{Agenda, Meeting, MeetingKind, Project, ProjectStatus};

/// Synthesizes records for a location. Implementations should be pure and
/// side-effect-free; callers own persistence.
pub trait DataGenerator {
    fn meetings(&self, location_id: &str, name: &str, region: &str, count: usize) -> Vec<Meeting>;
    fn projects(&self, location_id: &str, name: &str, region: &str, count: usize) -> Vec<Project>;
    fn agendas(&self, location_id: &str, name: &str, region: &str, count: usize) -> Vec<Agenda>;
}

/// Default per-location record counts.
pub const DEFAULT_MEETING_COUNT: usize = 8;
pub const DEFAULT_PROJECT_COUNT: usize = 6;
pub const DEFAULT_AGENDA_COUNT: usize = 8;

const MEETING_BODIES: &[&str] = &[
    "City Council",
    "Planning Commission",
    "Zoning Board",
    "Parks & Recreation",
    "Public Works",
];

const MEETING_FORMATS: &[&str] = &[
    "Regular Meeting",
    "Special Session",
    "Workshop",
    "Public Hearing",
    "Study Session",
    "Emergency Meeting",
];

const MEETING_TIMES: &[&str] = &["9:00AM", "2:00PM", "4:00PM", "6:00PM", "7:00PM"];

const AGENDA_BODIES: &[&str] = &[
    "City Council",
    "Planning Commission",
    "Zoning Board of Adjustment",
    "Parks & Recreation Committee",
    "Public Works Committee",
    "Finance Committee",
    "Transportation Board",
    "Environmental Commission",
];

const AGENDA_FORMATS: &[&str] = &[
    "Regular Meeting",
    "Special Session",
    "Workshop",
    "Public Hearing",
    "Budget Review",
    "Annual Planning",
];

/// Project title templates keyed by governing body, `{city}` substituted.
const PROJECT_TEMPLATES: &[(&str, &[&str])] = &[
    (
        "City Council",
        &[
            "{city} Downtown Revitalization Project",
            "Affordable Housing Initiative - {city}",
            "{city} Public Safety Enhancement Program",
            "Community Center Renovation - {city}",
            "{city} Infrastructure Improvement Plan",
            "Economic Development Zone - {city}",
            "{city} Green Energy Initiative",
            "Historic District Preservation - {city}",
        ],
    ),
    (
        "Planning Commission",
        &[
            "Mixed-Use Development at {city} Center",
            "{city} Transit-Oriented Development",
            "Residential Complex - North {city}",
            "{city} Commercial Plaza Expansion",
            "Waterfront Development Project - {city}",
            "{city} Business Park Master Plan",
            "Urban Renewal Project - {city}",
            "Smart Growth Initiative - {city}",
        ],
    ),
    (
        "Zoning Board",
        &[
            "Rezoning Request - {city} Heights",
            "Variance Application - Downtown {city}",
            "Special Use Permit - {city} Industrial",
            "Conditional Use - {city} Commercial",
            "Density Bonus Application - {city}",
            "Setback Variance - {city} Residential",
            "Height Exception Request - {city}",
            "Land Use Amendment - {city}",
        ],
    ),
];

/// Status distribution weights: most generated projects are still in flight.
const STATUS_WEIGHTS: &[(ProjectStatus, u32)] = &[
    (ProjectStatus::Pending, 40),
    (ProjectStatus::UnderReview, 30),
    (ProjectStatus::Approved, 20),
    (ProjectStatus::Denied, 10),
];

const ADDRESS_TEMPLATES: &[&str] = &[
    "{number} Main Street",
    "{number} {city} Boulevard",
    "{number} Commerce Drive",
    "{number} Park Avenue",
    "{number} Industrial Parkway",
    "{number} Civic Center Plaza",
    "{number} {state} Highway {highway}",
    "{number} Downtown Plaza",
];

#[derive(Debug, Default)]
pub struct MockGenerator;

impl MockGenerator {
    pub fn new() -> Self {
        MockGenerator
    }
}

fn weighted_status<R: Rng>(rng: &mut R) -> ProjectStatus {
    let total: u32 = STATUS_WEIGHTS.iter().map(|(_, w)| w).sum();
    let mut roll = rng.gen_range(0..total);
    for (status, weight) in STATUS_WEIGHTS {
        if roll < *weight {
            return *status;
        }
        roll -= weight;
    }
    ProjectStatus::Pending
}

fn random_address<R: Rng>(rng: &mut R, city: &str, state: &str) -> String {
    let template = ADDRESS_TEMPLATES.choose(rng).copied().unwrap_or("{number} Main Street");
    let number = rng.gen_range(100..9100);
    let highway = rng.gen_range(1..100);

    template
        .replace("{number}", &number.to_string())
        .replace("{city}", city)
        .replace("{state}", state)
        .replace("{highway}", &highway.to_string())
}

/// Short meeting date label, e.g. "Mon 2/3"
fn short_date(date: NaiveDate) -> String {
    format!("{} {}/{}", date.format("%a"), date.format("%-m"), date.format("%-d"))
}

/// Long agenda date label, e.g. "March 4, 2026"
fn long_date(date: NaiveDate) -> String {
    format!("{} {}, {}", date.format("%B"), date.format("%-d"), date.format("%Y"))
}

impl DataGenerator for MockGenerator {
    fn meetings(&self, location_id: &str, name: &str, region: &str, count: usize) -> Vec<Meeting> {
        let mut rng = rand::thread_rng();
        let today = Utc::now().date_naive();
        let label = format!("{}, {}", name, region);
        let upcoming = (count * 3) / 5;

        let mut meetings = Vec::with_capacity(count);
        for i in 0..count {
            let is_upcoming = i < upcoming;
            let offset = rng.gen_range(1..=30);
            let date = if is_upcoming {
                today + Duration::days(offset)
            } else {
                today - Duration::days(offset)
            };
            let body = MEETING_BODIES.choose(&mut rng).copied().unwrap_or("City Council");
            let format = MEETING_FORMATS.choose(&mut rng).copied().unwrap_or("Regular Meeting");

            meetings.push(Meeting {
                id: format!("{}-m{}", location_id, i + 1),
                date: short_date(date),
                time: MEETING_TIMES.choose(&mut rng).copied().unwrap_or("6:00PM").to_string(),
                title: format!("{} {} - {}", name, body, format),
                location: label.clone(),
                location_id: location_id.to_string(),
                kind: if is_upcoming {
                    MeetingKind::Upcoming
                } else {
                    MeetingKind::Past
                },
                has_matches: rng.gen_bool(if is_upcoming { 0.4 } else { 0.3 }),
            });
        }
        meetings
    }

    fn projects(&self, location_id: &str, name: &str, region: &str, count: usize) -> Vec<Project> {
        let mut rng = rand::thread_rng();
        let today = Utc::now().date_naive();
        let mut used_titles = Vec::new();

        let mut projects = Vec::with_capacity(count);
        for i in 0..count {
            let (category, templates) = PROJECT_TEMPLATES
                .choose(&mut rng)
                .copied()
                .unwrap_or(PROJECT_TEMPLATES[0]);

            // Retry for a unique title; the template pool is larger than any
            // sane count so this terminates quickly.
            let mut title;
            loop {
                let template = templates.choose(&mut rng).copied().unwrap_or(templates[0]);
                title = template.replace("{city}", name);
                if !used_titles.contains(&title) {
                    break;
                }
            }
            used_titles.push(title.clone());

            let date = today + Duration::days(rng.gen_range(-30..=60));
            projects.push(Project {
                id: format!("{}-p{}", location_id, i + 1),
                category: category.to_string(),
                title,
                date: date.format("%Y-%m-%d").to_string(),
                location_id: location_id.to_string(),
                location_name: format!("{}, {}", name, region),
                address: rng
                    .gen_bool(0.7)
                    .then(|| random_address(&mut rng, name, region)),
                status: Some(weighted_status(&mut rng)),
            });
        }

        projects.sort_by(|a, b| a.date.cmp(&b.date));
        projects
    }

    fn agendas(&self, location_id: &str, name: &str, region: &str, count: usize) -> Vec<Agenda> {
        let mut rng = rand::thread_rng();
        let today = Utc::now().date_naive();
        let label = format!("{}, {}", name, region);

        let mut dated: Vec<(NaiveDate, Agenda)> = Vec::with_capacity(count);
        for i in 0..count {
            let body = AGENDA_BODIES[i % AGENDA_BODIES.len()];
            let format = AGENDA_FORMATS.choose(&mut rng).copied().unwrap_or("Regular Meeting");
            let date = today + Duration::days(rng.gen_range(-30..=29));

            dated.push((
                date,
                Agenda {
                    id: format!("{}-a{}", location_id, i + 1),
                    title: Some(format!("{} {} - {} Agenda", name, body, format)),
                    date: Some(long_date(date)),
                    time: None,
                    pages: rng.gen_range(8..48),
                    has_attachments: rng.gen_bool(0.7),
                    matches: None,
                    location_id: location_id.to_string(),
                    location_name: label.clone(),
                },
            ));
        }

        // Newest first
        dated.sort_by(|a, b| b.0.cmp(&a.0));
        dated.into_iter().map(|(_, agenda)| agenda).collect()
    }
}
