//! Hamlet - a local-first cache and search tool for municipal meeting data.
//!
//! Provides a keyed, generate-on-miss cache of per-location civic data
//! (meetings, projects, agendas), a cross-location search view over it, and a
//! persisted saved-search list, all exposed through a small CLI.

mod cache;
mod config;
mod generator;
mod models;
mod search;
mod storage;
mod utils;

use std::io;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cache::LocationCache;
use config::Config;
use generator::MockGenerator;
use models::SearchFilters;
use search::{SavedSearchStore, SearchParams};
use utils::{format_optional, truncate};

/// Column width for titles in list output
const TITLE_WIDTH: usize = 52;

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();
    models::location::init();

    let config = Config::load()?;
    let data_dir = config.data_dir()?;
    let cache = LocationCache::new(data_dir.clone(), Box::new(MockGenerator::new()));
    let saved = SavedSearchStore::new(data_dir);
    let _subscription = saved.subscribe(Box::new(|searches| {
        tracing::debug!(count = searches.len(), "Saved searches updated");
    }));

    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(String::as_str).unwrap_or("help");

    match command {
        "location" => {
            let key = args
                .get(2)
                .cloned()
                .or_else(|| config.default_location.clone())
                .unwrap_or_default();
            show_location(&cache, &key);
        }
        "search" => {
            let query = args.get(2).map(String::as_str).unwrap_or("");
            let kind = args.get(3).map(String::as_str).unwrap_or("all");
            let location = args.get(4).map(String::as_str).unwrap_or("all");
            run_search(&cache, query, kind, location);
        }
        "query" => {
            // Accepts the raw query-string form, e.g. "q=council&type=meeting"
            let params = SearchParams::from_query(args.get(2).map(String::as_str).unwrap_or(""));
            run_search(&cache, &params.query, &params.kind, &params.location);
        }
        "warm" => {
            let warmed = cache.warm(models::location::cities());
            println!("Warmed cache for {} locations", warmed);
        }
        "record" => match args.get(2) {
            Some(id) => show_record(&cache, id),
            None => println!("Usage: hamlet record <id>   (e.g. hamlet record mesa-m1)"),
        },
        "stats" => {
            let stats = cache.stats();
            println!(
                "Cached locations:  {} (bound {})",
                stats.location_count,
                cache::MAX_CACHED_LOCATIONS
            );
            println!("Approximate size:  {} KB", stats.approximate_size_kb);
            println!("Saved searches:    {}", saved.list().len());
        }
        "clear" => {
            let key = args.get(2).map(String::as_str);
            cache.clear(key);
            match key {
                Some(key) => println!("Cleared cached data for '{}'", key),
                None => println!("Cleared the entire location cache"),
            }
        }
        "set-location" => match args.get(2) {
            Some(key) => {
                if models::find_location(key).is_none() {
                    println!("Warning: '{}' is not in the location catalog", key);
                }
                let mut config = config;
                config.default_location = Some(key.clone());
                config.save()?;
                println!("Default location set to '{}'", key);
            }
            None => println!("Usage: hamlet set-location <key>"),
        },
        "saved-list" => {
            let searches = saved.list();
            if searches.is_empty() {
                println!("No saved searches");
            }
            for entry in searches {
                let filters = entry
                    .filters
                    .as_ref()
                    .map(|f| {
                        format!(
                            " [type={} location={}]",
                            format_optional(f.kind.as_deref(), "all"),
                            format_optional(f.location.as_deref(), "all"),
                        )
                    })
                    .unwrap_or_default();
                println!(
                    "{}  {}  \"{}\"{}",
                    entry.id,
                    truncate(&entry.name, 32),
                    entry.query,
                    filters
                );
            }
        }
        "saved-add" => match args.get(2) {
            Some(query) => {
                let name = args.get(3).map(String::as_str);
                let filters = SearchFilters {
                    kind: args.get(4).cloned(),
                    location: args.get(5).cloned(),
                };
                let entry = saved.add(query, name, Some(filters));
                println!("Saved search '{}' ({})", entry.name, entry.id);
            }
            None => println!("Usage: hamlet saved-add <query> [name] [type] [location]"),
        },
        "saved-remove" => match args.get(2) {
            Some(id) => {
                saved.remove(id);
                println!("Removed saved search {}", id);
            }
            None => println!("Usage: hamlet saved-remove <id>"),
        },
        "saved-rename" => match (args.get(2), args.get(3)) {
            (Some(id), Some(name)) => {
                saved.rename(id, name);
                println!("Renamed saved search {}", id);
            }
            _ => println!("Usage: hamlet saved-rename <id> <name>"),
        },
        "saved-clear" => {
            saved.clear();
            println!("Cleared all saved searches");
        }
        _ => usage(),
    }

    info!("Done");
    Ok(())
}

fn show_location(cache: &LocationCache, key: &str) {
    if key.is_empty() {
        println!("No location given and no default configured.");
        println!("Usage: hamlet location <key>   (e.g. hamlet location mesa)");
        return;
    }

    let info = models::location_info(key);
    let bundle = cache.get(key, &info.name, &info.state);
    if bundle.is_empty() {
        println!("No data for '{}'", key);
        return;
    }

    println!("{}", info.full_name);
    println!("Generated: {}", bundle.generated_at.format("%Y-%m-%d %H:%M UTC"));

    println!("\nMeetings ({})", bundle.meetings.len());
    for meeting in &bundle.meetings {
        println!(
            "  {:<9} {:<7} {}",
            meeting.date,
            meeting.time,
            truncate(&meeting.title, TITLE_WIDTH)
        );
    }

    println!("\nProjects ({})", bundle.projects.len());
    for project in &bundle.projects {
        let status = project
            .status
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<10} {:<13} {}",
            project.date,
            status,
            truncate(&project.title, TITLE_WIDTH)
        );
    }

    println!("\nAgendas ({})", bundle.agendas.len());
    for agenda in &bundle.agendas {
        println!(
            "  {:<18} {:>3}p  {}",
            format_optional(agenda.date.as_deref(), "TBD"),
            agenda.pages,
            truncate(&agenda.display_title(&info.full_name), TITLE_WIDTH)
        );
    }
}

fn show_record(cache: &LocationCache, record_id: &str) {
    let location_id = models::extract_location_id(record_id);
    let info = models::location_info(&location_id);
    let bundle = cache.get(&location_id, &info.name, &info.state);

    if let Some(meeting) = bundle.meetings.iter().find(|m| m.id == record_id) {
        println!("Meeting: {}", meeting.title);
        println!("  {} at {} ({})", meeting.date, meeting.time, meeting.kind);
        println!("  {}", meeting.location);
        return;
    }
    if let Some(project) = bundle.projects.iter().find(|p| p.id == record_id) {
        println!("Project: {}", project.title);
        println!("  {} - {}", project.category, project.date);
        if let Some(status) = project.status {
            println!("  Status: {}", status);
        }
        if let Some(address) = &project.address {
            println!("  {}", address);
        }
        return;
    }
    if let Some(agenda) = bundle.agendas.iter().find(|a| a.id == record_id) {
        println!("Agenda: {}", agenda.display_title(&info.full_name));
        println!(
            "  {} - {} pages{}",
            format_optional(agenda.date.as_deref(), "TBD"),
            agenda.pages,
            if agenda.has_attachments { ", attachments" } else { "" }
        );
        return;
    }
    println!("No record '{}' under location '{}'", record_id, location_id);
}

fn run_search(cache: &LocationCache, query: &str, kind: &str, location: &str) {
    if query.trim().is_empty() {
        println!("Usage: hamlet search <query> [type] [location]");
        return;
    }

    let results = search::all_results(cache);
    let hits = search::search(&results, query, kind, location);

    println!("Found {} results for \"{}\"", hits.len(), query);
    for hit in hits {
        println!(
            "  [{:>2}] {:<8} {:<20} {}",
            hit.relevance,
            hit.kind.to_string(),
            truncate(&hit.location, 20),
            truncate(&hit.title, TITLE_WIDTH)
        );
    }
}

fn usage() {
    println!("hamlet - local cache and search for municipal meeting data");
    println!();
    println!("Commands:");
    println!("  location <key>                       Show cached data for a location");
    println!("  search <query> [type] [location]     Search across cached locations");
    println!("  query <query-string>                 Search via q=/type=/location= params");
    println!("  record <id>                          Show one record, e.g. mesa-m1");
    println!("  warm                                 Pre-generate data for all known cities");
    println!("  stats                                Cache entry count and size");
    println!("  clear [key]                          Drop one location, or everything");
    println!("  set-location <key>                   Set the default location");
    println!("  saved-list                           List saved searches");
    println!("  saved-add <query> [name] [type] [location]");
    println!("  saved-remove <id>");
    println!("  saved-rename <id> <name>");
    println!("  saved-clear");
}
