//! Data models for municipal meeting records.
//!
//! This module contains all the data structures used to represent
//! civic data including:
//!
//! - `Meeting`: scheduled and past governing-body meetings
//! - `Project`: development projects before a governing body
//! - `Agenda`, `AgendaMatch`: published meeting agendas
//! - `Location`: the state/city catalog used to index everything
//! - `SearchResult`, `SavedSearch`: the cross-location search surface

pub mod agenda;
pub mod location;
pub mod meeting;
pub mod project;
pub mod search;

pub use agenda::{Agenda, AgendaMatch};
pub use location::{
    extract_location_id, find_location, location_info, resolve_location_name, Location,
    LocationInfo, LocationKind,
};
pub use meeting::{Meeting, MeetingKind};
pub use project::{Project, ProjectStatus};
pub use search::{ResultKind, SavedSearch, SearchFilters, SearchResult};
