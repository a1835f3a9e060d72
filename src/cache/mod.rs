//! Local caching module for per-location civic data.
//!
//! This module provides the `LocationCache`, a generate-on-miss store mapping
//! a location id to its bundle of meetings, projects and agendas. Bundles are
//! persisted as one JSON blob and capped at `MAX_CACHED_LOCATIONS` entries.

pub mod store;

pub use store::{CacheStats, LocationBundle, LocationCache, MAX_CACHED_LOCATIONS};
