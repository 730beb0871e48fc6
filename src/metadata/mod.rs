//! Series and episode metadata.
//!
//! This module provides:
//! - Identifier value types and their lookup URLs
//! - Populated series, episode and page entities
//! - The per-run metadata cache
//! - Fetchers that populate entities from site pages

pub mod cache;
pub mod fetch;
pub mod ids;
pub mod model;

pub use cache::MetadataCache;
pub use fetch::{cached_or_fetch_series, fetch_populated_episode, fetch_populated_series};
pub use ids::{EpisodeId, SeriesId};
pub use model::{Episode, EpisodePage, Series};
