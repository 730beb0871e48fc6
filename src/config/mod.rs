//! Configuration module for the webtoon-downloader.
//!
//! This module handles:
//! - Loading configuration and series files from TOML
//! - Configuration validation

pub mod loader;
pub mod validation;

pub use loader::{default_config_dir, Config, QueueConfig, SeriesConfig, SiteConfig};
pub use validation::{parse_title_no, validate_config};
