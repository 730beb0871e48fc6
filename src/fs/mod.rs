//! Filesystem module.
//!
//! Provides:
//! - Library directory layout
//! - Page file naming and image URL normalisation

pub mod naming;
pub mod paths;

pub use naming::{page_filename, sanitize_path_component, strip_type_param, url_extension};
pub use paths::{episode_folder, series_folder, VOLUME_FOLDER};
