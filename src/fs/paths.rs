//! Library directory layout.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::fs::naming::sanitize_path_component;

/// Volume folder every chapter is placed in.
pub const VOLUME_FOLDER: &str = "Volume 01";

/// Folder holding all episodes of a series.
pub fn series_folder(library: &Path, series_slug: &str) -> Result<PathBuf> {
    Ok(library.join(sanitize_path_component(series_slug)?))
}

/// Destination directory of one episode:
/// `{library}/{slug}/Volume 01/Chapter {index}`.
pub fn episode_folder(library: &Path, series_slug: &str, episode_index: u32) -> Result<PathBuf> {
    Ok(series_folder(library, series_slug)?
        .join(VOLUME_FOLDER)
        .join(format!("Chapter {}", episode_index)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_episode_folder() {
        let path = episode_folder(Path::new("/library"), "tower-climb", 5).unwrap();
        assert_eq!(
            path,
            PathBuf::from("/library/tower-climb/Volume 01/Chapter 5")
        );
    }

    #[test]
    fn test_series_folder_rejects_traversal() {
        assert!(series_folder(Path::new("/library"), "..").is_err());
    }
}
