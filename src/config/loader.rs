//! Configuration structures and loading logic.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::api::{DEFAULT_USER_AGENT, SITE_BASE};
use crate::error::{Error, Result};

/// Name of the main configuration file inside the config directory.
pub const DOWNLOADER_CONFIG_FILE: &str = "downloader.conf.toml";

/// Directory holding one `*.conf.toml` file per series.
pub const SERIES_CONFIG_DIR: &str = "series";

const SERIES_CONFIG_SUFFIX: &str = ".conf.toml";

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Root directory of the comic library.
    #[serde(default)]
    pub library_path: Option<PathBuf>,

    #[serde(default)]
    pub site: SiteConfig,

    #[serde(default)]
    pub queue: QueueConfig,

    /// Series to download, loaded from the series directory.
    #[serde(skip)]
    pub series: Vec<SeriesConfig>,
}

/// Site access configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site origin used for lookup URLs and as image referer.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Browser user agent string.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

/// Download queue configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueConfig {
    /// Number of concurrent episode downloads. One keeps traffic low.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Episodes that may wait in the queue before `enqueue` waits.
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Seconds workers get to stop after cancellation before being aborted.
    #[serde(default = "default_shutdown_grace")]
    pub shutdown_grace_seconds: u64,

    /// Lower bound of the pause after each downloaded episode.
    #[serde(default = "default_delay_min")]
    pub delay_min_ms: u64,

    /// Upper bound of the pause after each downloaded episode.
    #[serde(default = "default_delay_max")]
    pub delay_max_ms: u64,
}

/// One series to download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesConfig {
    pub title_no: u32,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            capacity: default_capacity(),
            shutdown_grace_seconds: default_shutdown_grace(),
            delay_min_ms: default_delay_min(),
            delay_max_ms: default_delay_max(),
        }
    }
}

impl QueueConfig {
    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_seconds)
    }
}

fn default_base_url() -> String {
    SITE_BASE.to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_workers() -> usize {
    1
}

fn default_capacity() -> usize {
    256
}

fn default_shutdown_grace() -> u64 {
    10
}

fn default_delay_min() -> u64 {
    1000
}

fn default_delay_max() -> u64 {
    3000
}

/// Platform configuration directory, e.g. `~/.config/webtoon-download`.
pub fn default_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "webtoon-download").map(|dirs| dirs.config_dir().to_path_buf())
}

impl Config {
    /// Load the downloader configuration and all series files from a
    /// configuration directory.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let mut config = Self::load(&dir.join(DOWNLOADER_CONFIG_FILE))?;
        config.series = load_series_dir(&dir.join(SERIES_CONFIG_DIR))?;
        Ok(config)
    }

    /// Load the downloader configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!(
                    "Configuration file not found: {}",
                    path.display()
                ))
            } else {
                Error::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Library root, or an error when none is configured.
    pub fn library_path(&self) -> Result<&Path> {
        self.library_path
            .as_deref()
            .ok_or_else(|| Error::MissingConfig("library_path".to_string()))
    }
}

/// Load every `*.conf.toml` in `dir`, sorted by file name.
///
/// A missing directory yields no series.
pub fn load_series_dir(dir: &Path) -> Result<Vec<SeriesConfig>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.is_file()
                && path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.ends_with(SERIES_CONFIG_SUFFIX))
        })
        .collect();
    paths.sort();

    let mut series = Vec::with_capacity(paths.len());
    for path in paths {
        let content = fs::read_to_string(&path)?;
        let entry: SeriesConfig = toml::from_str(&content).map_err(|e| {
            Error::Config(format!("Invalid series file {}: {}", path.display(), e))
        })?;
        series.push(entry);
    }

    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_from_minimal_file() {
        let config: Config = toml::from_str(r#"library_path = "/srv/comics""#).unwrap();
        assert_eq!(config.library_path, Some(PathBuf::from("/srv/comics")));
        assert_eq!(config.site.base_url, SITE_BASE);
        assert_eq!(config.queue.workers, 1);
        assert_eq!(config.queue.shutdown_grace(), Duration::from_secs(10));
        assert!(config.series.is_empty());
    }

    #[test]
    fn test_load_dir_reads_series_files_in_order() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(DOWNLOADER_CONFIG_FILE),
            "library_path = \"/lib\"\n[queue]\nworkers = 2\n",
        )
        .unwrap();
        let series_dir = dir.path().join(SERIES_CONFIG_DIR);
        fs::create_dir(&series_dir).unwrap();
        fs::write(series_dir.join("b.conf.toml"), "title_no = 20").unwrap();
        fs::write(series_dir.join("a.conf.toml"), "title_no = 10").unwrap();
        fs::write(series_dir.join("notes.txt"), "ignored").unwrap();

        let config = Config::load_dir(dir.path()).unwrap();
        assert_eq!(config.queue.workers, 2);
        assert_eq!(
            config.series,
            vec![SeriesConfig { title_no: 10 }, SeriesConfig { title_no: 20 }]
        );
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = Config::load_dir(dir.path()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_invalid_series_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("x.conf.toml"), "title_no = \"abc\"").unwrap();
        assert!(load_series_dir(dir.path()).is_err());
    }

    #[test]
    fn test_library_path_missing() {
        assert!(matches!(
            Config::default().library_path(),
            Err(Error::MissingConfig(_))
        ));
    }
}
