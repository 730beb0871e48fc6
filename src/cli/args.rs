//! Command-line argument definitions using clap.

use clap::Parser;
use std::path::PathBuf;

use crate::config::{parse_title_no, Config, SeriesConfig};
use crate::error::Result;

/// Webcomic episode downloader CLI.
#[derive(Parser, Debug)]
#[command(
    name = "webtoon-download",
    version,
    about = "Download webcomic episodes into a local library",
    long_about = "Downloads every free episode of the configured series, one episode at a time.\n\n\
                  Episodes whose chapter folder already exists are skipped."
)]
pub struct Args {
    /// Series to download, as title_no or series URL.
    /// Replaces the series configured in the series directory.
    #[arg(short, long, value_delimiter = ' ', num_args = 1..)]
    pub series: Option<Vec<String>>,

    /// Root directory of the library.
    #[arg(short, long, env = "WEBTOON_LIBRARY")]
    pub library: Option<PathBuf>,

    /// Configuration directory containing downloader.conf.toml and series/.
    #[arg(short, long, env = "WEBTOON_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// Number of episodes downloaded at the same time.
    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Hide the progress bar.
    #[arg(long, short)]
    pub quiet: bool,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

impl Args {
    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(&self, config: &mut Config) -> Result<()> {
        if let Some(series) = &self.series {
            config.series = series
                .iter()
                .map(|input| parse_title_no(input).map(|title_no| SeriesConfig { title_no }))
                .collect::<Result<_>>()?;
        }

        if let Some(library) = &self.library {
            config.library_path = Some(library.clone());
        }

        if let Some(workers) = self.workers {
            config.queue.workers = workers;
        }

        Ok(())
    }
}
