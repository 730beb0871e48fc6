//! Webtoon Download - downloads webcomic episodes into a local library.
//!
//! # Features
//!
//! - Resolves series and episode metadata from the site's lookup URLs
//! - Downloads page images of every free episode
//! - Serializes episodes through a small worker pool to keep traffic low
//! - Skips episodes already present in the library and resumes partial ones
//! - Drain-then-cancel shutdown
//!
//! # Example
//!
//! ```no_run
//! use std::path::PathBuf;
//! use url::Url;
//! use webtoon_downloader::{
//!     fetch_populated_episode, fetch_populated_series, AppContext, DownloadQueue,
//!     MetadataCache, QueueConfig, SeriesId, WebtoonClient,
//! };
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = WebtoonClient::new(
//!         Url::parse(webtoon_downloader::api::SITE_BASE)?,
//!         webtoon_downloader::api::DEFAULT_USER_AGENT,
//!     )?;
//!     let ctx = AppContext::new(client, MetadataCache::new(), PathBuf::from("/srv/comics"));
//!     let queue = DownloadQueue::start(ctx.clone(), &QueueConfig::default())?;
//!
//!     let series = fetch_populated_series(&ctx.client, &ctx.cache, SeriesId::new(95)).await?;
//!     for id in series.free_episode_ids() {
//!         let episode = fetch_populated_episode(&ctx.client, &ctx.cache, id).await?;
//!         queue.enqueue(episode).await?;
//!     }
//!
//!     let summary = queue.shutdown().await?;
//!     println!("{} episodes downloaded", summary.downloaded);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod context;
pub mod download;
pub mod error;
pub mod fs;
pub mod metadata;
pub mod output;
pub mod scrape;

// Re-exports for convenience
pub use api::WebtoonClient;
pub use config::{Config, QueueConfig};
pub use context::AppContext;
pub use download::{
    download_episode, DownloadQueue, QueueEvent, QueueSummary, RunState, WorkerState,
};
pub use error::{Error, Result};
pub use metadata::{
    fetch_populated_episode, fetch_populated_series, Episode, EpisodeId, EpisodePage,
    MetadataCache, Series, SeriesId,
};
