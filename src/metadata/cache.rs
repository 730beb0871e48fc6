//! In-memory metadata cache.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::metadata::ids::{EpisodeId, SeriesId};
use crate::metadata::model::{Episode, Series};

/// Populated series and episodes keyed by identifier.
///
/// Lives for one run and is shared by cloning. Entries are never evicted;
/// a refetch replaces the stored value.
#[derive(Debug, Clone, Default)]
pub struct MetadataCache {
    series: Arc<RwLock<HashMap<SeriesId, Series>>>,
    episodes: Arc<RwLock<HashMap<EpisodeId, Episode>>>,
}

impl MetadataCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn series(&self, id: SeriesId) -> Option<Series> {
        self.series.read().await.get(&id).cloned()
    }

    pub async fn episode(&self, id: EpisodeId) -> Option<Episode> {
        self.episodes.read().await.get(&id).cloned()
    }

    pub async fn insert_series(&self, series: Series) {
        self.series.write().await.insert(series.id(), series);
    }

    pub async fn insert_episode(&self, episode: Episode) {
        self.episodes.write().await.insert(episode.id(), episode);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    fn series(title: &str) -> Series {
        Series {
            title_no: 1,
            base_url: Url::parse("https://example.com/en/a/b/list?title_no=1").unwrap(),
            title: title.into(),
            slug: "b".into(),
            free_episode_count: 2,
        }
    }

    #[tokio::test]
    async fn test_insert_overwrites() {
        let cache = MetadataCache::new();
        assert!(cache.series(SeriesId::new(1)).await.is_none());

        cache.insert_series(series("first")).await;
        cache.insert_series(series("second")).await;

        let cached = cache.series(SeriesId::new(1)).await.unwrap();
        assert_eq!(cached.title, "second");
    }

    #[tokio::test]
    async fn test_clones_share_state_but_new_caches_are_isolated() {
        let cache = MetadataCache::new();
        let clone = cache.clone();
        let other = MetadataCache::new();

        cache.insert_series(series("shared")).await;

        assert!(clone.series(SeriesId::new(1)).await.is_some());
        assert!(other.series(SeriesId::new(1)).await.is_none());
    }

    #[tokio::test]
    async fn test_episode_lookup() {
        let cache = MetadataCache::new();
        let episode = Episode {
            series: SeriesId::new(1),
            index: 1,
            base_url: Url::parse("https://example.com/en/a/b/ep/viewer?title_no=1&episode_no=1")
                .unwrap(),
            title: "ep".into(),
            slug: "ep".into(),
            page_urls: Vec::new(),
        };
        cache.insert_episode(episode.clone()).await;

        assert_eq!(cache.episode(episode.id()).await, Some(episode));
        assert!(cache.episode(SeriesId::new(1).episode(2)).await.is_none());
    }
}
