//! Populated series, episode and page entities.

use std::path::PathBuf;

use url::Url;

use crate::metadata::ids::{EpisodeId, SeriesId};

/// A series populated from its list page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Series {
    pub title_no: u32,

    /// Canonical list page URL the lookup URL redirected to.
    pub base_url: Url,

    pub title: String,

    /// URL slug, also used as the library folder name.
    pub slug: String,

    /// Number of episodes readable without payment.
    pub free_episode_count: u32,
}

impl Series {
    pub fn id(&self) -> SeriesId {
        SeriesId::new(self.title_no)
    }

    pub fn episode_id(&self, index: u32) -> EpisodeId {
        self.id().episode(index)
    }

    /// Identifiers of every free episode, in reading order.
    pub fn free_episode_ids(&self) -> impl Iterator<Item = EpisodeId> + '_ {
        (1..=self.free_episode_count).map(move |index| self.episode_id(index))
    }
}

/// An episode populated from its viewer page.
///
/// The parent series is referenced by identifier only and is recovered
/// through [`MetadataCache`](crate::metadata::MetadataCache).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Episode {
    pub series: SeriesId,
    pub index: u32,
    pub base_url: Url,
    pub title: String,
    pub slug: String,

    /// Page image URLs in reading order.
    pub page_urls: Vec<Url>,
}

impl Episode {
    pub fn id(&self) -> EpisodeId {
        self.series.episode(self.index)
    }

    /// Pages of this episode with 1-based indices in document order.
    pub fn pages(&self) -> Vec<EpisodePage> {
        let id = self.id();
        self.page_urls
            .iter()
            .enumerate()
            .map(|(i, url)| EpisodePage::new(id, i as u32 + 1, url.clone()))
            .collect()
    }
}

/// One image of an episode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodePage {
    pub episode: EpisodeId,
    pub index: u32,
    pub url: Url,

    /// Set once the image has been fully written to disk.
    pub local_path: Option<PathBuf>,
}

impl EpisodePage {
    pub fn new(episode: EpisodeId, index: u32, url: Url) -> Self {
        Self {
            episode,
            index,
            url,
            local_path: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.local_path.is_some()
    }

    /// Record the on-disk location. Only the first call has an effect.
    pub fn mark_complete(&mut self, path: PathBuf) {
        if self.local_path.is_none() {
            self.local_path = Some(path);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episode_with_pages(n: usize) -> Episode {
        Episode {
            series: SeriesId::new(10),
            index: 4,
            base_url: Url::parse("https://example.com/en/drama/s/ep-4/viewer?title_no=10&episode_no=4")
                .unwrap(),
            title: "Episode 4".into(),
            slug: "ep-4".into(),
            page_urls: (0..n)
                .map(|i| Url::parse(&format!("https://img.example.com/{i}.jpg")).unwrap())
                .collect(),
        }
    }

    #[test]
    fn test_pages_are_one_based_in_document_order() {
        let pages = episode_with_pages(3).pages();
        let indices: Vec<u32> = pages.iter().map(|p| p.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
        assert_eq!(pages[0].url.path(), "/0.jpg");
        assert!(pages.iter().all(|p| !p.is_complete()));
    }

    #[test]
    fn test_mark_complete_only_once() {
        let mut page = episode_with_pages(1).pages().remove(0);
        page.mark_complete(PathBuf::from("/a.jpg"));
        page.mark_complete(PathBuf::from("/b.jpg"));
        assert_eq!(page.local_path, Some(PathBuf::from("/a.jpg")));
    }

    #[test]
    fn test_free_episode_ids() {
        let series = Series {
            title_no: 10,
            base_url: Url::parse("https://example.com/en/drama/s/list?title_no=10").unwrap(),
            title: "S".into(),
            slug: "s".into(),
            free_episode_count: 3,
        };
        let ids: Vec<u32> = series.free_episode_ids().map(|id| id.index).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(series.episode_id(2).series, series.id());
    }
}
