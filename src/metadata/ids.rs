//! Identifier value types.

use std::fmt;

use url::Url;

use crate::error::Result;

/// Identifies a series by its numeric `title_no`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeriesId {
    pub title_no: u32,
}

impl SeriesId {
    pub fn new(title_no: u32) -> Self {
        Self { title_no }
    }

    /// Lookup URL that the site redirects to the canonical, slug-bearing list page.
    pub fn indirect_url(&self, site: &Url) -> Result<Url> {
        let mut url = site.join("/en/genre/series/list")?;
        url.query_pairs_mut()
            .append_pair("title_no", &self.title_no.to_string());
        Ok(url)
    }

    /// Identifier of the episode with the given 1-based index.
    pub fn episode(&self, index: u32) -> EpisodeId {
        EpisodeId {
            series: *self,
            index,
        }
    }
}

impl fmt::Display for SeriesId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "series {}", self.title_no)
    }
}

/// Identifies one episode of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EpisodeId {
    pub series: SeriesId,
    pub index: u32,
}

impl EpisodeId {
    /// Lookup URL that the site redirects to the canonical viewer page.
    pub fn indirect_url(&self, site: &Url) -> Result<Url> {
        let mut url = site.join("/en/genre/series/episode/viewer")?;
        url.query_pairs_mut()
            .append_pair("title_no", &self.series.title_no.to_string())
            .append_pair("episode_no", &self.index.to_string());
        Ok(url)
    }
}

impl fmt::Display for EpisodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} episode {}", self.series, self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> Url {
        Url::parse("https://www.webtoons.com").unwrap()
    }

    #[test]
    fn test_series_indirect_url() {
        let url = SeriesId::new(95).indirect_url(&site()).unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.webtoons.com/en/genre/series/list?title_no=95"
        );
    }

    #[test]
    fn test_episode_indirect_url() {
        let url = SeriesId::new(95).episode(7).indirect_url(&site()).unwrap();
        assert_eq!(
            url.as_str(),
            "https://www.webtoons.com/en/genre/series/episode/viewer?title_no=95&episode_no=7"
        );
    }

    #[test]
    fn test_indirect_url_ignores_site_path() {
        let site = Url::parse("http://127.0.0.1:8080/some/prefix/").unwrap();
        let url = SeriesId::new(1).indirect_url(&site).unwrap();
        assert_eq!(url.path(), "/en/genre/series/list");
    }

    #[test]
    fn test_display() {
        assert_eq!(SeriesId::new(3).episode(12).to_string(), "series 3 episode 12");
    }
}
