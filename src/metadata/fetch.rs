//! Fetching populated series and episodes.

use scraper::Html;

use crate::api::{Document, WebtoonClient};
use crate::error::Result;
use crate::metadata::cache::MetadataCache;
use crate::metadata::ids::{EpisodeId, SeriesId};
use crate::metadata::model::{Episode, Series};
use crate::scrape::{
    extract_episode_title, extract_free_episode_count, extract_page_image_urls,
    extract_series_title, slug_before,
};

/// Fetch a series list page, cache the populated [`Series`] and return it.
///
/// Always performs one request, even when the series is already cached.
pub async fn fetch_populated_series(
    client: &WebtoonClient,
    cache: &MetadataCache,
    id: SeriesId,
) -> Result<Series> {
    let url = id.indirect_url(client.site())?;
    let document = client.get_document(&url).await?;
    let series = parse_series(id, document)?;

    tracing::debug!(
        "Fetched {} '{}' ({} free episodes)",
        id,
        series.title,
        series.free_episode_count
    );

    cache.insert_series(series.clone()).await;
    Ok(series)
}

/// Fetch an episode viewer page, cache the populated [`Episode`] and return it.
pub async fn fetch_populated_episode(
    client: &WebtoonClient,
    cache: &MetadataCache,
    id: EpisodeId,
) -> Result<Episode> {
    let url = id.indirect_url(client.site())?;
    let document = client.get_document(&url).await?;
    let episode = parse_episode(id, document)?;

    tracing::debug!("Fetched {} with {} pages", id, episode.page_urls.len());

    cache.insert_episode(episode.clone()).await;
    Ok(episode)
}

/// Cached series, or a fresh fetch when it has not been seen yet.
pub async fn cached_or_fetch_series(
    client: &WebtoonClient,
    cache: &MetadataCache,
    id: SeriesId,
) -> Result<Series> {
    match cache.series(id).await {
        Some(series) => Ok(series),
        None => fetch_populated_series(client, cache, id).await,
    }
}

fn parse_series(id: SeriesId, document: Document) -> Result<Series> {
    let html = Html::parse_document(&document.body);

    Ok(Series {
        title_no: id.title_no,
        slug: slug_before(&document.final_url, "list")?,
        title: extract_series_title(&html)?,
        free_episode_count: extract_free_episode_count(&html)?,
        base_url: document.final_url,
    })
}

fn parse_episode(id: EpisodeId, document: Document) -> Result<Episode> {
    let html = Html::parse_document(&document.body);

    Ok(Episode {
        series: id.series,
        index: id.index,
        slug: slug_before(&document.final_url, "viewer")?,
        title: extract_episode_title(&html)?,
        page_urls: extract_page_image_urls(&html, &document.final_url)?,
        base_url: document.final_url,
    })
}
