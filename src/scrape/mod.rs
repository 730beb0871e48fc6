//! HTML extraction for list and viewer pages.
//!
//! Every extractor takes an already parsed [`Html`] document and fails with
//! [`Error::Parse`] when the markup it relies on is missing.

mod consts;

use scraper::Html;
use url::Url;

use crate::error::{Error, Result};

/// Extract the page image URLs of a viewer page, in document order.
///
/// Relative `data-url` values are resolved against `base`.
pub fn extract_page_image_urls(document: &Html, base: &Url) -> Result<Vec<Url>> {
    let list = document
        .select(&consts::IMAGE_LIST_SELECTOR)
        .next()
        .ok_or_else(|| Error::Parse("image list not found on viewer page".into()))?;

    let mut urls = Vec::new();
    for image in list.select(&consts::IMAGE_SELECTOR) {
        let data_url = image
            .value()
            .attr("data-url")
            .ok_or_else(|| Error::Parse("page image without data-url".into()))?;
        urls.push(base.join(data_url.trim())?);
    }

    if urls.is_empty() {
        return Err(Error::Parse("image list contains no pages".into()));
    }

    Ok(urls)
}

/// Extract the series title from a list page.
pub fn extract_series_title(document: &Html) -> Result<String> {
    heading_text(document, &consts::SERIES_TITLE_SELECTOR)
        .or_else(|| og_title(document))
        .ok_or_else(|| Error::Parse("series title not found".into()))
}

/// Extract the episode title from a viewer page.
pub fn extract_episode_title(document: &Html) -> Result<String> {
    document
        .select(&consts::EPISODE_TITLE_SELECTOR)
        .next()
        .and_then(|el| el.value().attr("title").map(str::to_string))
        .map(|title| title.trim().to_string())
        .filter(|title| !title.is_empty())
        .or_else(|| heading_text(document, &consts::EPISODE_TITLE_SELECTOR))
        .or_else(|| og_title(document))
        .ok_or_else(|| Error::Parse("episode title not found".into()))
}

/// Extract the number of free episodes from a list page.
///
/// The list shows the newest episodes, so the highest episode number present
/// is the free episode count.
pub fn extract_free_episode_count(document: &Html) -> Result<u32> {
    let mut highest = None;
    for item in document.select(&consts::EPISODE_ITEM_SELECTOR) {
        let raw = item.value().attr("data-episode-no").unwrap_or_default();
        let number: u32 = raw.trim().parse().map_err(|_| {
            Error::Parse(format!("episode number is not a number: '{}'", raw))
        })?;
        highest = highest.max(Some(number));
    }

    highest.ok_or_else(|| Error::Parse("episode list not found on list page".into()))
}

/// Return the path segment right before `marker` in a canonical URL.
///
/// `https://host/en/comedy/my-series/list?title_no=1` yields `my-series` for
/// the marker `list`.
pub fn slug_before(url: &Url, marker: &str) -> Result<String> {
    let segments: Vec<&str> = url
        .path_segments()
        .map(|segments| segments.filter(|s| !s.is_empty()).collect())
        .unwrap_or_default();

    segments
        .iter()
        .position(|segment| *segment == marker)
        .filter(|&pos| pos > 0)
        .map(|pos| segments[pos - 1].to_string())
        .ok_or_else(|| Error::Parse(format!("no slug before '{}' in {}", marker, url)))
}

fn heading_text(document: &Html, selector: &scraper::Selector) -> Option<String> {
    document
        .select(selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn og_title(document: &Html) -> Option<String> {
    document
        .select(&consts::OG_TITLE_SELECTOR)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIEWER: &str = r#"
        <html><head><meta property="og:title" content="Fallback Title"></head>
        <body>
          <h1 class="subj_episode" title="Episode 3 - The Storm">Episode 3</h1>
          <div id="_imageList">
            <img data-url="https://img.example.com/a/001.jpg?type=q90">
            <img data-url="https://img.example.com/a/002.jpg?type=q90">
            <img data-url="/relative/003.png">
          </div>
        </body></html>
    "#;

    const LIST: &str = r#"
        <html><body>
          <h1 class="subj">  My Series  </h1>
          <ul id="_listUl">
            <li data-episode-no="42"></li>
            <li data-episode-no="41"></li>
            <li data-episode-no="40"></li>
          </ul>
        </body></html>
    "#;

    fn base() -> Url {
        Url::parse("https://www.example.com/en/drama/my-series/ep-3/viewer?title_no=1&episode_no=3")
            .unwrap()
    }

    #[test]
    fn test_page_urls_in_document_order() {
        let doc = Html::parse_document(VIEWER);
        let urls = extract_page_image_urls(&doc, &base()).unwrap();
        assert_eq!(urls.len(), 3);
        assert_eq!(urls[0].as_str(), "https://img.example.com/a/001.jpg?type=q90");
        assert_eq!(urls[2].as_str(), "https://www.example.com/relative/003.png");
    }

    #[test]
    fn test_page_urls_missing_list() {
        let doc = Html::parse_document("<html><body><p>changed</p></body></html>");
        let err = extract_page_image_urls(&doc, &base()).unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_page_urls_image_without_data_url() {
        let doc = Html::parse_document(r#"<div id="_imageList"><img src="x.jpg"></div>"#);
        assert!(matches!(
            extract_page_image_urls(&doc, &base()),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn test_episode_title_prefers_title_attribute() {
        let doc = Html::parse_document(VIEWER);
        assert_eq!(extract_episode_title(&doc).unwrap(), "Episode 3 - The Storm");
    }

    #[test]
    fn test_episode_title_falls_back_to_og_title() {
        let doc = Html::parse_document(
            r#"<html><head><meta property="og:title" content="Only OG"></head></html>"#,
        );
        assert_eq!(extract_episode_title(&doc).unwrap(), "Only OG");
    }

    #[test]
    fn test_series_title_and_free_count() {
        let doc = Html::parse_document(LIST);
        assert_eq!(extract_series_title(&doc).unwrap(), "My Series");
        assert_eq!(extract_free_episode_count(&doc).unwrap(), 42);
    }

    #[test]
    fn test_free_count_missing_list() {
        let doc = Html::parse_document("<html><h1 class=\"subj\">x</h1></html>");
        assert!(matches!(
            extract_free_episode_count(&doc),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn test_free_count_rejects_garbage() {
        let doc = Html::parse_document(r#"<ul id="_listUl"><li data-episode-no="soon"></li></ul>"#);
        assert!(extract_free_episode_count(&doc).is_err());
    }

    #[test]
    fn test_slug_before() {
        let url = Url::parse("https://h/en/comedy/my-series/list?title_no=1").unwrap();
        assert_eq!(slug_before(&url, "list").unwrap(), "my-series");

        let url = Url::parse("https://h/en/comedy/my-series/ep-1-start/viewer?title_no=1").unwrap();
        assert_eq!(slug_before(&url, "viewer").unwrap(), "ep-1-start");

        let url = Url::parse("https://h/list").unwrap();
        assert!(slug_before(&url, "list").is_err());
    }
}
