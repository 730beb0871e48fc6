//! Filename generation and manipulation.

use url::Url;

use crate::error::{Error, Result};
use crate::metadata::EpisodePage;

/// Extension used when the image URL carries none.
const FALLBACK_EXTENSION: &str = "bin";

/// Sanitize a path component (folder or file name).
///
/// Used for slugs scraped from site URLs before they become folder names.
pub fn sanitize_path_component(name: &str) -> Result<String> {
    // Reject path traversal attempts
    if name.contains("..") {
        return Err(Error::InvalidFilename(format!(
            "Path traversal detected: '{}'",
            name
        )));
    }

    if name.contains('\0') {
        return Err(Error::InvalidFilename(format!(
            "Null bytes not allowed: '{}'",
            name
        )));
    }

    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.trim().is_empty() {
        return Err(Error::InvalidFilename(
            "Path component cannot be empty or whitespace-only".to_string(),
        ));
    }

    Ok(sanitized)
}

/// File extension of the last URL path segment, without the dot.
pub fn url_extension(url: &Url) -> Option<&str> {
    let file = url.path_segments()?.next_back()?;
    let (stem, ext) = file.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext)
}

/// File name for a page image.
///
/// Page and episode indices are zero padded so files sort in reading order.
pub fn page_filename(series_slug: &str, page: &EpisodePage) -> String {
    let ext = url_extension(&page.url).unwrap_or(FALLBACK_EXTENSION);
    format!(
        "{}-ep{:03}-page{:03}.{}",
        series_slug, page.episode.index, page.index, ext
    )
}

/// Drop the `type` query parameter, which selects a thumbnail size on the
/// image host.
pub fn strip_type_param(url: &Url) -> Url {
    let mut stripped = url.clone();
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != "type")
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    if kept.is_empty() {
        stripped.set_query(None);
    } else {
        stripped.query_pairs_mut().clear().extend_pairs(kept);
    }
    stripped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::SeriesId;

    fn page(url: &str, episode: u32, index: u32) -> EpisodePage {
        EpisodePage::new(
            SeriesId::new(1).episode(episode),
            index,
            Url::parse(url).unwrap(),
        )
    }

    #[test]
    fn test_sanitize_path_component_valid() {
        assert_eq!(sanitize_path_component("tower-of-god").unwrap(), "tower-of-god");
        assert_eq!(sanitize_path_component("a:b").unwrap(), "a_b");
        assert_eq!(sanitize_path_component("path/to/name").unwrap(), "path_to_name");
    }

    #[test]
    fn test_sanitize_path_component_rejects() {
        assert!(sanitize_path_component("../evil").is_err());
        assert!(sanitize_path_component("nul\0byte").is_err());
        assert!(sanitize_path_component("   ").is_err());
    }

    #[test]
    fn test_page_filename() {
        let p = page("https://img.example.com/a/b/0001.jpg?type=q90", 7, 12);
        assert_eq!(page_filename("my-series", &p), "my-series-ep007-page012.jpg");
    }

    #[test]
    fn test_page_filename_without_extension() {
        let p = page("https://img.example.com/a/b/image", 1, 1);
        assert_eq!(page_filename("s", &p), "s-ep001-page001.bin");
    }

    #[test]
    fn test_url_extension() {
        let url = Url::parse("https://x/y/pic.PNG").unwrap();
        assert_eq!(url_extension(&url), Some("PNG"));
        let url = Url::parse("https://x/y/.hidden").unwrap();
        assert_eq!(url_extension(&url), None);
    }

    #[test]
    fn test_strip_type_param() {
        let url = Url::parse("https://img.example.com/1.jpg?type=q90").unwrap();
        assert_eq!(strip_type_param(&url).as_str(), "https://img.example.com/1.jpg");

        let url = Url::parse("https://img.example.com/1.jpg?x=1&type=q90&y=2").unwrap();
        assert_eq!(
            strip_type_param(&url).as_str(),
            "https://img.example.com/1.jpg?x=1&y=2"
        );

        let url = Url::parse("https://img.example.com/1.jpg").unwrap();
        assert_eq!(strip_type_param(&url), url);
    }
}
