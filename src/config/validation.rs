//! Configuration validation logic.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::config::loader::{Config, QueueConfig, SeriesConfig};
use crate::error::{Error, Result};

static TITLE_NO_PARAM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[?&]title_no=(\d+)").unwrap());

static TITLE_NO_DIRECT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+$").unwrap());

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    config.library_path()?;
    validate_base_url(&config.site.base_url)?;
    validate_queue(&config.queue)?;
    validate_series(&config.series)?;

    Ok(())
}

/// Validate the site origin.
pub fn validate_base_url(base_url: &str) -> Result<Url> {
    let url = Url::parse(base_url).map_err(|e| Error::ConfigValidation {
        field: "site.base_url".to_string(),
        message: format!("'{}' is not a valid URL: {}", base_url, e),
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::ConfigValidation {
            field: "site.base_url".to_string(),
            message: format!("Unsupported scheme '{}'", url.scheme()),
        });
    }

    Ok(url)
}

/// Validate queue sizing and delays.
pub fn validate_queue(queue: &QueueConfig) -> Result<()> {
    if queue.workers == 0 {
        return Err(Error::ConfigValidation {
            field: "queue.workers".to_string(),
            message: "At least one worker is required".to_string(),
        });
    }

    if queue.capacity == 0 {
        return Err(Error::ConfigValidation {
            field: "queue.capacity".to_string(),
            message: "Capacity must be at least 1".to_string(),
        });
    }

    if queue.delay_min_ms > queue.delay_max_ms {
        return Err(Error::ConfigValidation {
            field: "queue.delay_min_ms".to_string(),
            message: format!(
                "Minimum delay ({} ms) exceeds maximum delay ({} ms)",
                queue.delay_min_ms, queue.delay_max_ms
            ),
        });
    }

    Ok(())
}

/// Validate the series list.
pub fn validate_series(series: &[SeriesConfig]) -> Result<()> {
    if series.is_empty() {
        return Err(Error::MissingConfig(
            "series (at least one series title_no required)".to_string(),
        ));
    }

    if let Some(entry) = series.iter().find(|s| s.title_no == 0) {
        return Err(Error::ConfigValidation {
            field: "title_no".to_string(),
            message: format!("Invalid title_no {}", entry.title_no),
        });
    }

    Ok(())
}

/// Extract a series `title_no` from a bare number or a series URL.
pub fn parse_title_no(input: &str) -> Result<u32> {
    let input = input.trim();

    let digits = if input.starts_with("http://") || input.starts_with("https://") {
        TITLE_NO_PARAM
            .captures(input)
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str())
            .ok_or_else(|| Error::ConfigValidation {
                field: "series".to_string(),
                message: format!("Could not find title_no in URL: {}", input),
            })?
    } else if TITLE_NO_DIRECT.is_match(input) {
        input
    } else {
        return Err(Error::ConfigValidation {
            field: "series".to_string(),
            message: format!(
                "Invalid series: '{}'. Must be a title_no or a series URL.",
                input
            ),
        });
    };

    match digits.parse::<u32>() {
        Ok(title_no) if title_no > 0 => Ok(title_no),
        _ => Err(Error::ConfigValidation {
            field: "series".to_string(),
            message: format!("title_no out of range: '{}'", digits),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn valid_config() -> Config {
        Config {
            library_path: Some(PathBuf::from("/library")),
            series: vec![SeriesConfig { title_no: 95 }],
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_missing_library() {
        let mut config = valid_config();
        config.library_path = None;
        assert!(matches!(
            validate_config(&config),
            Err(Error::MissingConfig(_))
        ));
    }

    #[test]
    fn test_no_series() {
        let mut config = valid_config();
        config.series.clear();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_queue_validation() {
        let mut queue = QueueConfig::default();
        queue.workers = 0;
        assert!(validate_queue(&queue).is_err());

        let mut queue = QueueConfig::default();
        queue.delay_min_ms = 5;
        queue.delay_max_ms = 1;
        assert!(validate_queue(&queue).is_err());
    }

    #[test]
    fn test_base_url() {
        assert!(validate_base_url("https://www.webtoons.com").is_ok());
        assert!(validate_base_url("ftp://example.com").is_err());
        assert!(validate_base_url("not a url").is_err());
    }

    #[test]
    fn test_parse_title_no_direct() {
        assert_eq!(parse_title_no("95").unwrap(), 95);
        assert_eq!(parse_title_no(" 1218 ").unwrap(), 1218);
    }

    #[test]
    fn test_parse_title_no_url() {
        let url = "https://www.webtoons.com/en/fantasy/tower-of-god/list?title_no=95&page=2";
        assert_eq!(parse_title_no(url).unwrap(), 95);
    }

    #[test]
    fn test_parse_title_no_invalid() {
        assert!(parse_title_no("0").is_err());
        assert!(parse_title_no("tower").is_err());
        assert!(parse_title_no("https://www.webtoons.com/en/fantasy/x/list").is_err());
        assert!(parse_title_no("99999999999").is_err());
    }
}
