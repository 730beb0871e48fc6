//! Error types for the webtoon-downloader application.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the application.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration value for '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    // Site errors
    #[error("Request to {url} failed: HTTP {status}")]
    Fetch {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("Unexpected page structure: {0}")]
    Parse(String),

    // Download errors
    #[error("Destination already exists: {}", .0.display())]
    DirectoryExists(PathBuf),

    #[error("Download cancelled")]
    Cancelled,

    // Queue errors
    #[error("Download queue is shut down")]
    QueueClosed,

    #[error("Download worker panicked: {0}")]
    WorkerPanicked(String),

    #[error("{0} series failed")]
    SeriesFailed(u64),

    // File system errors
    #[error("Invalid path component: {0}")]
    InvalidFilename(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    // URL parsing errors
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Process exit codes.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const ABORT: i32 = 1;
    pub const SITE_ERROR: i32 = 2;
    pub const CONFIG_ERROR: i32 = 3;
    pub const DOWNLOAD_ERROR: i32 = 4;
    pub const UNEXPECTED_ERROR: i32 = 5;
    pub const SOME_SERIES_FAILED: i32 = 6;
}
