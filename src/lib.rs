//! Frontier-Crawl: a breadth-first web crawler built from map/reduce passes
//!
//! The crawl is an iterative fixpoint over a stream of `url<TAB>state` records.
//! Each hop runs a mapper that fetches unvisited pages and emits the links it
//! finds, then a reducer that merges every record sharing a URL by OR-ing
//! their visited flags. A final filter keeps only absolute URLs.

pub mod config;
pub mod crawler;
pub mod output;
pub mod pipeline;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Frontier-Crawl operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Malformed record: {0}")]
    MalformedRecord(#[from] RecordError),

    #[error("Fetch failed for {url}: {source}")]
    Fetch {
        url: String,
        source: crawler::FetchError,
    },

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("Reduce group is empty")]
    EmptyGroup,

    #[error("{stage} stage failed: {} of {} jobs did not complete", .status.failed(), .status.total)]
    StageFailed {
        stage: &'static str,
        status: crawler::JobStatus,
    },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Task failed to complete: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Errors raised while parsing a `url<TAB>state` line
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("invalid state {0:?}, expected \"0\" or \"1\"")]
    InvalidState(String),

    #[error("missing tab separator in line {0:?}")]
    MissingSeparator(String),

    #[error("too many fields in line {0:?}")]
    TooManyFields(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse base URL {url}: {message}")]
    InvalidBase { url: String, message: String },

    #[error("Failed to resolve {link} against {base}: {message}")]
    Join {
        base: String,
        link: String,
        message: String,
    },
}

impl CrawlError {
    /// Process exit code for this error
    ///
    /// Stage failures report their job status; every other error is 1.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::StageFailed { status, .. } => status.exit_code(),
            _ => 1,
        }
    }
}

/// Result type alias for Frontier-Crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::{AbsoluteLinkPolicy, Config};
pub use state::{Record, VisitState};
pub use crate::url::{is_absolute_link, is_valid_url, normalize_url, resolve_link};
