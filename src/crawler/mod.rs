//! Crawler module for page fetching and crawl orchestration
//!
//! This module contains:
//! - HTTP fetching with bounded time and typed outcomes
//! - HTML parsing and anchor extraction
//! - Partitioning and shuffling between passes
//! - The in-process engine that iterates hops to a fixpoint

mod coordinator;
mod fetcher;
mod parser;
mod shuffle;

pub use coordinator::{Engine, Iteration, JobStatus};
pub use fetcher::{build_http_client, fetch_url, FetchError, FetchResult, HttpFetcher, PageFetcher};
pub use parser::{extract_hrefs, parse_html, ParsedPage};
pub use shuffle::{partition, shuffle};

use crate::config::Config;
use crate::output::CrawlReport;
use crate::CrawlError;

/// Runs a complete crawl over HTTP
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the HTTP client
/// 2. Seed the frontier with unvisited records
/// 3. Run map/shuffle/reduce hops until no unvisited record is left
/// 4. Apply the final filter
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `seeds` - Starting URLs
pub async fn crawl(config: &Config, seeds: Vec<String>) -> Result<CrawlReport, CrawlError> {
    let fetcher = HttpFetcher::new(&config.fetcher)?;
    Engine::new(fetcher, &config.engine).crawl(seeds).await
}
