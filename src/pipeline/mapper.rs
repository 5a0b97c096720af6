//! Mapper pass
//!
//! For each input record the mapper always re-emits the record's URL as
//! visited. If the input was unvisited it also fetches the page and emits one
//! unvisited record per anchor on it. The visited re-emission means "was
//! presented to a mapper", not "was fetched successfully"; combined with the
//! reducer's OR-merge it is what makes visited status sticky across hops.

use crate::config::AbsoluteLinkPolicy;
use crate::crawler::{parse_html, PageFetcher};
use crate::state::{Record, VisitState};
use crate::url::{is_absolute_link, normalize_url, resolve_link};
use crate::{CrawlError, Result, UrlError, UrlResult};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// Counters for one mapper invocation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MapStats {
    /// Records read
    pub records_in: usize,
    /// Records written
    pub records_out: usize,
    /// Pages requested, successful or not
    pub pages_fetched: usize,
}

/// Turns frontier records into the records of the next hop
pub struct Mapper<F> {
    fetcher: F,
    absolute_links: AbsoluteLinkPolicy,
}

impl<F: PageFetcher> Mapper<F> {
    /// Creates a mapper with the default absolute-link policy
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            absolute_links: AbsoluteLinkPolicy::default(),
        }
    }

    /// Sets how absolute links are emitted
    pub fn with_absolute_links(mut self, policy: AbsoluteLinkPolicy) -> Self {
        self.absolute_links = policy;
        self
    }

    /// Maps a single record to its emissions, in emission order
    ///
    /// The first emission is always `(normalize(url), Visited)`. Visited
    /// inputs are never fetched.
    pub async fn map_record(&self, record: &Record) -> Result<Vec<Record>> {
        let mut emitted = vec![Record::visited(normalize_url(&record.url))];

        if record.state == VisitState::Discovered {
            let body = self
                .fetcher
                .fetch(&record.url)
                .await
                .into_body()
                .map_err(|source| CrawlError::Fetch {
                    url: record.url.clone(),
                    source,
                })?;

            let links = expand_links(&record.url, &body, self.absolute_links)?;
            tracing::debug!("{} yielded {} links", record.url, links.len());
            emitted.extend(links);
        }

        Ok(emitted)
    }

    /// Maps every record of a batch, stopping at the first failure
    pub async fn map_records(&self, records: &[Record]) -> Result<Vec<Record>> {
        let mut out = Vec::with_capacity(records.len());
        for record in records {
            out.extend(self.map_record(record).await?);
        }
        Ok(out)
    }

    async fn map_counted(&self, line: &str, stats: &mut MapStats) -> Result<Vec<Record>> {
        let record = Record::parse_line(line)?;
        stats.records_in += 1;
        if record.state == VisitState::Discovered {
            stats.pages_fetched += 1;
        }
        self.map_record(&record).await
    }

    /// Runs the mapper over a line stream
    ///
    /// Output is written as each input line is processed and is not rolled
    /// back: when line N fails, whatever lines 1..N produced stays written.
    pub async fn run<R, W>(&self, reader: R, writer: &mut W) -> Result<MapStats>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut stats = MapStats::default();
        let mut lines = reader.lines();

        while let Some(line) = lines.next_line().await? {
            let emitted = match self.map_counted(&line, &mut stats).await {
                Ok(emitted) => emitted,
                Err(e) => {
                    writer.flush().await?;
                    return Err(e);
                }
            };

            for out in &emitted {
                writer.write_all(out.to_line().as_bytes()).await?;
                writer.write_all(b"\n").await?;
            }
            stats.records_out += emitted.len();
        }

        writer.flush().await?;
        tracing::info!(
            "Mapper done: {} records in, {} out, {} pages requested",
            stats.records_in,
            stats.records_out,
            stats.pages_fetched
        );
        Ok(stats)
    }
}

/// Builds the unvisited records for every anchor on a fetched page
///
/// Relative links are resolved against `base` and emitted normalized; a
/// link that cannot be joined is logged and skipped. For absolute links the
/// policy decides: `EchoBase` emits `base` itself, `Follow` emits the link.
///
/// # Errors
///
/// `UrlError::InvalidBase` if the page has a relative link and `base` does
/// not parse as an absolute URL.
///
/// The parsed document is dropped before this returns, so callers can hold
/// the result across an `.await`.
pub fn expand_links(base: &str, body: &str, policy: AbsoluteLinkPolicy) -> UrlResult<Vec<Record>> {
    let page = parse_html(body);
    let mut links = Vec::new();

    for href in page.hrefs() {
        let next = if !is_absolute_link(href) {
            match resolve_link(base, href) {
                Ok(resolved) => normalize_url(&resolved).to_string(),
                Err(e @ UrlError::InvalidBase { .. }) => return Err(e),
                Err(e) => {
                    tracing::warn!("Skipping link on {}: {}", base, e);
                    continue;
                }
            }
        } else {
            match policy {
                AbsoluteLinkPolicy::EchoBase => normalize_url(base).to_string(),
                AbsoluteLinkPolicy::Follow => normalize_url(href).to_string(),
            }
        };
        links.push(Record::discovered(next));
    }

    Ok(links)
}
