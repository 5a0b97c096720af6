//! Crawl report and statistics display
//!
//! A `CrawlReport` is what `Engine::crawl` returns: the converged frontier,
//! the URLs that passed the final filter, and counts for every stage.

use crate::crawler::JobStatus;
use crate::state::{Record, VisitState};
use chrono::{DateTime, Utc};
use std::io::{self, Write};

/// Summary of a completed crawl
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Hops actually run
    pub iterations: u32,

    /// True if the last hop left no unvisited record
    pub converged: bool,

    /// Final reduced frontier, sorted by URL
    pub records: Vec<Record>,

    /// URLs that passed the final filter, in frontier order
    pub urls: Vec<String>,

    /// Map job counts summed over all hops
    pub map_status: JobStatus,

    /// Reduce job counts summed over all hops
    pub reduce_status: JobStatus,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl CrawlReport {
    pub fn visited_count(&self) -> usize {
        self.count_state(VisitState::Visited)
    }

    pub fn unvisited_count(&self) -> usize {
        self.count_state(VisitState::Discovered)
    }

    /// Records dropped by the final filter
    pub fn rejected_count(&self) -> usize {
        self.records.len() - self.urls.len()
    }

    /// Wall-clock time of the crawl
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }

    fn count_state(&self, state: VisitState) -> usize {
        self.records.iter().filter(|r| r.state == state).count()
    }
}

/// Writes the report in a formatted manner
///
/// # Arguments
///
/// * `report` - The report to display
/// * `out` - Where to write it
pub fn write_report<W: Write>(report: &CrawlReport, out: &mut W) -> io::Result<()> {
    writeln!(out, "=== Crawl Report ===\n")?;

    writeln!(out, "Overview:")?;
    writeln!(out, "  Started: {}", report.started_at.to_rfc3339())?;
    writeln!(
        out,
        "  Duration: {:.3}s",
        report.duration().num_milliseconds() as f64 / 1000.0
    )?;
    writeln!(out, "  Hops: {}", report.iterations)?;
    writeln!(
        out,
        "  Converged: {}",
        if report.converged { "yes" } else { "no (hop limit reached)" }
    )?;
    writeln!(out)?;

    writeln!(out, "Frontier:")?;
    writeln!(out, "  Total URLs: {}", report.records.len())?;
    writeln!(out, "  Visited: {}", report.visited_count())?;
    writeln!(out, "  Unvisited: {}", report.unvisited_count())?;
    writeln!(out, "  Passed final filter: {}", report.urls.len())?;
    writeln!(out, "  Dropped by final filter: {}", report.rejected_count())?;
    writeln!(out)?;

    writeln!(out, "Jobs:")?;
    writeln!(out, "  Map: {}", report.map_status)?;
    writeln!(out, "  Reduce: {}", report.reduce_status)?;

    Ok(())
}

/// Prints the report to stderr so stdout stays a clean URL list
pub fn print_report(report: &CrawlReport) {
    let stderr = io::stderr();
    if let Err(e) = write_report(report, &mut stderr.lock()) {
        tracing::warn!("Failed to print crawl report: {}", e);
    }
}
