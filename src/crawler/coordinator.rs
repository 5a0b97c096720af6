//! Crawl coordinator - in-process map/reduce orchestration
//!
//! This module drives the iterate-until-fixpoint loop that an external
//! map/reduce engine would otherwise run:
//! - Partitioning the frontier across concurrent map jobs
//! - Shuffling mapper output into per-URL groups
//! - Reducing every group to one record
//! - Stopping once no unvisited record is left, or at the hop limit
//! - Applying the final filter to the converged frontier

use crate::config::EngineConfig;
use crate::crawler::shuffle::{partition, shuffle};
use crate::crawler::PageFetcher;
use crate::output::CrawlReport;
use crate::pipeline::{filter_records, reduce_group, Mapper};
use crate::state::{Record, VisitState};
use crate::{CrawlError, Result};
use chrono::Utc;
use std::fmt;
use std::sync::Arc;
use tokio::task::JoinSet;

/// Outcome counts for the jobs of one stage
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JobStatus {
    pub succeeded: usize,
    pub total: usize,
}

impl JobStatus {
    pub fn failed(&self) -> usize {
        self.total - self.succeeded
    }

    /// Process exit code for this status: 0 if every job succeeded
    pub fn exit_code(&self) -> u8 {
        if self.succeeded == self.total {
            0
        } else {
            1
        }
    }

    /// Adds another stage's counts to this one
    pub fn absorb(&mut self, other: JobStatus) {
        self.succeeded += other.succeeded;
        self.total += other.total;
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} jobs succeeded", self.succeeded, self.total)
    }
}

/// Result of a single hop
#[derive(Debug, Clone)]
pub struct Iteration {
    /// The reduced frontier, sorted by URL
    pub records: Vec<Record>,
    pub map_status: JobStatus,
    pub reduce_status: JobStatus,
}

impl Iteration {
    /// Number of records still waiting to be fetched
    pub fn unvisited(&self) -> usize {
        count_unvisited(&self.records)
    }

    /// True when the next hop would fetch nothing
    pub fn is_fixpoint(&self) -> bool {
        self.unvisited() == 0
    }
}

fn count_unvisited(records: &[Record]) -> usize {
    records
        .iter()
        .filter(|r| r.state == VisitState::Discovered)
        .count()
}

/// Main crawl engine
pub struct Engine<F> {
    mapper: Arc<Mapper<F>>,
    map_jobs: usize,
    max_iterations: u32,
}

impl<F> Engine<F>
where
    F: PageFetcher + 'static,
{
    /// Creates a new engine
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Where mapper jobs get page bodies from
    /// * `config` - Job count, hop limit, and absolute-link policy
    pub fn new(fetcher: F, config: &EngineConfig) -> Self {
        let mapper = Mapper::new(fetcher).with_absolute_links(config.absolute_links);
        Self {
            mapper: Arc::new(mapper),
            map_jobs: config.map_jobs.max(1),
            max_iterations: config.max_iterations,
        }
    }

    /// Runs one mapper job per partition concurrently
    ///
    /// Outputs are concatenated in partition order. If any job fails, each
    /// failure is logged and the stage fails as a whole.
    pub async fn run_mappers(&self, records: Vec<Record>) -> Result<(Vec<Record>, JobStatus)> {
        let partitions = partition(records, self.map_jobs);
        let total = partitions.len();

        let mut jobs = JoinSet::new();
        for (index, part) in partitions.into_iter().enumerate() {
            let mapper = Arc::clone(&self.mapper);
            jobs.spawn(async move { (index, mapper.map_records(&part).await) });
        }

        let mut outputs: Vec<Option<Vec<Record>>> = vec![None; total];
        let mut failed = 0;
        while let Some(joined) = jobs.join_next().await {
            let (index, result) = joined?;
            match result {
                Ok(emitted) => outputs[index] = Some(emitted),
                Err(e) => {
                    tracing::error!("Map job {} failed: {}", index, e);
                    failed += 1;
                }
            }
        }

        let status = JobStatus {
            succeeded: total - failed,
            total,
        };
        if failed > 0 {
            return Err(CrawlError::StageFailed {
                stage: "map",
                status,
            });
        }
        Ok((outputs.into_iter().flatten().flatten().collect(), status))
    }

    /// Shuffles mapper output and reduces every key group
    pub fn run_reducers(&self, records: Vec<Record>) -> Result<(Vec<Record>, JobStatus)> {
        let groups = shuffle(records);
        let total = groups.len();

        let mut reduced = Vec::with_capacity(total);
        let mut failed = 0;
        for (key, group) in groups {
            match reduce_group(group) {
                Ok(record) => reduced.push(record),
                Err(e) => {
                    tracing::error!("Reduce job for {} failed: {}", key, e);
                    failed += 1;
                }
            }
        }

        let status = JobStatus {
            succeeded: total - failed,
            total,
        };
        if failed > 0 {
            return Err(CrawlError::StageFailed {
                stage: "reduce",
                status,
            });
        }
        Ok((reduced, status))
    }

    /// Runs one hop: map, shuffle, reduce
    pub async fn iterate(&self, frontier: Vec<Record>) -> Result<Iteration> {
        let (mapped, map_status) = self.run_mappers(frontier).await?;
        tracing::debug!("Mappers emitted {} records ({})", mapped.len(), map_status);

        let (records, reduce_status) = self.run_reducers(mapped)?;
        Ok(Iteration {
            records,
            map_status,
            reduce_status,
        })
    }

    /// Crawls from `seeds` until the frontier stops changing
    ///
    /// Seeds enter as unvisited records. Iteration stops when a hop leaves
    /// no unvisited record, or after `max_iterations` hops.
    pub async fn crawl<I, S>(&self, seeds: I) -> Result<CrawlReport>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let started_at = Utc::now();
        let mut frontier: Vec<Record> = seeds.into_iter().map(Record::discovered).collect();
        tracing::info!("Starting crawl with {} seeds", frontier.len());

        let mut iterations = 0;
        let mut map_status = JobStatus::default();
        let mut reduce_status = JobStatus::default();

        while count_unvisited(&frontier) > 0 && iterations < self.max_iterations {
            let hop = self.iterate(frontier).await?;
            iterations += 1;
            map_status.absorb(hop.map_status);
            reduce_status.absorb(hop.reduce_status);

            tracing::info!(
                "Hop {}: {} records, {} unvisited",
                iterations,
                hop.records.len(),
                hop.unvisited()
            );
            frontier = hop.records;
        }

        let converged = count_unvisited(&frontier) == 0;
        if !converged {
            tracing::warn!(
                "Stopped after {} hops with {} URLs still unvisited",
                iterations,
                count_unvisited(&frontier)
            );
        }

        let urls = filter_records(&frontier);
        Ok(CrawlReport {
            iterations,
            converged,
            records: frontier,
            urls,
            map_status,
            reduce_status,
            started_at,
            finished_at: Utc::now(),
        })
    }
}
