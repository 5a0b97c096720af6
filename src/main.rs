//! Frontier-Crawl main entry point
//!
//! This is the command-line interface. Each pass of the crawl is available as
//! its own subcommand so an external map/reduce engine can run it over
//! stdin/stdout, and `crawl` runs every pass in-process.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use frontier_crawl::config::{load_config_with_hash, Config};
use frontier_crawl::crawler::{crawl, HttpFetcher};
use frontier_crawl::output::print_report;
use frontier_crawl::pipeline::{final_filter, reducer, Mapper};
use frontier_crawl::CrawlError;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::io::{AsyncBufRead, AsyncWrite};
use tracing_subscriber::EnvFilter;

/// Frontier-Crawl: a breadth-first web crawler built from map/reduce passes
///
/// Records are tab-separated `url<TAB>state` lines, where state is 0
/// (discovered) or 1 (visited).
#[derive(Parser, Debug)]
#[command(name = "frontier-crawl")]
#[command(version)]
#[command(about = "A breadth-first web crawler built from map/reduce passes", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch unvisited URLs and emit the links found on them
    Map(StreamArgs),

    /// Merge one key group into a single record
    Reduce(StreamArgs),

    /// Print only absolute URLs, dropping the state column
    Final(StreamArgs),

    /// Run map/reduce hops in-process until the frontier is exhausted
    Crawl {
        /// Starting URLs
        #[arg(value_name = "SEED", required = true)]
        seeds: Vec<String>,

        /// Output file for the final URL list (default: stdout)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug)]
struct StreamArgs {
    /// TSV input file (default: stdin)
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// TSV output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries records
    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    match cli.command {
        Command::Map(args) => handle_map(&config, &args).await?,
        Command::Reduce(args) => handle_reduce(&args)?,
        Command::Final(args) => handle_final(&args)?,
        Command::Crawl { seeds, output } => {
            return handle_crawl(&config, seeds, output, cli.quiet).await;
        }
    }
    Ok(ExitCode::SUCCESS)
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("frontier_crawl=info,warn"),
            1 => EnvFilter::new("frontier_crawl=debug,info"),
            2 => EnvFilter::new("frontier_crawl=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

fn open_input(path: Option<&PathBuf>) -> anyhow::Result<Box<dyn BufRead>> {
    Ok(match path {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("cannot open {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    })
}

fn open_output(path: Option<&PathBuf>) -> anyhow::Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("cannot create {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(io::stdout())),
    })
}

async fn open_async_input(path: Option<&PathBuf>) -> anyhow::Result<Box<dyn AsyncBufRead + Unpin + Send>> {
    Ok(match path {
        Some(path) => Box::new(tokio::io::BufReader::new(
            tokio::fs::File::open(path)
                .await
                .with_context(|| format!("cannot open {}", path.display()))?,
        )),
        None => Box::new(tokio::io::BufReader::new(tokio::io::stdin())),
    })
}

async fn open_async_output(path: Option<&PathBuf>) -> anyhow::Result<Box<dyn AsyncWrite + Unpin + Send>> {
    Ok(match path {
        Some(path) => Box::new(tokio::io::BufWriter::new(
            tokio::fs::File::create(path)
                .await
                .with_context(|| format!("cannot create {}", path.display()))?,
        )),
        None => Box::new(tokio::io::BufWriter::new(tokio::io::stdout())),
    })
}

/// Handles the map pass
async fn handle_map(config: &Config, args: &StreamArgs) -> anyhow::Result<()> {
    let fetcher = HttpFetcher::new(&config.fetcher).context("failed to build HTTP client")?;
    let mapper = Mapper::new(fetcher).with_absolute_links(config.engine.absolute_links);

    let input = open_async_input(args.input.as_ref()).await?;
    let mut output = open_async_output(args.output.as_ref()).await?;

    mapper.run(input, &mut output).await.context("map pass failed")?;
    Ok(())
}

/// Handles the reduce pass
fn handle_reduce(args: &StreamArgs) -> anyhow::Result<()> {
    let input = open_input(args.input.as_ref())?;
    let mut output = open_output(args.output.as_ref())?;

    reducer::run(input, &mut output).context("reduce pass failed")?;
    Ok(())
}

/// Handles the final filter pass
fn handle_final(args: &StreamArgs) -> anyhow::Result<()> {
    let input = open_input(args.input.as_ref())?;
    let mut output = open_output(args.output.as_ref())?;

    let kept = final_filter::run(input, &mut output).context("final pass failed")?;
    tracing::debug!("Final filter kept {} URLs", kept);
    Ok(())
}

/// Handles the in-process crawl
async fn handle_crawl(
    config: &Config,
    seeds: Vec<String>,
    output: Option<PathBuf>,
    quiet: bool,
) -> anyhow::Result<ExitCode> {
    tracing::info!(
        "Crawling {} seeds with {} map jobs, at most {} hops",
        seeds.len(),
        config.engine.map_jobs,
        config.engine.max_iterations
    );

    let report = match crawl(config, seeds).await {
        Ok(report) => report,
        Err(e @ CrawlError::StageFailed { .. }) => {
            tracing::error!("Crawl failed: {}", e);
            return Ok(ExitCode::from(e.exit_code()));
        }
        Err(e) => return Err(anyhow::Error::new(e).context("crawl failed")),
    };

    let mut out = open_output(output.as_ref())?;
    for url in &report.urls {
        writeln!(out, "{}", url)?;
    }
    out.flush()?;

    if !quiet {
        print_report(&report);
    }

    let status = report.map_status.exit_code().max(report.reduce_status.exit_code());
    Ok(ExitCode::from(status))
}
