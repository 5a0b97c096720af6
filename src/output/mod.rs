//! Output module for crawl reports
//!
//! This module handles:
//! - The summary returned by a completed in-process crawl
//! - Human-readable report formatting

pub mod stats;

pub use stats::{print_report, write_report, CrawlReport};
