//! Configuration module for Frontier-Crawl
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Every field has a default, so a crawl can run without
//! any file at all.
//!
//! # Example
//!
//! ```no_run
//! use frontier_crawl::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawl.toml")).unwrap();
//! println!("Map jobs per hop: {}", config.engine.map_jobs);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{AbsoluteLinkPolicy, Config, EngineConfig, FetcherConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
