//! The three record-processing passes of the crawl
//!
//! - `Mapper`: fetches unvisited URLs and emits the links found on them
//! - `reducer`: merges every record of one URL into a single record
//! - `final_filter`: keeps only absolute URLs after the last hop
//!
//! Each pass is a function from one input stream to one output stream with
//! no state shared between invocations.

pub mod final_filter;
mod mapper;
pub mod reducer;

pub use final_filter::{filter_line, filter_records};
pub use mapper::{expand_links, MapStats, Mapper};
pub use reducer::{reduce_group, reduce_lines};
