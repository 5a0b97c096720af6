//! State module for records flowing through the crawl pipeline
//!
//! # Components
//!
//! - `VisitState`: the two-valued visited lattice and its OR merge
//! - `Record`: a `(url, state)` pair and its tab-separated wire form

mod record;
mod visit_state;

// Re-export main types
pub use record::{Record, FIELD_SEPARATOR};
pub use visit_state::VisitState;
