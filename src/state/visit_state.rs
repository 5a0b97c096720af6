/// Visit state definitions for tracking crawl progress
///
/// The state of a URL is a two-valued lattice: `Discovered < Visited`. Merging
/// is the lattice join, so once any contributor says `Visited` the merged
/// result stays `Visited`.
use crate::RecordError;
use std::fmt;
use std::ops::BitOr;
use std::str::FromStr;

/// Represents whether a URL has been presented to a mapper yet
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VisitState {
    /// Link was found on some page but has not been fetched
    #[default]
    Discovered,

    /// URL has been handed to a mapper
    Visited,
}

impl VisitState {
    /// Wire token for `Discovered`
    pub const DISCOVERED_WIRE: &'static str = "0";

    /// Wire token for `Visited`
    pub const VISITED_WIRE: &'static str = "1";

    /// Parses the wire token; this is the only place a state is validated
    pub fn from_wire(s: &str) -> Result<Self, RecordError> {
        match s {
            Self::DISCOVERED_WIRE => Ok(Self::Discovered),
            Self::VISITED_WIRE => Ok(Self::Visited),
            other => Err(RecordError::InvalidState(other.to_string())),
        }
    }

    /// Converts the state to its wire token
    pub fn as_wire(&self) -> &'static str {
        match self {
            Self::Discovered => Self::DISCOVERED_WIRE,
            Self::Visited => Self::VISITED_WIRE,
        }
    }

    pub fn is_visited(&self) -> bool {
        matches!(self, Self::Visited)
    }

    /// Lattice join (logical OR)
    pub fn merge(self, other: Self) -> Self {
        if self.is_visited() || other.is_visited() {
            Self::Visited
        } else {
            Self::Discovered
        }
    }
}

impl BitOr for VisitState {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.merge(rhs)
    }
}

impl FromStr for VisitState {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_wire(s)
    }
}

impl fmt::Display for VisitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}
