use crate::state::VisitState;
use crate::RecordError;
use std::fmt;
use std::str::FromStr;

/// Field separator of the line-oriented wire format
pub const FIELD_SEPARATOR: char = '\t';

/// A `(url, state)` pair, the unit of data flowing between passes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record {
    pub url: String,
    pub state: VisitState,
}

impl Record {
    pub fn new(url: impl Into<String>, state: VisitState) -> Self {
        Self {
            url: url.into(),
            state,
        }
    }

    /// A frontier candidate that has not been fetched
    pub fn discovered(url: impl Into<String>) -> Self {
        Self::new(url, VisitState::Discovered)
    }

    /// A URL that has been presented to a mapper
    pub fn visited(url: impl Into<String>) -> Self {
        Self::new(url, VisitState::Visited)
    }

    /// Parses one `url<TAB>state` line
    ///
    /// Trailing whitespace is stripped first. The line must hold exactly two
    /// tab-separated fields and the state must be `"0"` or `"1"`.
    pub fn parse_line(line: &str) -> Result<Self, RecordError> {
        let line = line.trim_end();
        let mut fields = line.split(FIELD_SEPARATOR);

        // split always yields at least one field
        let url = fields.next().unwrap_or_default();
        let state = fields
            .next()
            .ok_or_else(|| RecordError::MissingSeparator(line.to_string()))?;

        if fields.next().is_some() {
            return Err(RecordError::TooManyFields(line.to_string()));
        }

        Ok(Self::new(url, VisitState::from_wire(state)?))
    }

    /// Formats the record as a wire line without the trailing newline
    pub fn to_line(&self) -> String {
        self.to_string()
    }
}

impl FromStr for Record {
    type Err = RecordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_line(s)
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.url, FIELD_SEPARATOR, self.state)
    }
}
