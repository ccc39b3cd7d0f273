use thiserror::Error;

/// Failure to turn raw CEX bytes into a [`Corpus`](crate::models::Corpus).
///
/// `record` is the 0-based index of the record within the data segment;
/// `line` is the 1-based line of the source document where it starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("missing #!ctsdata section")]
    MissingSentinel,

    #[error("malformed record {record} at line {line}: expected a citation and at least one text field")]
    MalformedRecord { record: usize, line: usize },

    #[error("malformed citation {citation:?} in record {record} at line {line}")]
    MalformedCitation {
        record: usize,
        line: usize,
        citation: String,
    },
}

impl ParseError {
    /// Record index and source line, when the error is tied to a record.
    pub fn location(&self) -> Option<(usize, usize)> {
        match self {
            ParseError::MissingSentinel => None,
            ParseError::MalformedRecord { record, line }
            | ParseError::MalformedCitation { record, line, .. } => Some((*record, *line)),
        }
    }
}

/// Rejected query input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("query must not be empty")]
    EmptyQuery,
}
