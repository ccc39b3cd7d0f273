//! Query service: substring search across every passage of a corpus.
//!
//! Results keep corpus order (works in stored order, passages in stored
//! order within each work). No ranking is applied.

use serde::Serialize;

use crate::error::ValidationError;
use crate::models::Corpus;
use crate::search;

/// Passages whose text contains the query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResults {
    pub query: String,
    pub count: usize,
    pub passages: Vec<String>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }
}

/// Find every passage containing `query`.
///
/// An empty query is rejected without scanning. Zero matches is a
/// successful, empty result.
pub fn search(corpus: &Corpus, query: &str) -> Result<SearchResults, ValidationError> {
    if query.is_empty() {
        return Err(ValidationError::EmptyQuery);
    }

    let passages: Vec<String> = corpus
        .passages()
        .filter(|p| search::contains(&p.text, query))
        .map(|p| p.passage_id.clone())
        .collect();

    Ok(SearchResults {
        query: query.to_string(),
        count: passages.len(),
        passages,
    })
}
