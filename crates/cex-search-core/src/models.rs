//! Core data models: passages, works and the corpus snapshot.
//!
//! A [`Corpus`] is built once per ingestion run and never mutated after
//! it is published. Works keep input arrival order and so do the passages
//! inside them.

use serde::Serialize;

/// A single cited passage of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Passage {
    /// Work key plus the passage component, e.g. `urn:cts:x:a.b:1.1`.
    pub passage_id: String,
    pub text: String,
    /// Ordinal position of the passage within its work, starting at 0.
    pub index: usize,
}

/// A contiguous run of passages sharing one work key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Work {
    pub work_id: String,
    pub passages: Vec<Passage>,
}

impl Work {
    /// An empty work with the given id.
    pub fn new(work_id: impl Into<String>) -> Self {
        Self {
            work_id: work_id.into(),
            passages: Vec::new(),
        }
    }
}

/// Immutable snapshot of every ingested work.
///
/// The same work id may appear more than once when its records were not
/// contiguous in the source document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Corpus {
    pub works: Vec<Work>,
}

impl Corpus {
    /// A corpus holding `works` in the given order.
    pub fn new(works: Vec<Work>) -> Self {
        Self { works }
    }

    pub fn is_empty(&self) -> bool {
        self.works.is_empty()
    }

    pub fn work_count(&self) -> usize {
        self.works.len()
    }

    pub fn passage_count(&self) -> usize {
        self.works.iter().map(|w| w.passages.len()).sum()
    }

    /// Iterate every passage in corpus order.
    pub fn passages(&self) -> impl Iterator<Item = &Passage> {
        self.works.iter().flat_map(|w| w.passages.iter())
    }

    /// First passage with the given id, in corpus order.
    pub fn find_passage(&self, passage_id: &str) -> Option<&Passage> {
        self.passages().find(|p| p.passage_id == passage_id)
    }
}
