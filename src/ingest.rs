//! Ingestion pipeline orchestration.
//!
//! Coordinates one reload: source → parser → corpus store. The new corpus
//! is built entirely before it is published, and a failed reload leaves
//! the current snapshot untouched. Reloads are serialized by a
//! single-writer lock.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{info, warn};

use cex_search_core::error::ParseError;
use cex_search_core::models::Corpus;
use cex_search_core::parser;
use cex_search_core::store::CorpusStore;

use crate::fetch::{CorpusSource, FetchError};

/// Why a reload did not publish a corpus.
#[derive(Error, Debug)]
pub enum IngestError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl IngestError {
    pub fn kind(&self) -> &'static str {
        match self {
            IngestError::Fetch(_) => "fetch",
            IngestError::Parse(_) => "parse",
        }
    }
}

/// Summary of a successful reload.
#[derive(Debug, Clone, Serialize)]
pub struct IngestReport {
    pub generation: u64,
    pub works: usize,
    pub passages: usize,
    pub bytes: usize,
    /// SHA-256 of the fetched bytes, hex encoded.
    pub digest: String,
    pub loaded_at: DateTime<Utc>,
}

/// Fetch and parse without publishing. Used by one-shot CLI commands.
pub async fn load_corpus(source: &dyn CorpusSource) -> Result<(Corpus, Vec<u8>), IngestError> {
    let raw = source.fetch().await?;
    let corpus = parser::parse(&raw)?;
    Ok((corpus, raw))
}

/// Lowercase hex SHA-256 of `bytes`.
pub fn digest_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Reloads the corpus from one source into one store.
pub struct Ingestor {
    source: Box<dyn CorpusSource>,
    store: Arc<CorpusStore>,
    /// Held for the whole reload; also remembers the last success.
    writer: Mutex<Option<IngestReport>>,
}

impl Ingestor {
    pub fn new(source: Box<dyn CorpusSource>, store: Arc<CorpusStore>) -> Self {
        Self {
            source,
            store,
            writer: Mutex::new(None),
        }
    }

    pub fn store(&self) -> &Arc<CorpusStore> {
        &self.store
    }

    pub fn source_description(&self) -> String {
        self.source.describe()
    }

    /// Fetch, parse and publish a fresh corpus.
    pub async fn reload(&self) -> Result<IngestReport, IngestError> {
        let mut last = self.writer.lock().await;
        let source = self.source.describe();
        info!(source = %source, "reloading corpus");

        let (corpus, raw) = match load_corpus(self.source.as_ref()).await {
            Ok(loaded) => loaded,
            Err(e) => {
                warn!(source = %source, kind = e.kind(), error = %e, "reload failed; keeping current corpus");
                return Err(e);
            }
        };

        let works = corpus.work_count();
        let passages = corpus.passage_count();
        let generation = self.store.replace(corpus);

        let report = IngestReport {
            generation,
            works,
            passages,
            bytes: raw.len(),
            digest: digest_hex(&raw),
            loaded_at: Utc::now(),
        };
        info!(
            generation,
            works,
            passages,
            bytes = report.bytes,
            digest = %report.digest,
            "corpus published"
        );

        *last = Some(report.clone());
        Ok(report)
    }

    /// Report of the last successful reload, if any.
    pub async fn last_report(&self) -> Option<IngestReport> {
        self.writer.lock().await.clone()
    }
}
