//! # CEX Search Core
//!
//! Pure logic for CEX Search: the corpus data model, the CEX parser,
//! the hybrid substring search engine, the snapshot store and the query
//! service.
//!
//! This crate contains no tokio, reqwest, filesystem I/O, or other
//! native-only dependencies. Fetching corpus bytes and exposing queries
//! over HTTP live in the `cex-search` shell crate.
//!
//! ## Data Flow
//!
//! ```text
//! raw bytes ──▶ parser::parse ──▶ Corpus ──▶ CorpusStore::replace
//!                                                │
//!            query::search ◀── CorpusStore::current
//!                  │
//!                  └──▶ search::index_of (per passage)
//! ```

pub mod citation;
pub mod error;
pub mod models;
pub mod parser;
pub mod query;
pub mod search;
pub mod store;
