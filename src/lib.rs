//! # CEX Search
//!
//! Ingests a CEX corpus of CTS-cited passages from a remote (or local)
//! source and answers exact substring queries across every passage.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌─────────────┐   ┌──────────────┐
//! │   Source     │──▶│   Parser    │──▶│ CorpusStore  │
//! │ HTTP / file │   │ #!ctsdata   │   │  (ArcSwap)   │
//! └─────────────┘   └─────────────┘   └──────┬───────┘
//!                                            │ snapshot
//!                      ┌─────────────────────┤
//!                      ▼                     ▼
//!                 ┌──────────┐         ┌──────────┐
//!                 │   CLI    │         │   HTTP   │
//!                 │  (cex)   │         │ (axum)   │
//!                 └──────────┘         └──────────┘
//! ```
//!
//! The parser, search engine, store and query service live in
//! [`cex_search_core`]; this crate adds the native shell around them.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`fetch`] | Corpus sources (HTTP, file) |
//! | [`ingest`] | Reload pipeline and reports |
//! | [`server`] | HTTP server |

pub mod config;
pub mod fetch;
pub mod ingest;
pub mod server;
