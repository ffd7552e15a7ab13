//! Stockroom inventory client
//!
//! Bulk import of spreadsheet rows into the inventory API: ingestion, an
//! interactive reconciliation engine, sequential submission with per-row
//! results, and the session guard in front of all of it.

pub mod api;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod guard;
pub mod import;
pub mod ingest;
pub mod notify;
pub mod session;
