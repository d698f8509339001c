//! qa-core — the question log and everything that reads it.
//!
//! # Architecture
//!
//! ```text
//! RequestHandler ──► LogStore (authoritative, CSV)
//!        │               │
//!        │               └──► ExportEngine ──► .xlsx / .pdf
//!        └──► RemoteMirror (best-effort, qa-mirror crate)
//! ```
//!
//! The store is append-only and the single source of truth for exports and
//! the log viewer. The hospital [`Dataset`](dataset::Dataset) is read once at
//! startup and handed to the answer and chart engines.

pub mod clock;
pub mod config;
pub mod dataset;
pub mod export;
pub mod store;
pub mod types;

pub use clock::MonotonicClock;
pub use dataset::Dataset;
pub use export::ExportEngine;
pub use store::LogStore;
pub use types::LogRecord;
