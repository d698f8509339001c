//! hospital-qa — ask natural-language questions about hospital admissions and
//! billing data, and keep an auditable log of every question asked.
//!
//! This crate re-exports the workspace layers so that integration tests and
//! benches can import them from one place.
//!
//! # Architecture
//!
//! ```text
//! HTTP / CLI ──► RequestHandler ──► LogStore ──► ExportEngine
//!                     │                 (authoritative)
//!                     └──► RemoteMirror (best-effort)
//! ```

pub use qa_core::{
    clock, config, dataset, export, store, types, Dataset, ExportEngine, LogRecord, LogStore,
    MonotonicClock,
};
pub use qa_mirror as mirror;
pub use qa_server as server;
