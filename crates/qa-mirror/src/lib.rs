//! qa-mirror — best-effort copy of the question log in a hosted spreadsheet.
//!
//! The mirror is a secondary sink: the local [`LogStore`](qa_core::LogStore)
//! is always written first and a mirror failure never fails a request.
//!
//! Acquiring the remote sheet is an explicit two-step protocol: look the
//! sheet up by name; only a definite "not found" leads to creating it (and
//! writing the header row). Authentication and transport failures during the
//! lookup are reported as such and never trigger a create.

pub mod credentials;
pub mod google;
pub mod mirror;

pub use credentials::{Credentials, StaticToken, TokenSource};
pub use google::GoogleSheetsClient;
pub use mirror::{connect_from_config, RemoteMirror, SheetService};

/// Errors surfaced by the remote mirror.
#[derive(Debug, thiserror::Error)]
pub enum MirrorError {
    #[error("credentials file {path}: {reason}")]
    Credentials {
        path: std::path::PathBuf,
        reason: String,
    },
    #[error("could not obtain an access token: {0}")]
    Token(String),
    #[error("remote sheet rejected our credentials (HTTP {status}): {body}")]
    Auth { status: u16, body: String },
    #[error("remote sheet returned HTTP {status}: {body}")]
    Api { status: u16, body: String },
    #[error("remote sheet unreachable: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected response from remote sheet: {0}")]
    Malformed(String),
}
