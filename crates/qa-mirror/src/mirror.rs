//! The [`RemoteMirror`] handle and the [`SheetService`] seam it talks through.

use crate::credentials::Credentials;
use crate::google::GoogleSheetsClient;
use crate::MirrorError;
use async_trait::async_trait;
use qa_core::config::MirrorConfig;
use qa_core::types::{LogRecord, HEADER};
use std::sync::Arc;
use std::time::Duration;

/// Operations the mirror needs from a hosted spreadsheet service.
#[async_trait]
pub trait SheetService: Send + Sync {
    /// Look a spreadsheet up by exact name. `Ok(None)` means it definitely
    /// does not exist; any failure to find out is an `Err`.
    async fn find_by_name(&self, name: &str) -> Result<Option<String>, MirrorError>;

    /// Create an empty spreadsheet and return its id.
    async fn create(&self, name: &str) -> Result<String, MirrorError>;

    /// Append one row to the first worksheet.
    async fn append_row(&self, sheet_id: &str, row: &[String]) -> Result<(), MirrorError>;
}

/// A connected remote sheet. Created once at startup and held for the process
/// lifetime; there is no reconnect.
pub struct RemoteMirror {
    service: Arc<dyn SheetService>,
    sheet_id: String,
    sheet_name: String,
}

impl std::fmt::Debug for RemoteMirror {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteMirror")
            .field("sheet_id", &self.sheet_id)
            .field("sheet_name", &self.sheet_name)
            .finish_non_exhaustive()
    }
}

impl RemoteMirror {
    /// Open the sheet called `sheet_name`, creating it (with a header row) if
    /// the lookup says it does not exist.
    pub async fn connect(
        service: Arc<dyn SheetService>,
        sheet_name: &str,
    ) -> Result<Self, MirrorError> {
        let sheet_id = match service.find_by_name(sheet_name).await? {
            Some(id) => {
                tracing::info!(sheet = sheet_name, id = %id, "opened remote log sheet");
                id
            }
            None => {
                let id = service.create(sheet_name).await?;
                let header: Vec<String> = HEADER.iter().map(|h| h.to_string()).collect();
                service.append_row(&id, &header).await?;
                tracing::info!(sheet = sheet_name, id = %id, "created remote log sheet");
                id
            }
        };

        Ok(Self {
            service,
            sheet_id,
            sheet_name: sheet_name.to_string(),
        })
    }

    pub fn sheet_id(&self) -> &str {
        &self.sheet_id
    }

    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    pub async fn append(&self, record: &LogRecord) -> Result<(), MirrorError> {
        self.service
            .append_row(&self.sheet_id, &record.to_row())
            .await
    }
}

/// Build the Google client from config and connect.
///
/// Returns `Ok(None)` when no credentials path is configured or the file does
/// not exist: mirroring is then skipped for the whole process.
pub async fn connect_from_config(cfg: &MirrorConfig) -> Result<Option<RemoteMirror>, MirrorError> {
    let Some(path) = cfg.credentials_path.as_deref() else {
        tracing::info!("remote mirror disabled: no credentials configured");
        return Ok(None);
    };
    if !path.exists() {
        tracing::warn!(path = %path.display(), "remote mirror disabled: credentials file not found");
        return Ok(None);
    }

    let credentials = Credentials::from_file(path)?;
    let tokens = credentials.token_source().await?;
    let client = GoogleSheetsClient::new(
        tokens,
        cfg.drive_api_base.clone(),
        cfg.sheets_api_base.clone(),
        Duration::from_secs(cfg.timeout_secs),
    )?;
    RemoteMirror::connect(Arc::new(client), &cfg.sheet_name)
        .await
        .map(Some)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
