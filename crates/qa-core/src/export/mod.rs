//! Export Engine — renders the whole question log into downloadable files.
//!
//! Two formats: an `.xlsx` workbook ([`spreadsheet`]) and a paginated `.pdf`
//! document ([`document`], laid out by [`layout`]). Artifacts are named
//! `qa_logs_<YYYYMMDDHHMMSS>.<ext>`, generated on demand and never cleaned up
//! by this crate.
//!
//! Each artifact is written to a temporary file in the export directory and
//! only renamed into place once rendering has succeeded, so a failed export
//! never leaves a partial file behind.

pub mod document;
pub mod layout;
pub mod spreadsheet;

use crate::store::{LogStore, StoreError};
use chrono::Local;
use std::fs::File;
use std::path::{Path, PathBuf};

pub use layout::PageLayout;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("export directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("workbook rendering failed: {0}")]
    Spreadsheet(String),
    #[error("document rendering failed: {0}")]
    Document(String),
}

/// Artifact kinds offered by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Spreadsheet,
    Document,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Spreadsheet => "xlsx",
            ExportFormat::Document => "pdf",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            ExportFormat::Spreadsheet => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ExportFormat::Document => "application/pdf",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "xlsx" | "excel" | "spreadsheet" => Ok(ExportFormat::Spreadsheet),
            "pdf" | "document" => Ok(ExportFormat::Document),
            other => Err(format!("unknown export format: {other} (expected xlsx or pdf)")),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

#[derive(Debug, Clone)]
pub struct ExportEngine {
    store: LogStore,
    out_dir: PathBuf,
    layout: PageLayout,
}

impl ExportEngine {
    pub fn new(store: LogStore, out_dir: impl Into<PathBuf>) -> Self {
        Self {
            store,
            out_dir: out_dir.into(),
            layout: PageLayout::default(),
        }
    }

    pub fn with_layout(mut self, layout: PageLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    pub fn export(&self, format: ExportFormat) -> Result<PathBuf, ExportError> {
        match format {
            ExportFormat::Spreadsheet => self.export_spreadsheet(),
            ExportFormat::Document => self.export_document(),
        }
    }

    /// Render the full log as an `.xlsx` workbook and return its path.
    pub fn export_spreadsheet(&self) -> Result<PathBuf, ExportError> {
        let records = self.store.read_all()?;
        self.write_artifact(ExportFormat::Spreadsheet, |file| {
            spreadsheet::write_workbook(&records, file)
        })
    }

    /// Render the full log as a paginated `.pdf` and return its path.
    pub fn export_document(&self) -> Result<PathBuf, ExportError> {
        let records = self.store.read_all()?;
        let layout = self.layout;
        self.write_artifact(ExportFormat::Document, |file| {
            document::write_document(&records, &layout, file)
        })
    }

    fn write_artifact<F>(&self, format: ExportFormat, render: F) -> Result<PathBuf, ExportError>
    where
        F: FnOnce(&mut File) -> Result<(), ExportError>,
    {
        std::fs::create_dir_all(&self.out_dir).map_err(|e| self.io_err(e))?;

        let mut tmp = tempfile::Builder::new()
            .prefix(".qa_logs_")
            .suffix(".partial")
            .tempfile_in(&self.out_dir)
            .map_err(|e| self.io_err(e))?;
        render(tmp.as_file_mut())?;

        let target = self.artifact_path(format);
        tmp.persist_noclobber(&target)
            .map_err(|e| self.io_err(e.error))?;

        tracing::info!(path = %target.display(), format = %format, "exported question log");
        Ok(target)
    }

    /// `qa_logs_<YYYYMMDDHHMMSS>.<ext>`, with `_<n>` appended if that name
    /// is already taken.
    fn artifact_path(&self, format: ExportFormat) -> PathBuf {
        let stem = format!("qa_logs_{}", Local::now().format("%Y%m%d%H%M%S"));
        let ext = format.extension();
        let mut candidate = self.out_dir.join(format!("{stem}.{ext}"));
        let mut n = 1;
        while candidate.exists() {
            candidate = self.out_dir.join(format!("{stem}_{n}.{ext}"));
            n += 1;
        }
        candidate
    }

    fn io_err(&self, source: std::io::Error) -> ExportError {
        ExportError::Io {
            path: self.out_dir.clone(),
            source,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
