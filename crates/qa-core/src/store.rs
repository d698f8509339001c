//! Log Store — append-only CSV file of [`LogRecord`] values.
//!
//! The file always starts with the [`HEADER`] row. Records are only ever
//! appended; each append is a scoped open/write/close so no handle outlives a
//! call. Appends from one process are serialised by an in-process lock
//! keyed by the log path, so every handle opened on the same path (clones or
//! separate [`LogStore::new`] calls) shares it. Paths are compared as given:
//! `./qa_log.csv` and `qa_log.csv` get different locks.

use crate::types::{LogRecord, HEADER};
use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("log file {path} does not exist; initialise the store before appending")]
    Uninitialized { path: PathBuf },
    #[error("log file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("log file {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Write locks of every log path opened in this process.
fn lock_for(path: &Path) -> Arc<Mutex<()>> {
    static LOCKS: OnceLock<Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>> = OnceLock::new();
    let mut locks = LOCKS
        .get_or_init(Default::default)
        .lock()
        .unwrap_or_else(|e| e.into_inner());
    locks.entry(path.to_path_buf()).or_default().clone()
}

/// Handle to the question log. Cheap to clone; all handles on the same path
/// share one write lock.
#[derive(Debug, Clone)]
pub struct LogStore {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl LogStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let write_lock = lock_for(&path);
        Self { path, write_lock }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the file with its header row if it does not exist yet.
    ///
    /// Returns `true` if the file was created. An existing file is left
    /// untouched, whatever its content.
    pub fn ensure_initialized(&self) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| self.io_err(e))?;
        }

        let file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
        {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => return Ok(false),
            Err(e) => return Err(self.io_err(e)),
        };

        let mut writer = csv_writer(file);
        writer.write_record(HEADER).map_err(|e| self.csv_err(e))?;
        writer.flush().map_err(|e| self.io_err(e))?;
        tracing::info!(path = %self.path.display(), "initialised question log");
        Ok(true)
    }

    /// Append one record as a new row.
    pub fn append(&self, record: &LogRecord) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        self.write_row(record)
    }

    /// Build the record while holding the write lock, append it, and return
    /// what was written.
    ///
    /// Use this when the record carries a timestamp: taking the time under
    /// the lock makes file order and timestamp order agree.
    pub fn append_with<F>(&self, make: F) -> Result<LogRecord, StoreError>
    where
        F: FnOnce() -> LogRecord,
    {
        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());
        let record = make();
        self.write_row(&record)?;
        Ok(record)
    }

    fn write_row(&self, record: &LogRecord) -> Result<(), StoreError> {
        let file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => StoreError::Uninitialized {
                    path: self.path.clone(),
                },
                _ => self.io_err(e),
            })?;

        let mut writer = csv_writer(file);
        writer.serialize(record).map_err(|e| self.csv_err(e))?;
        writer.flush().map_err(|e| self.io_err(e))?;
        Ok(())
    }

    /// Every record in write order. A missing file yields an empty log.
    pub fn read_all(&self) -> Result<Vec<LogRecord>, StoreError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_err(e)),
        };

        csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(file)
            .deserialize()
            .collect::<Result<Vec<LogRecord>, _>>()
            .map_err(|e| self.csv_err(e))
    }

    fn io_err(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn csv_err(&self, source: csv::Error) -> StoreError {
        StoreError::Csv {
            path: self.path.clone(),
            source,
        }
    }
}

fn csv_writer<W: Write>(inner: W) -> csv::Writer<W> {
    csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(inner)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
