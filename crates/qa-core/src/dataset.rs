//! The hospital admissions/billing table that questions are asked about.
//!
//! Loaded once at startup and shared read-only with the answer and chart
//! engines. Values are kept as text; numeric interpretation happens at the
//! point of use.

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("dataset {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("dataset: {0}")]
    Parse(#[from] csv::Error),
    #[error("dataset has no column named {0:?}")]
    UnknownColumn(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Dataset {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .map_err(|source| DatasetError::Read {
                path: path.to_path_buf(),
                source,
            })?;
        let dataset = Self::from_csv_reader(reader)?;
        tracing::info!(
            path = %path.display(),
            rows = dataset.len(),
            columns = dataset.headers.len(),
            "loaded dataset"
        );
        Ok(dataset)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        Self::from_csv_reader(csv::ReaderBuilder::new().flexible(true).from_reader(reader))
    }

    fn from_csv_reader<R: Read>(mut reader: csv::Reader<R>) -> Result<Self, DatasetError> {
        let headers = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        let rows = reader
            .records()
            .map(|r| r.map(|rec| rec.iter().map(str::to_string).collect()))
            .collect::<Result<Vec<Vec<String>>, _>>()?;
        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column(&self, name: &str) -> Result<usize, DatasetError> {
        self.headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| DatasetError::UnknownColumn(name.to_string()))
    }

    /// Plain-text description handed to the answer engine as context: column
    /// names, row count, then the first `max_rows` rows as CSV.
    pub fn summary(&self, max_rows: usize) -> String {
        let mut out = format!(
            "Columns: {}\nRows: {}\n",
            self.headers.join(", "),
            self.rows.len()
        );
        if max_rows == 0 || self.rows.is_empty() {
            return out;
        }

        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());
        let sample = std::iter::once(&self.headers).chain(self.rows.iter().take(max_rows));
        for row in sample {
            if writer.write_record(row).is_err() {
                break;
            }
        }
        if let Ok(bytes) = writer.into_inner() {
            out.push_str(&format!("First {} rows:\n", max_rows.min(self.rows.len())));
            out.push_str(&String::from_utf8_lossy(&bytes));
        }
        out
    }

    /// Sum of `value_col` grouped by `key_col`, largest total first.
    ///
    /// Cells that do not parse as numbers (after stripping `$` and `,`) are
    /// skipped. Ties keep first-seen order.
    pub fn sum_by(&self, key_col: &str, value_col: &str) -> Result<Vec<(String, f64)>, DatasetError> {
        let key_idx = self.column(key_col)?;
        let value_idx = self.column(value_col)?;

        let mut order: Vec<String> = Vec::new();
        let mut totals: HashMap<String, f64> = HashMap::new();
        for row in &self.rows {
            let (Some(key), Some(raw)) = (row.get(key_idx), row.get(value_idx)) else {
                continue;
            };
            let Some(value) = parse_amount(raw) else {
                continue;
            };
            let key = key.trim().to_string();
            if !totals.contains_key(&key) {
                order.push(key.clone());
            }
            *totals.entry(key).or_insert(0.0) += value;
        }

        let mut grouped: Vec<(String, f64)> = order
            .into_iter()
            .map(|k| {
                let total = totals.get(&k).copied().unwrap_or_default();
                (k, total)
            })
            .collect();
        grouped.sort_by(|a, b| b.1.total_cmp(&a.1));
        Ok(grouped)
    }
}

fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | ','))
        .collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
