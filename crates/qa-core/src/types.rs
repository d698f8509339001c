//! Core types shared by the store, the exporters and the mirror.

use serde::{Deserialize, Serialize};

/// Column names of the question log, in file order.
pub const HEADER: [&str; 3] = ["timestamp", "question", "answer"];

/// One question/answer pair, as persisted in the log.
///
/// `timestamp` is kept as text so that whatever was written is exactly what
/// is read back; the clock that produces it lives in [`crate::clock`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    pub timestamp: String,
    pub question: String,
    pub answer: String,
}

impl LogRecord {
    pub fn new(
        timestamp: impl Into<String>,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: timestamp.into(),
            question: question.into(),
            answer: answer.into(),
        }
    }

    /// The record as a row of cells, in [`HEADER`] order.
    pub fn to_row(&self) -> [String; 3] {
        [
            self.timestamp.clone(),
            self.question.clone(),
            self.answer.clone(),
        ]
    }
}
