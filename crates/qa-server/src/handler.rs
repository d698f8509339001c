//! Request Handler — one question, end to end.
//!
//! answer engine → chart engine → Log Store (timestamped under its write
//! lock) → Remote Mirror.
//!
//! The local append is part of the request: if it fails, the request fails.
//! The mirror append is not: its failure is logged and dropped.

use crate::engine::{AnswerEngine, ChartEngine, EngineError};
use qa_core::store::StoreError;
use qa_core::{Dataset, LogRecord, LogStore, MonotonicClock};
use qa_mirror::RemoteMirror;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
    pub chart_base64: String,
}

#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error(transparent)]
    Answer(EngineError),
    #[error(transparent)]
    Chart(EngineError),
    #[error("could not record the answer: {0}")]
    Store(#[from] StoreError),
    #[error("log writer task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// The two dataset columns every chart is drawn from.
#[derive(Debug, Clone)]
pub struct ChartColumns {
    pub x: String,
    pub y: String,
}

pub struct RequestHandler {
    answers: Arc<dyn AnswerEngine>,
    charts: Arc<dyn ChartEngine>,
    dataset: Arc<Dataset>,
    columns: ChartColumns,
    store: LogStore,
    mirror: Option<Arc<RemoteMirror>>,
    clock: Arc<MonotonicClock>,
}

impl RequestHandler {
    pub fn new(
        answers: Arc<dyn AnswerEngine>,
        charts: Arc<dyn ChartEngine>,
        dataset: Arc<Dataset>,
        columns: ChartColumns,
        store: LogStore,
        mirror: Option<Arc<RemoteMirror>>,
    ) -> Self {
        Self {
            answers,
            charts,
            dataset,
            columns,
            store,
            mirror,
            clock: Arc::new(MonotonicClock::new()),
        }
    }

    pub fn store(&self) -> &LogStore {
        &self.store
    }

    pub fn mirror(&self) -> Option<&RemoteMirror> {
        self.mirror.as_deref()
    }

    pub async fn ask(&self, question: &str) -> Result<AskResponse, HandlerError> {
        let answer = self
            .answers
            .answer(question)
            .await
            .map_err(HandlerError::Answer)?;
        let chart_base64 = self
            .charts
            .render(&self.dataset, &self.columns.x, &self.columns.y)
            .map_err(HandlerError::Chart)?;

        // The timestamp is taken under the store's write lock so that
        // timestamps never decrease in file order.
        let store = self.store.clone();
        let clock = self.clock.clone();
        let (q, a) = (question.to_string(), answer.clone());
        let record = tokio::task::spawn_blocking(move || {
            store.append_with(|| LogRecord::new(clock.now(), q, a))
        })
        .await??;

        if let Some(mirror) = &self.mirror {
            if let Err(e) = mirror.append(&record).await {
                tracing::warn!(
                    error = %e,
                    sheet = mirror.sheet_name(),
                    "remote mirror append failed; record kept locally"
                );
            }
        }

        Ok(AskResponse {
            answer,
            chart_base64,
        })
    }

    /// Full log for the viewer, read on the blocking pool.
    pub async fn logs(&self) -> Result<Vec<LogRecord>, HandlerError> {
        let store = self.store.clone();
        Ok(tokio::task::spawn_blocking(move || store.read_all()).await??)
    }
}
