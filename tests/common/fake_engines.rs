//! Fake answer/chart engines and sheet services for handler tests.

use super::fixtures::STUB_CHART_B64;
use async_trait::async_trait;
use hospital_qa::mirror::{MirrorError, SheetService};
use hospital_qa::server::engine::{AnswerEngine, ChartEngine, EngineError};
use hospital_qa::Dataset;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Always answers with the same text.
pub struct StaticAnswers(pub String);

#[async_trait]
impl AnswerEngine for StaticAnswers {
    async fn answer(&self, _question: &str) -> Result<String, EngineError> {
        Ok(self.0.clone())
    }
}

/// Echoes the question back, so concurrent requests produce distinct rows.
pub struct EchoAnswers;

#[async_trait]
impl AnswerEngine for EchoAnswers {
    async fn answer(&self, question: &str) -> Result<String, EngineError> {
        Ok(format!("echo: {question}"))
    }
}

/// Echoes like [`EchoAnswers`] but yields to the scheduler first, so
/// overlapping requests interleave.
pub struct YieldingAnswers;

#[async_trait]
impl AnswerEngine for YieldingAnswers {
    async fn answer(&self, question: &str) -> Result<String, EngineError> {
        tokio::task::yield_now().await;
        Ok(format!("echo: {question}"))
    }
}

/// Fails every call like an overloaded upstream.
pub struct FailingAnswers;

#[async_trait]
impl AnswerEngine for FailingAnswers {
    async fn answer(&self, _question: &str) -> Result<String, EngineError> {
        Err(EngineError::Upstream {
            status: 500,
            body: "model overloaded".into(),
        })
    }
}

pub struct StubChart;

impl ChartEngine for StubChart {
    fn render(&self, _dataset: &Dataset, _x: &str, _y: &str) -> Result<String, EngineError> {
        Ok(STUB_CHART_B64.to_string())
    }
}

/// Sheet service that opens fine but fails every append.
#[derive(Default)]
pub struct FlakySheet {
    pub append_attempts: AtomicUsize,
}

#[async_trait]
impl SheetService for FlakySheet {
    async fn find_by_name(&self, _name: &str) -> Result<Option<String>, MirrorError> {
        Ok(Some("sheet-1".into()))
    }

    async fn create(&self, _name: &str) -> Result<String, MirrorError> {
        Ok("sheet-1".into())
    }

    async fn append_row(&self, _sheet_id: &str, _row: &[String]) -> Result<(), MirrorError> {
        self.append_attempts.fetch_add(1, Ordering::SeqCst);
        Err(MirrorError::Api {
            status: 503,
            body: "backend unavailable".into(),
        })
    }
}

/// Sheet service that records every appended row.
#[derive(Default)]
pub struct RecordingSheet {
    pub rows: Mutex<Vec<Vec<String>>>,
}

#[async_trait]
impl SheetService for RecordingSheet {
    async fn find_by_name(&self, _name: &str) -> Result<Option<String>, MirrorError> {
        Ok(Some("sheet-1".into()))
    }

    async fn create(&self, _name: &str) -> Result<String, MirrorError> {
        Ok("sheet-1".into())
    }

    async fn append_row(&self, _sheet_id: &str, row: &[String]) -> Result<(), MirrorError> {
        self.rows.lock().unwrap().push(row.to_vec());
        Ok(())
    }
}
