//! Test builders — a temp-dir backed environment and record helpers.
//!
//! These favour readability in tests over flexibility. They panic on setup
//! failure rather than returning `Result`.

use super::fake_engines::{StaticAnswers, StubChart};
use super::fixtures::DATASET_CSV;
use hospital_qa::mirror::RemoteMirror;
use hospital_qa::server::engine::{AnswerEngine, ChartEngine};
use hospital_qa::server::{AppState, ChartColumns, RequestHandler};
use hospital_qa::{Dataset, ExportEngine, LogRecord, LogStore};
use std::sync::Arc;

pub fn record(ts: &str, question: &str, answer: &str) -> LogRecord {
    LogRecord::new(ts, question, answer)
}

/// `n` records with increasing timestamps and distinct content.
pub fn numbered_records(n: usize) -> Vec<LogRecord> {
    (0..n)
        .map(|i| {
            LogRecord::new(
                format!(
                    "2024-01-01T{:02}:{:02}:{:02}.000000",
                    i / 3600 % 24,
                    i / 60 % 60,
                    i % 60
                ),
                format!("question {i}"),
                format!("answer {i}, with a comma"),
            )
        })
        .collect()
}

/// Temporary directory holding a log file, an export dir and a dataset file.
pub struct TestEnv {
    pub dir: tempfile::TempDir,
    pub store: LogStore,
}

impl TestEnv {
    /// Initialised, empty store.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = LogStore::new(dir.path().join("qa_log.csv"));
        store.ensure_initialized().expect("initialise store");
        std::fs::write(dir.path().join("hospital_data.csv"), DATASET_CSV).expect("dataset");
        Self { dir, store }
    }

    pub fn with_records(records: &[LogRecord]) -> Self {
        let env = Self::new();
        for r in records {
            env.store.append(r).expect("append");
        }
        env
    }

    pub fn export_dir(&self) -> std::path::PathBuf {
        self.dir.path().join("exports")
    }

    pub fn exports(&self) -> ExportEngine {
        ExportEngine::new(self.store.clone(), self.export_dir())
    }

    pub fn handler(&self) -> HandlerBuilder<'_> {
        HandlerBuilder {
            env: self,
            answers: Arc::new(StaticAnswers("42".into())),
            charts: Arc::new(StubChart),
            mirror: None,
        }
    }
}

pub struct HandlerBuilder<'a> {
    env: &'a TestEnv,
    answers: Arc<dyn AnswerEngine>,
    charts: Arc<dyn ChartEngine>,
    mirror: Option<Arc<RemoteMirror>>,
}

impl HandlerBuilder<'_> {
    pub fn answers(mut self, engine: impl AnswerEngine + 'static) -> Self {
        self.answers = Arc::new(engine);
        self
    }

    pub fn charts(mut self, engine: impl ChartEngine + 'static) -> Self {
        self.charts = Arc::new(engine);
        self
    }

    pub fn mirror(mut self, mirror: RemoteMirror) -> Self {
        self.mirror = Some(Arc::new(mirror));
        self
    }

    pub fn build(self) -> RequestHandler {
        let dataset = Dataset::from_reader(DATASET_CSV.as_bytes()).expect("dataset");
        RequestHandler::new(
            self.answers,
            self.charts,
            Arc::new(dataset),
            ChartColumns {
                x: "Hospital Name".into(),
                y: "Billing Amount".into(),
            },
            self.env.store.clone(),
            self.mirror,
        )
    }

    pub fn app_state(self) -> AppState {
        let exports = Arc::new(self.env.exports());
        AppState {
            handler: Arc::new(self.build()),
            exports,
        }
    }
}
