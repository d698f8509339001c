//! The two external collaborators of a request: the answer engine (question
//! text in, answer text out) and the chart engine (table in, encoded image
//! out). Both sit behind traits so the handler never depends on a vendor.

pub mod answer;
pub mod chart;

pub use answer::{AnswerEngine, ChatCompletionsEngine};
pub use chart::{BarChartEngine, ChartEngine};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("answer engine is not configured: {0}")]
    NotConfigured(String),
    #[error("answer engine request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("answer engine returned HTTP {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("answer engine response had no content")]
    EmptyResponse,
    #[error("chart: {0}")]
    Chart(String),
}
