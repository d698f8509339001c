//! Answer engine: natural-language question in, answer text out.

use super::EngineError;
use async_trait::async_trait;
use qa_core::config::AnswerConfig;
use qa_core::Dataset;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

#[async_trait]
pub trait AnswerEngine: Send + Sync {
    async fn answer(&self, question: &str) -> Result<String, EngineError>;
}

const SYSTEM_PROMPT: &str = "You are a hospital data analyst. Answer questions about the \
hospital admissions and billing dataset described below. Be concise, quote figures from the \
data where you can, and say so plainly when the data cannot answer the question.";

/// Calls an OpenAI-compatible `POST {api_base}/chat/completions` endpoint,
/// with the dataset summary as system context.
#[derive(Debug, Clone)]
pub struct ChatCompletionsEngine {
    http: reqwest::Client,
    api_base: String,
    model: String,
    api_key: Option<String>,
    context: String,
}

#[derive(Deserialize)]
struct Completion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Message,
}

#[derive(Deserialize)]
struct Message {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletionsEngine {
    pub fn new(cfg: &AnswerConfig, dataset: &Dataset) -> Result<Self, EngineError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            api_base: cfg.api_base.trim_end_matches('/').to_string(),
            model: cfg.model.clone(),
            api_key: cfg.api_key.clone(),
            context: format!("{SYSTEM_PROMPT}\n\n{}", dataset.summary(cfg.sample_rows)),
        })
    }
}

#[async_trait]
impl AnswerEngine for ChatCompletionsEngine {
    async fn answer(&self, question: &str) -> Result<String, EngineError> {
        let Some(key) = self.api_key.as_deref() else {
            return Err(EngineError::NotConfigured(
                "set OPENAI_API_KEY or answer.api_key".to_string(),
            ));
        };

        let resp = self
            .http
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(key)
            .json(&json!({
                "model": self.model,
                "temperature": 0,
                "messages": [
                    { "role": "system", "content": self.context },
                    { "role": "user", "content": question },
                ],
            }))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(EngineError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let completion: Completion = resp.json().await?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(EngineError::EmptyResponse)?;
        tracing::debug!(chars = content.chars().count(), "answer engine replied");
        Ok(content.trim().to_string())
    }
}
