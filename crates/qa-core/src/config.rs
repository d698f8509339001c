//! Configuration types for hospital-qa.
//!
//! [`Config::load`] layers, in order: the built-in defaults, an optional TOML
//! file, `HOSPITAL_QA_*` environment variables, and the legacy variables of
//! the older deployment (`GOOGLE_SERVICE_ACCOUNT_JSON`, `GOOGLE_SHEET_NAME`,
//! `OPENAI_API_KEY`). [`Config::defaults`] returns the built-in defaults
//! without touching the filesystem or the environment (useful in tests).

use serde::Deserialize;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[server]
bind = "0.0.0.0:8000"

[storage]
log_file     = "qa_log.csv"
dataset_file = "hospital_data.csv"
export_dir   = "exports"

[mirror]
sheet_name      = "HospitalQALog"
drive_api_base  = "https://www.googleapis.com/drive/v3"
sheets_api_base = "https://sheets.googleapis.com/v4"
timeout_secs    = 10

[answer]
api_base     = "https://api.openai.com/v1"
model        = "gpt-4o-mini"
sample_rows  = 20
timeout_secs = 120

[chart]
x_column = "Hospital Name"
y_column = "Billing Amount"
width    = 800
height   = 480
max_bars = 10
"#;

const ENV_PREFIX: &str = "HOSPITAL_QA";

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub mirror: MirrorConfig,
    pub answer: AnswerConfig,
    pub chart: ChartConfig,
}

/// `[server]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub bind: String,
}

/// `[storage]` section. Relative paths resolve against the working directory.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub log_file: PathBuf,
    pub dataset_file: PathBuf,
    pub export_dir: PathBuf,
}

/// `[mirror]` section. Mirroring is off unless `credentials_path` is set.
#[derive(Debug, Clone, Deserialize)]
pub struct MirrorConfig {
    #[serde(default)]
    pub credentials_path: Option<PathBuf>,
    pub sheet_name: String,
    pub drive_api_base: String,
    pub sheets_api_base: String,
    pub timeout_secs: u64,
}

/// `[answer]` section: the OpenAI-compatible chat endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct AnswerConfig {
    pub api_base: String,
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
    /// Dataset rows included verbatim in the prompt.
    pub sample_rows: usize,
    pub timeout_secs: u64,
}

/// `[chart]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartConfig {
    pub x_column: String,
    pub y_column: String,
    pub width: u32,
    pub height: u32,
    pub max_bars: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load the full layered configuration. `path`, when given, must exist.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml));

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_override_option(
                "mirror.credentials_path",
                non_empty_env("GOOGLE_SERVICE_ACCOUNT_JSON"),
            )?
            .set_override_option("mirror.sheet_name", non_empty_env("GOOGLE_SHEET_NAME"))?
            .set_override_option("answer.api_key", non_empty_env("OPENAI_API_KEY"))?
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        config::Config::builder()
            .add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
