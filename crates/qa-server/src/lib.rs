//! qa-server — the process shell for hospital-qa.
//!
//! [`App::bootstrap`] performs the start-up sequence once: initialise the Log
//! Store, load the dataset, connect the remote mirror (if configured), build
//! the engines. [`App::serve`] then runs the axum server until Ctrl-C.

pub mod engine;
pub mod error;
pub mod handler;
pub mod routes;
pub mod ui;

pub use handler::{AskRequest, AskResponse, ChartColumns, RequestHandler};
pub use routes::{router, AppState};

use anyhow::Context;
use engine::{BarChartEngine, ChatCompletionsEngine};
use qa_core::config::Config;
use qa_core::{Dataset, ExportEngine, LogStore};
use std::sync::Arc;

pub struct App {
    pub config: Config,
    pub handler: Arc<RequestHandler>,
    pub exports: Arc<ExportEngine>,
}

impl App {
    pub async fn bootstrap(config: Config) -> anyhow::Result<Self> {
        let store = LogStore::new(&config.storage.log_file);
        store
            .ensure_initialized()
            .context("initialising the question log")?;

        let dataset = Arc::new(
            Dataset::load(&config.storage.dataset_file).context("loading the hospital dataset")?,
        );

        let mirror = match qa_mirror::connect_from_config(&config.mirror).await {
            Ok(mirror) => mirror.map(Arc::new),
            Err(e) => {
                tracing::warn!(error = %e, "remote mirror unavailable; continuing without it");
                None
            }
        };

        let answers = ChatCompletionsEngine::new(&config.answer, &dataset)
            .context("building the answer engine")?;
        let charts = BarChartEngine::new(&config.chart);

        let handler = RequestHandler::new(
            Arc::new(answers),
            Arc::new(charts),
            dataset,
            ChartColumns {
                x: config.chart.x_column.clone(),
                y: config.chart.y_column.clone(),
            },
            store.clone(),
            mirror,
        );
        let exports = ExportEngine::new(store, &config.storage.export_dir);

        Ok(Self {
            config,
            handler: Arc::new(handler),
            exports: Arc::new(exports),
        })
    }

    pub fn router(&self) -> axum::Router {
        router(AppState {
            handler: self.handler.clone(),
            exports: self.exports.clone(),
        })
    }

    pub async fn serve(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(&self.config.server.bind)
            .await
            .with_context(|| format!("binding {}", self.config.server.bind))?;
        tracing::info!(addr = %listener.local_addr()?, "serving hospital-qa");

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        tracing::info!("server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "could not listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
