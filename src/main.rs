use clap::{Parser, Subcommand};
use qa_core::config::Config;
use qa_core::export::ExportFormat;
use qa_core::{ExportEngine, LogStore};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hospital-qa", about = "Ask questions about hospital data; keep a log of every answer")]
struct Cli {
    /// TOML config file layered over the built-in defaults.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level instead of info (RUST_LOG still wins).
    #[arg(long, global = true)]
    debug: bool,

    /// Append logs to this file instead of stderr.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API and browser UI (default).
    Serve,
    /// Ask one question and print the answer.
    Ask { question: String },
    /// Print the question log.
    Logs {
        /// Emit JSON instead of one line per record.
        #[arg(long)]
        json: bool,
    },
    /// Write the question log to an .xlsx or .pdf file and print its path.
    Export { format: ExportFormat },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();
    init_tracing(&cli)?;

    let config = Config::load(cli.config.as_deref())?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => runtime()?.block_on(async {
            qa_server::App::bootstrap(config).await?.serve().await
        }),
        Command::Ask { question } => runtime()?.block_on(async {
            let app = qa_server::App::bootstrap(config).await?;
            let response = app.handler.ask(&question).await?;
            println!("{}", response.answer);
            Ok::<(), anyhow::Error>(())
        }),
        Command::Logs { json } => {
            let records = LogStore::new(&config.storage.log_file).read_all()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                for r in &records {
                    println!("{}\t{}\t{}", r.timestamp, r.question, r.answer);
                }
            }
            Ok(())
        }
        Command::Export { format } => {
            let store = LogStore::new(&config.storage.log_file);
            let path = ExportEngine::new(store, &config.storage.export_dir).export(format)?;
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn runtime() -> std::io::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread().enable_all().build()
}

fn init_tracing(cli: &Cli) -> anyhow::Result<()> {
    let default_level = if cli.debug { "debug" } else { "info" };
    let filter = tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    match &cli.log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            tracing_subscriber::fmt()
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false)
                .with_env_filter(filter)
                .init();
            tracing::info!(path = %path.display(), "hospital-qa log started");
        }
        None => tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(filter)
            .init(),
    }
    Ok(())
}
