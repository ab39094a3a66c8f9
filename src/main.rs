//! CLI entry point for the secret lookup service.
//!
//! Dispatches invocation events either to the ingest flow (CSV objects in
//! object storage → table records) or the query flow (search term → secret).

use std::ffi::OsStr;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use secret_lookup::config::Config;
use secret_lookup::event::Event;
use secret_lookup::handler::Handler;
use secret_lookup::object::S3Fetcher;
use secret_lookup::store::DynamoStore;
use serde_json::json;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "secret_lookup")]
#[command(about = "Ingests name/secret CSV files and answers lookup queries", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dispatch a full invocation event read from a JSON file
    Invoke {
        /// Path to the event JSON, or "-" for stdin
        #[arg(value_name = "EVENT")]
        event: String,
    },
    /// Ingest one CSV object as if a storage notification had fired
    Ingest {
        /// Bucket holding the CSV object
        bucket: String,

        /// Object key of the CSV file
        key: String,
    },
    /// Look up the secret stored under a name
    Query {
        /// Name to search for
        search: String,

        /// Skip the safe-character check on the search term
        #[arg(long, default_value_t = false)]
        raw: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/secret_lookup.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("secret_lookup.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    // One set of storage handles for the whole process; the underlying
    // clients are stateless and need no teardown.
    let aws_config = aws_config::load_from_env().await;
    let handler = Handler::new(
        Arc::new(S3Fetcher::new(&aws_config)),
        Arc::new(DynamoStore::new(&aws_config, config.table_name)),
    );

    let event = match cli.command {
        Commands::Invoke { event } => read_event(&event)?,
        Commands::Ingest { bucket, key } => Event::storage_notification(&bucket, &key),
        Commands::Query { search, raw } => {
            Event::direct_request(&json!({ "search": search }).to_string(), raw)
        }
    };

    let response = handler.handle(&event).await?;
    info!(status = response.status_code, "Invocation complete");

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

/// Reads an invocation event from a JSON file, or from stdin when `source`
/// is `-`.
fn read_event(source: &str) -> Result<Event> {
    let raw = if source == "-" {
        std::io::read_to_string(std::io::stdin()).context("failed to read event from stdin")?
    } else {
        std::fs::read_to_string(source)
            .with_context(|| format!("failed to read event file '{source}'"))?
    };

    serde_json::from_str(&raw).context("event is not valid JSON")
}
